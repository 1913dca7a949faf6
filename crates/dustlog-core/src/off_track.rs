//! Off-track logs
//!
//! Each stamped line `isOffTrack check: left=L, right=R` is one sample. The car is
//! off track while either flag is `1`. Rising and falling edges between
//! consecutive samples delimit intervals whose lengths are summed; an interval
//! still open at the end is closed at the last sample's time.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::LogError;
use crate::timing::game_time;

static OFF_TRACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"isOffTrack check: left=(\d), right=(\d)").expect("off-track pattern")
});

/// One off-track flag sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffTrackSample {
    /// Game time in seconds
    pub time: f64,
    /// Left wheels off track
    pub left: bool,
    /// Right wheels off track
    pub right: bool,
}

impl OffTrackSample {
    /// Parse a stamped flag line
    pub fn parse(line: &str) -> Option<Self> {
        let caps = OFF_TRACK_RE.captures(line)?;
        let time = game_time(line)?;
        Some(Self {
            time,
            left: &caps[1] == "1",
            right: &caps[2] == "1",
        })
    }

    /// Whether either side is off track
    pub fn is_off(&self) -> bool {
        self.left || self.right
    }
}

/// Total off-track time of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffTrackSummary {
    /// Summed interval length in seconds
    pub duration: f64,
    /// `(start, end)` of every off-track interval
    pub intervals: Vec<(f64, f64)>,
    /// Number of flag samples seen
    pub samples: usize,
}

impl OffTrackSummary {
    /// Compute the summary from a line sequence
    pub fn extract<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_samples(lines.into_iter().filter_map(|l| OffTrackSample::parse(l.as_ref())))
    }

    /// Compute the summary from flag samples in log order
    pub fn from_samples<I: IntoIterator<Item = OffTrackSample>>(samples: I) -> Self {
        let mut summary = OffTrackSummary::default();
        let mut open: Option<f64> = None;
        let mut last_time = None;

        for sample in samples {
            summary.samples += 1;
            last_time = Some(sample.time);
            match (open, sample.is_off()) {
                (None, true) => open = Some(sample.time),
                (Some(start), false) => {
                    summary.close(start, sample.time);
                    open = None;
                }
                _ => {}
            }
        }

        if let (Some(start), Some(end)) = (open, last_time) {
            summary.close(start, end);
        }
        summary
    }

    /// Compute the summary from an off-track log file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| LogError::from_io(path, e))?;
        Ok(Self::extract(String::from_utf8_lossy(&bytes).lines()))
    }

    fn close(&mut self, start: f64, end: f64) {
        self.duration += end - start;
        self.intervals.push((start, end));
    }
}
