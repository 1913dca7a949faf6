//! Lap-time logs
//!
//! A lap-time log holds at most one `Bot finish time:` line and at most one
//! `Player finish time:` line. The finish time is the game time stamped on that
//! line. A missing line is a missing value, not an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::LogError;
use crate::timing::game_time;

const BOT_FINISH: &str = "Bot finish time:";
const PLAYER_FINISH: &str = "Player finish time:";

/// Finish times from one run's lap-time log
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LapTimes {
    /// Bot finish time in seconds
    pub bot: Option<f64>,
    /// Player finish time in seconds
    pub player: Option<f64>,
}

impl LapTimes {
    /// Extract both finish times from a line sequence
    ///
    /// Only lines carrying a game timestamp count. If a marker appears more than
    /// once, the first occurrence wins.
    pub fn extract<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut times = LapTimes::default();
        for line in lines {
            let line = line.as_ref();
            let Some(t) = game_time(line) else {
                continue;
            };
            if times.bot.is_none() && line.contains(BOT_FINISH) {
                times.bot = Some(t);
            } else if times.player.is_none() && line.contains(PLAYER_FINISH) {
                times.player = Some(t);
            }
            if times.is_complete() {
                break;
            }
        }
        times
    }

    /// Extract both finish times from a lap-time log file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| LogError::from_io(path, e))?;
        Ok(Self::extract(String::from_utf8_lossy(&bytes).lines()))
    }

    /// Whether both finish times are present
    pub fn is_complete(&self) -> bool {
        self.bot.is_some() && self.player.is_some()
    }

    /// Player time minus bot time, when both finished
    pub fn margin(&self) -> Option<f64> {
        Some(self.player? - self.bot?)
    }
}
