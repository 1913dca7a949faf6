//! Run log locations
//!
//! The game numbers its log files `<prefix><run>.log`, one counter per prefix.
//! Depending on the study layout they sit directly under the log root, under a
//! per-player directory, or under `<player>/<lag>/`.

use std::fs;
use std::path::{Path, PathBuf};

use super::LogLayout;
use crate::error::LogError;
use crate::schema::LogKind;

const LOG_EXTENSION: &str = ".log";

/// A per-run log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFile {
    /// Record log of a kind
    Records(LogKind),
    /// Finish times (`laptime_N.log`)
    LapTime,
    /// Off-track flags (`offtrack_N.log`)
    OffTrack,
}

impl LogFile {
    /// File name prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            LogFile::Records(kind) => kind.file_prefix(),
            LogFile::LapTime => "laptime_",
            LogFile::OffTrack => "offtrack_",
        }
    }

    /// File name for a run
    pub fn file_name(&self, run: u32) -> String {
        format!("{}{}{}", self.prefix(), run, LOG_EXTENSION)
    }
}

/// Resolves run log paths for a study layout
#[derive(Debug, Clone)]
pub struct RunLocator {
    base_dir: PathBuf,
    layout: LogLayout,
}

impl RunLocator {
    /// Create a locator
    pub fn new(base_dir: impl Into<PathBuf>, layout: LogLayout) -> Self {
        Self {
            base_dir: base_dir.into(),
            layout,
        }
    }

    /// Log root
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Directory holding one player's logs under one lag condition
    pub fn run_dir(&self, player: &str, lag: &str) -> PathBuf {
        match self.layout {
            LogLayout::Flat => self.base_dir.clone(),
            LogLayout::PerPlayer => self.base_dir.join(player),
            LogLayout::PerPlayerLag => self.base_dir.join(player).join(lag),
        }
    }

    /// Path of one run's log file
    pub fn path(&self, player: &str, lag: &str, file: LogFile, run: u32) -> PathBuf {
        self.run_dir(player, lag).join(file.file_name(run))
    }
}

/// Run numbers of `<prefix><N>.log` files in a directory, sorted
///
/// A missing directory has no runs. Names whose number does not parse are ignored.
pub fn discover_runs<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<Vec<u32>, LogError> {
    let dir = dir.as_ref();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(LogError::from_io(dir, e)),
    };

    let mut runs: Vec<u32> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            name.strip_prefix(prefix)?
                .strip_suffix(LOG_EXTENSION)?
                .parse()
                .ok()
        })
        .collect();
    runs.sort_unstable();
    runs.dedup();
    Ok(runs)
}

/// Number the game would give the next `<prefix>` log in a directory
pub fn next_run_number<P: AsRef<Path>>(dir: P, prefix: &str) -> Result<u32, LogError> {
    Ok(next_run_after(&discover_runs(dir, prefix)?))
}

/// Next run number after an already discovered, sorted run list
pub fn next_run_after(runs: &[u32]) -> u32 {
    runs.last().map_or(1, |max| max.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_per_layout() {
        let file = LogFile::Records(LogKind::Bot);
        assert_eq!(file.file_name(3), "botdata_3.log");

        let flat = RunLocator::new("logs", LogLayout::Flat);
        assert_eq!(
            flat.path("F", "0 Lag", file, 3),
            PathBuf::from("logs/botdata_3.log")
        );

        let nested = RunLocator::new("logs", LogLayout::PerPlayerLag);
        assert_eq!(
            nested.path("F", "200 Lag", LogFile::LapTime, 12),
            PathBuf::from("logs/F/200 Lag/laptime_12.log")
        );

        let per_player = RunLocator::new("logs", LogLayout::PerPlayer);
        assert_eq!(
            per_player.path("J", "0 Lag", LogFile::OffTrack, 1),
            PathBuf::from("logs/J/offtrack_1.log")
        );
    }

    #[test]
    fn test_missing_dir_has_no_runs() {
        assert_eq!(
            discover_runs("/definitely/not/here", "cardata_").unwrap(),
            Vec::<u32>::new()
        );
        assert_eq!(next_run_number("/definitely/not/here", "cardata_").unwrap(), 1);
    }

    #[test]
    fn test_next_run_from_discovered_list() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["cardata_2.log", "cardata_10.log", "botdata_40.log", "cardata_x.log"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let runs = discover_runs(dir.path(), "cardata_").unwrap();
        assert_eq!(runs, vec![2, 10]);
        assert_eq!(next_run_after(&runs), 11);
        assert_eq!(next_run_after(&runs), next_run_number(dir.path(), "cardata_").unwrap());

        assert_eq!(next_run_after(&[]), 1);
        assert_eq!(next_run_after(&[u32::MAX]), u32::MAX);
    }
}
