//! User study analysis
//!
//! A study is a set of players, each driving a fixed number of runs under every
//! lag condition and control-assistance condition. This module locates the run
//! logs, loads them and builds the reports.
//!
//! Loading is forgiving: a run whose files are missing or unreadable is logged and
//! skipped, and the remaining runs are still analyzed.

mod config;
mod layout;
mod report;

pub use config::{ControlCondition, LagCondition, LogLayout, StudyConfig};
pub use layout::{discover_runs, next_run_after, next_run_number, LogFile, RunLocator};
pub use report::{
    BotReport, BotRunRow, ConditionReport, OverallReport, OverallRow, RaceEntry, RaceReport,
    RaceStatRow, RunData, RunSummaryRow, Source, StudyRun,
};

use std::fs;
use std::path::Path;

use crate::assembler::Assembler;
use crate::error::LogError;
use crate::lap_time::LapTimes;
use crate::off_track::OffTrackSummary;
use crate::record::RunSeries;
use crate::schema::{LogKind, LogSchema};
use crate::timing::final_game_time;

/// Every report of one study
#[derive(Debug, Clone)]
pub struct StudyResults {
    /// Per player, lag and condition run summaries
    pub conditions: Vec<ConditionReport>,
    /// Bot performance
    pub bot: BotReport,
    /// Mean completion times
    pub overall: OverallReport,
    /// Race times
    pub race: RaceReport,
}

/// A configured study
#[derive(Debug, Clone)]
pub struct Study {
    config: StudyConfig,
    locator: RunLocator,
}

impl Study {
    /// Create a study from its config
    pub fn new(config: StudyConfig) -> Self {
        let locator = RunLocator::new(&config.base_dir, config.layout);
        Self { config, locator }
    }

    /// Study config
    pub fn config(&self) -> &StudyConfig {
        &self.config
    }

    /// Log locator
    pub fn locator(&self) -> &RunLocator {
        &self.locator
    }

    /// Load one record log, `None` if it cannot be read
    pub fn load_series(
        &self,
        player: &str,
        lag: &str,
        kind: LogKind,
        run: u32,
    ) -> Option<RunSeries> {
        self.load_records(player, lag, kind, run).map(|log| log.series)
    }

    /// Load one lap-time log, `None` if it cannot be read
    pub fn load_lap_times(&self, player: &str, lag: &str, run: u32) -> Option<LapTimes> {
        let path = self.locator.path(player, lag, LogFile::LapTime, run);
        soft(&path, LapTimes::from_file(&path))
    }

    /// Load one off-track log, `None` if it cannot be read
    pub fn load_off_track(&self, player: &str, lag: &str, run: u32) -> Option<OffTrackSummary> {
        let path = self.locator.path(player, lag, LogFile::OffTrack, run);
        soft(&path, OffTrackSummary::from_file(&path))
    }

    /// Race time of a run: latest game time in the bot log, falling back to the
    /// player log
    ///
    /// Under the flat layout the legacy `aidata_N.log` is tried first.
    pub fn load_race_time(&self, player: &str, lag: &str, run: u32) -> Option<f64> {
        self.legacy_race_time(player, lag, run)
            .or_else(|| self.final_time(player, lag, LogKind::Bot, run))
            .or_else(|| self.final_time(player, lag, LogKind::Player, run))
    }

    /// Load every file of one run; each record log is read once
    pub fn load_run(&self, player: &str, lag: &str, run: u32) -> RunData {
        let player_log = self.load_records(player, lag, LogKind::Player, run);
        let bot_log = self.load_records(player, lag, LogKind::Bot, run);

        let race_time = self
            .legacy_race_time(player, lag, run)
            .or_else(|| bot_log.as_ref().and_then(|log| log.final_time))
            .or_else(|| player_log.as_ref().and_then(|log| log.final_time));

        let data = RunData {
            run,
            player: player_log.map(|log| log.series),
            bot: bot_log.map(|log| log.series),
            lap_times: self.load_lap_times(player, lag, run),
            off_track: self.load_off_track(player, lag, run),
            race_time,
        };
        if !data.has_series() {
            tracing::warn!(player, lag, run, "No record logs for run, skipping");
        }
        data
    }

    /// Load every run of every player, lag and condition
    pub fn load_all(&self) -> Vec<StudyRun> {
        let mut runs = Vec::new();
        for player in &self.config.players {
            for lag in &self.config.lag_conditions {
                for condition in &self.config.conditions {
                    for run in condition.runs() {
                        runs.push(StudyRun {
                            player: player.clone(),
                            lag: lag.name.clone(),
                            condition: condition.label.clone(),
                            data: self.load_run(player, &lag.name, run),
                        });
                    }
                }
            }
        }
        tracing::info!(
            runs = runs.len(),
            loaded = runs.iter().filter(|r| r.data.has_series()).count(),
            "Loaded study runs"
        );
        runs
    }

    /// One report per player, lag and condition, in config order
    pub fn condition_reports(&self, runs: &[StudyRun]) -> Vec<ConditionReport> {
        let mut reports = Vec::new();
        for player in &self.config.players {
            for lag in &self.config.lag_conditions {
                for condition in &self.config.conditions {
                    reports.push(ConditionReport::from_runs(
                        player,
                        &lag.name,
                        &condition.label,
                        runs,
                    ));
                }
            }
        }
        reports
    }

    /// Load everything and build every report
    pub fn analyze(&self) -> StudyResults {
        let runs = self.load_all();
        let conditions = self.condition_reports(&runs);
        StudyResults {
            bot: BotReport::from_runs(&runs),
            overall: OverallReport::from_conditions(&conditions),
            race: RaceReport::from_runs(&runs),
            conditions,
        }
    }
}

/// A record log read once: its records and its latest game time
struct RecordLog {
    series: RunSeries,
    final_time: Option<f64>,
}

impl Study {
    fn load_records(
        &self,
        player: &str,
        lag: &str,
        kind: LogKind,
        run: u32,
    ) -> Option<RecordLog> {
        let path = self.locator.path(player, lag, LogFile::Records(kind), run);
        let content = soft(&path, read_lossy(&path))?;

        let mut assembler = Assembler::new(LogSchema::for_kind(kind));
        let series = assembler.assemble_lines(content.lines());
        let stats = assembler.stats();
        tracing::debug!(
            path = %path.display(),
            kind = %kind,
            lines = stats.lines,
            matched = stats.matched,
            records = stats.records,
            "assembled log"
        );

        Some(RecordLog {
            series,
            final_time: final_game_time(content.lines()),
        })
    }

    /// Latest game time of a log that may legitimately be absent
    fn final_time(&self, player: &str, lag: &str, kind: LogKind, run: u32) -> Option<f64> {
        let path = self.locator.path(player, lag, LogFile::Records(kind), run);
        let content = read_lossy(&path).ok()?;
        final_game_time(content.lines())
    }

    fn legacy_race_time(&self, player: &str, lag: &str, run: u32) -> Option<f64> {
        if self.config.layout == LogLayout::Flat {
            self.final_time(player, lag, LogKind::AiPath, run)
        } else {
            None
        }
    }
}

fn read_lossy(path: &Path) -> Result<String, LogError> {
    let bytes = fs::read(path).map_err(|e| LogError::from_io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn soft<T>(path: &Path, result: Result<T, LogError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_not_found() => {
            tracing::warn!(path = %path.display(), "Log file missing");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read log file");
            None
        }
    }
}
