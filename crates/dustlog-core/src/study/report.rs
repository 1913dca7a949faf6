//! Study reports
//!
//! All reports are built from already-loaded runs. A run that failed to load
//! simply contributes fewer values; a missing value is left out of averages.

use serde::{Deserialize, Serialize};

use crate::lap_time::LapTimes;
use crate::off_track::OffTrackSummary;
use crate::record::RunSeries;
use crate::schema::Field;
use crate::stats::{mean_abs, path_deviation, Summary};

/// Which car a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Human player car
    Player,
    /// Bot car
    Bot,
}

/// Everything loaded for one run
#[derive(Debug, Clone, Default)]
pub struct RunData {
    /// Run number
    pub run: u32,
    /// Player car records
    pub player: Option<RunSeries>,
    /// Bot car records
    pub bot: Option<RunSeries>,
    /// Finish times
    pub lap_times: Option<LapTimes>,
    /// Off-track time
    pub off_track: Option<OffTrackSummary>,
    /// Latest game time stamped anywhere in the car log
    pub race_time: Option<f64>,
}

impl RunData {
    /// Empty run data
    pub fn new(run: u32) -> Self {
        Self {
            run,
            ..Default::default()
        }
    }

    /// Whether at least one record series loaded
    pub fn has_series(&self) -> bool {
        self.player.is_some() || self.bot.is_some()
    }

    /// Series of one car
    pub fn series(&self, source: Source) -> Option<&RunSeries> {
        match source {
            Source::Player => self.player.as_ref(),
            Source::Bot => self.bot.as_ref(),
        }
    }

    /// Completion time (latest record time) of one car
    pub fn completion_time(&self, source: Source) -> Option<f64> {
        self.series(source)?.completion_time()
    }

    /// Summary row for the per-condition table
    pub fn summary_row(&self) -> RunSummaryRow {
        let control = |source| {
            self.series(source)
                .and_then(|s| Summary::from_values(&s.column(Field::Control)))
        };
        let player_control = control(Source::Player);
        let bot_control = control(Source::Bot);

        RunSummaryRow {
            run: self.run,
            player_avg_control: player_control.map(|s| s.mean),
            player_control_std: player_control.and_then(|s| s.std_dev),
            bot_avg_control: bot_control.map(|s| s.mean),
            bot_control_std: bot_control.and_then(|s| s.std_dev),
            player_completion_time: self.completion_time(Source::Player),
            bot_completion_time: self.completion_time(Source::Bot),
            player_lap_time: self.lap_times.and_then(|t| t.player),
            bot_lap_time: self.lap_times.and_then(|t| t.bot),
            off_track_seconds: self.off_track.as_ref().map(|o| o.duration),
        }
    }
}

/// A run loaded within a study, with its coordinates
#[derive(Debug, Clone)]
pub struct StudyRun {
    /// Player identifier
    pub player: String,
    /// Lag condition name
    pub lag: String,
    /// Control condition label
    pub condition: String,
    /// Loaded files
    pub data: RunData,
}

/// One row of the per-condition run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummaryRow {
    /// Run number
    pub run: u32,
    /// Mean player control input
    pub player_avg_control: Option<f64>,
    /// Sample std of player control input
    pub player_control_std: Option<f64>,
    /// Mean bot control input
    pub bot_avg_control: Option<f64>,
    /// Sample std of bot control input
    pub bot_control_std: Option<f64>,
    /// Latest player record time
    pub player_completion_time: Option<f64>,
    /// Latest bot record time
    pub bot_completion_time: Option<f64>,
    /// Player finish time from the lap-time log
    pub player_lap_time: Option<f64>,
    /// Bot finish time from the lap-time log
    pub bot_lap_time: Option<f64>,
    /// Total off-track time
    pub off_track_seconds: Option<f64>,
}

/// Run summaries of one player under one lag and control condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionReport {
    /// Player identifier
    pub player: String,
    /// Lag condition name
    pub lag: String,
    /// Control condition label
    pub condition: String,
    /// Report rows
    pub rows: Vec<RunSummaryRow>,
}

impl ConditionReport {
    /// Build from the runs matching this player, lag and condition
    pub fn from_runs(player: &str, lag: &str, condition: &str, runs: &[StudyRun]) -> Self {
        let rows = runs
            .iter()
            .filter(|r| r.player == player && r.lag == lag && r.condition == condition)
            .filter(|r| r.data.has_series())
            .map(|r| r.data.summary_row())
            .collect();

        Self {
            player: player.to_string(),
            lag: lag.to_string(),
            condition: condition.to_string(),
            rows,
        }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Completion times of one car across the rows that have one
    pub fn completion_times(&self, source: Source) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|r| match source {
                Source::Player => r.player_completion_time,
                Source::Bot => r.bot_completion_time,
            })
            .collect()
    }
}

/// One bot run in the bot performance report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotRunRow {
    /// Player identifier
    pub player: String,
    /// Lag condition name
    pub lag: String,
    /// Run number
    pub run: u32,
    /// Latest bot record time
    pub completion_time: Option<f64>,
    /// Mean absolute control input
    pub avg_abs_control: Option<f64>,
    /// Mean distance between target node and car
    pub path_deviation: Option<f64>,
}

/// Bot performance across every player, lag and run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotReport {
    /// One row per bot run
    pub runs: Vec<BotRunRow>,
    /// Completion-time summary over every bot run
    pub completion: Option<Summary>,
}

impl BotReport {
    /// Build from every run with a non-empty bot series
    pub fn from_runs(runs: &[StudyRun]) -> Self {
        let rows: Vec<BotRunRow> = runs
            .iter()
            .filter_map(|r| {
                let bot = r.data.bot.as_ref().filter(|s| !s.is_empty())?;
                Some(BotRunRow {
                    player: r.player.clone(),
                    lag: r.lag.clone(),
                    run: r.data.run,
                    completion_time: bot.completion_time(),
                    avg_abs_control: mean_abs(&bot.column(Field::Control)),
                    path_deviation: path_deviation(bot),
                })
            })
            .collect();

        let times: Vec<f64> = rows.iter().filter_map(|r| r.completion_time).collect();
        Self {
            completion: Summary::from_values(&times),
            runs: rows,
        }
    }
}

/// Mean completion time of one car for one player, lag and condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallRow {
    /// Control condition label
    pub condition: String,
    /// Player identifier
    pub player: String,
    /// Lag condition name
    pub lag: String,
    /// Which car the times belong to
    #[serde(rename = "type")]
    pub source: Source,
    /// Number of runs with a completion time
    pub runs: usize,
    /// Mean completion time
    pub mean_time: f64,
    /// Population standard deviation
    pub std_time: f64,
}

/// Completion times across every player, lag and condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallReport {
    /// Report rows
    pub rows: Vec<OverallRow>,
}

impl OverallReport {
    /// Build from condition reports; conditions without any time are left out
    pub fn from_conditions(reports: &[ConditionReport]) -> Self {
        let mut rows = Vec::new();
        for source in [Source::Player, Source::Bot] {
            for report in reports {
                let Some(summary) = Summary::from_values(&report.completion_times(source))
                else {
                    continue;
                };
                rows.push(OverallRow {
                    condition: report.condition.clone(),
                    player: report.player.clone(),
                    lag: report.lag.clone(),
                    source,
                    runs: summary.count,
                    mean_time: summary.mean,
                    std_time: summary.pop_std_dev,
                });
            }
        }
        Self { rows }
    }
}

/// Race time of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceEntry {
    /// Player identifier
    pub player: String,
    /// Lag condition name
    pub lag: String,
    /// Control condition label
    pub condition: String,
    /// Run number
    pub run: u32,
    /// Latest game time of the run
    pub time: f64,
}

/// Race-time statistics of one control condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceStatRow {
    /// Control condition label
    pub condition: String,
    /// Number of races
    pub races: usize,
    /// Mean race time
    pub mean: f64,
    /// Sample standard deviation; `None` below two races
    pub std_dev: Option<f64>,
    /// Best (lowest) race time
    pub min: f64,
    /// Worst (highest) race time
    pub max: f64,
}

/// Race times of every run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceReport {
    /// One entry per run with a race time
    pub entries: Vec<RaceEntry>,
}

impl RaceReport {
    /// Build from every run with a race time
    pub fn from_runs(runs: &[StudyRun]) -> Self {
        let entries = runs
            .iter()
            .filter_map(|r| {
                Some(RaceEntry {
                    player: r.player.clone(),
                    lag: r.lag.clone(),
                    condition: r.condition.clone(),
                    run: r.data.run,
                    time: r.data.race_time?,
                })
            })
            .collect();
        Self { entries }
    }

    /// Per-condition summaries, in first-seen condition order
    pub fn by_condition(&self) -> Vec<(String, Summary)> {
        let mut conditions: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !conditions.contains(&entry.condition.as_str()) {
                conditions.push(&entry.condition);
            }
        }

        conditions
            .into_iter()
            .filter_map(|condition| {
                let times: Vec<f64> = self
                    .entries
                    .iter()
                    .filter(|e| e.condition == condition)
                    .map(|e| e.time)
                    .collect();
                Some((condition.to_string(), Summary::from_values(&times)?))
            })
            .collect()
    }

    /// Per-condition statistics as table rows
    pub fn statistics(&self) -> Vec<RaceStatRow> {
        self.by_condition()
            .into_iter()
            .map(|(condition, summary)| RaceStatRow {
                condition,
                races: summary.count,
                mean: summary.mean,
                std_dev: summary.std_dev,
                min: summary.min,
                max: summary.max,
            })
            .collect()
    }

    /// Fastest run
    pub fn best(&self) -> Option<&RaceEntry> {
        self.entries.iter().min_by(|a, b| a.time.total_cmp(&b.time))
    }

    /// Summary over every run
    pub fn overall(&self) -> Option<Summary> {
        let times: Vec<f64> = self.entries.iter().map(|e| e.time).collect();
        Summary::from_values(&times)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::schema::LogKind;
    use crate::timing::Timestamp;
    use std::collections::BTreeMap;

    fn series(kind: LogKind, points: &[(f64, f64)]) -> RunSeries {
        let mut series = RunSeries::new(kind);
        for (t, control) in points {
            series.push(Record::new(
                Timestamp::Game(*t),
                BTreeMap::from([(Field::Control, *control)]),
            ));
        }
        series
    }

    fn study_run(run: u32, condition: &str, player_end: f64) -> StudyRun {
        let mut data = RunData::new(run);
        data.player = Some(series(LogKind::Player, &[(1.0, 0.5), (player_end, -0.5)]));
        data.bot = Some(series(LogKind::Bot, &[(1.0, 1.0), (40.0, 1.0)]));
        data.race_time = Some(player_end + 0.5);
        StudyRun {
            player: "F".to_string(),
            lag: "0 Lag".to_string(),
            condition: condition.to_string(),
            data,
        }
    }

    #[test]
    fn test_summary_row() {
        let run = study_run(1, "A", 50.0);
        let row = run.data.summary_row();
        assert_eq!(row.player_avg_control, Some(0.0));
        assert_eq!(row.player_completion_time, Some(50.0));
        assert_eq!(row.bot_control_std, Some(0.0));
        assert_eq!(row.player_lap_time, None);
        assert_eq!(row.off_track_seconds, None);
    }

    #[test]
    fn test_overall_uses_population_std() {
        let runs = vec![study_run(1, "A", 50.0), study_run(2, "A", 54.0)];
        let report = ConditionReport::from_runs("F", "0 Lag", "A", &runs);
        assert_eq!(report.rows.len(), 2);

        let overall = OverallReport::from_conditions(&[report]);
        assert_eq!(overall.rows.len(), 2);
        let player = &overall.rows[0];
        assert_eq!(player.source, Source::Player);
        assert_eq!(player.mean_time, 52.0);
        assert_eq!(player.std_time, 2.0);
        assert_eq!(overall.rows[1].std_time, 0.0);
    }

    #[test]
    fn test_race_report() {
        let runs = vec![
            study_run(1, "A", 50.0),
            study_run(6, "B", 40.0),
            study_run(7, "B", 44.0),
        ];
        let race = RaceReport::from_runs(&runs);
        let by_condition = race.by_condition();
        assert_eq!(by_condition.len(), 2);
        assert_eq!(by_condition[0].0, "A");
        assert_eq!(by_condition[1].1.mean, 42.5);
        assert_eq!(race.best().map(|e| e.run), Some(6));
        assert_eq!(race.overall().map(|s| s.count), Some(3));

        let stats = race.statistics();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].condition, "A");
        assert_eq!(stats[0].races, 1);
        assert_eq!(stats[0].std_dev, None);
        assert_eq!(stats[1].min, 40.5);
        assert_eq!(stats[1].max, 44.5);
        assert_eq!(stats[1].std_dev.map(|s| s > 0.0), Some(true));
    }
}
