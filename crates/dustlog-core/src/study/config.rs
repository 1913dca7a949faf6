//! Study configuration stored in study.json

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::error::LogError;

/// How run log files are laid out under the base directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLayout {
    /// `base/<prefix><run>.log`
    Flat,
    /// `base/<player>/<prefix><run>.log`
    PerPlayer,
    /// `base/<player>/<lag>/<prefix><run>.log`
    #[default]
    PerPlayerLag,
}

/// A simulated input-lag condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LagCondition {
    /// Directory and report name (e.g. "200 Lag")
    pub name: String,

    /// Injected delay in milliseconds
    pub delay_ms: u32,
}

/// A control-assistance condition and the runs recorded under it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlCondition {
    /// Report name (e.g. "0.2 Control Assistance")
    pub label: String,

    /// Steering assistance level (0.0 = none, 1.0 = full)
    pub assistance: f64,

    /// First run number recorded under this condition
    pub first_run: u32,

    /// Number of consecutive runs
    pub run_count: u32,
}

impl ControlCondition {
    /// One past the last run number; `None` if it does not fit in a `u32`
    pub fn end_run(&self) -> Option<u32> {
        self.first_run.checked_add(self.run_count)
    }

    /// Run numbers of this condition
    ///
    /// Empty when the range overflows; `StudyConfig::validate` rejects such conditions.
    pub fn runs(&self) -> Range<u32> {
        self.first_run..self.end_run().unwrap_or(self.first_run)
    }
}

/// Study configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Config version for migrations
    #[serde(default = "default_version")]
    pub version: String,

    /// Study display name
    #[serde(default)]
    pub name: String,

    /// When the config was written
    #[serde(default)]
    pub created: String,

    /// Root of the run logs
    pub base_dir: PathBuf,

    /// Where reports are written
    pub output_dir: PathBuf,

    /// Player identifiers (directory names)
    pub players: Vec<String>,

    /// Lag conditions
    pub lag_conditions: Vec<LagCondition>,

    /// Control-assistance conditions
    pub conditions: Vec<ControlCondition>,

    /// Directory layout of the logs
    #[serde(default)]
    pub layout: LogLayout,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for StudyConfig {
    fn default() -> Self {
        let condition = |label: &str, assistance, first_run| ControlCondition {
            label: label.to_string(),
            assistance,
            first_run,
            run_count: 5,
        };

        Self {
            version: default_version(),
            name: "Cloud game latency study".to_string(),
            created: Utc::now().to_rfc3339(),
            base_dir: PathBuf::from("logs"),
            output_dir: PathBuf::from("analysis"),
            players: vec!["F".to_string(), "J".to_string(), "M".to_string()],
            lag_conditions: vec![
                LagCondition {
                    name: "0 Lag".to_string(),
                    delay_ms: 0,
                },
                LagCondition {
                    name: "200 Lag".to_string(),
                    delay_ms: 200,
                },
            ],
            conditions: vec![
                condition("1.0 Control Assistance", 1.0, 1),
                condition("0.0 Control Assistance", 0.0, 6),
                condition("0.2 Control Assistance", 0.2, 11),
            ],
            layout: LogLayout::PerPlayerLag,
        }
    }
}

impl StudyConfig {
    /// Load and validate a config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LogError::from_io(path, e))?;
        let config: StudyConfig = serde_json::from_str(&content)
            .map_err(|e| LogError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LogError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| LogError::from_io(path, e))
    }

    /// Override the log root
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Override the report directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<(), LogError> {
        if self.players.is_empty() {
            return Err(LogError::Config("no players configured".to_string()));
        }
        if self.lag_conditions.is_empty() {
            return Err(LogError::Config("no lag conditions configured".to_string()));
        }
        if self.conditions.is_empty() {
            return Err(LogError::Config(
                "no control conditions configured".to_string(),
            ));
        }
        if let Some(c) = self.conditions.iter().find(|c| c.run_count == 0) {
            return Err(LogError::Config(format!(
                "condition '{}' has no runs",
                c.label
            )));
        }
        if let Some(c) = self.conditions.iter().find(|c| c.end_run().is_none()) {
            return Err(LogError::Config(format!(
                "condition '{}' run numbers overflow (first_run {}, run_count {})",
                c.label, c.first_run, c.run_count
            )));
        }
        Ok(())
    }

    /// Condition a run number belongs to
    pub fn condition_for_run(&self, run: u32) -> Option<&ControlCondition> {
        self.conditions.iter().find(|c| c.runs().contains(&run))
    }

    /// Every run number of every condition, in condition order
    pub fn all_runs(&self) -> impl Iterator<Item = u32> + '_ {
        self.conditions.iter().flat_map(|c| c.runs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StudyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.all_runs().count(), 15);
        assert_eq!(
            config.condition_for_run(7).map(|c| c.label.as_str()),
            Some("0.0 Control Assistance")
        );
        assert!(config.condition_for_run(16).is_none());
    }

    #[test]
    fn test_validation() {
        let mut config = StudyConfig::default();
        config.conditions[1].run_count = 0;
        assert!(config.validate().is_err());

        let config = StudyConfig {
            players: Vec::new(),
            ..StudyConfig::default()
        };
        assert!(config.validate().is_err());

        let mut config = StudyConfig::default();
        config.conditions[0].first_run = u32::MAX;
        config.conditions[0].run_count = 5;
        assert!(config.validate().is_err());
        assert_eq!(config.conditions[0].runs().count(), 0);
        assert_eq!(config.all_runs().count(), 10);
    }

    #[test]
    fn test_minimal_config_file() {
        let json = r#"{
            "base_dir": "logs",
            "output_dir": "out",
            "players": ["F"],
            "lag_conditions": [{ "name": "0 Lag", "delay_ms": 0 }],
            "conditions": [
                { "label": "A", "assistance": 1.0, "first_run": 1, "run_count": 2 }
            ]
        }"#;
        let config: StudyConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, "");
        assert_eq!(config.layout, LogLayout::PerPlayerLag);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layout_defaults_when_missing() {
        let mut value = serde_json::to_value(StudyConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("layout");
        let config: StudyConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.layout, LogLayout::PerPlayerLag);
    }
}
