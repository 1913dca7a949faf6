//! Log schemas
//!
//! A schema describes one kind of log file: which timestamp keys its records,
//! which labeled patterns it carries and which fields make a record complete.
//!
//! The built-in schemas match what the game writes:
//!
//! | kind       | prefix     | fields |
//! |------------|------------|--------|
//! | `player`   | `cardata_` | car position, continuous angles, track assistance diff/control |
//! | `bot`      | `botdata_` | target node, car position, continuous angles, steer diff/control |
//! | `ai-path`  | `aidata_`  | target node, car position |
//! | `steering` | `cardata_` | one `angle=, cur=, diff=, control=` line per record |

mod field;
mod pattern;

pub use field::{Field, FieldSet};
pub use pattern::FieldPattern;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::LogError;
use crate::timing::TimestampKind;

const ANGLE_PAIR: &str = r"target=([\d\.-]+), current=([\d\.-]+)";
const DIFF_CONTROL: &str = r"angle=[\d\.-]+, cur=[\d\.-]+, diff=([\d\.-]+), control=([\d\.-]+)";
const STEERING_LINE: &str =
    r"angle=([\d\.-]+), cur=([\d\.-]+), diff=([\d\.-]+), control=([\d\.-]+)";

/// Kind of telemetry log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogKind {
    /// Human player car data
    Player,
    /// Bot car data
    Bot,
    /// Legacy AI position log (target node and car location only)
    AiPath,
    /// Legacy single-line steering log
    Steering,
}

impl LogKind {
    /// All kinds
    pub const ALL: [LogKind; 4] = [
        LogKind::Player,
        LogKind::Bot,
        LogKind::AiPath,
        LogKind::Steering,
    ];

    /// Name used on the command line and in reports
    pub fn name(&self) -> &'static str {
        match self {
            LogKind::Player => "player",
            LogKind::Bot => "bot",
            LogKind::AiPath => "ai-path",
            LogKind::Steering => "steering",
        }
    }

    /// File name prefix the game uses for this kind (`<prefix><run>.log`)
    pub fn file_prefix(&self) -> &'static str {
        match self {
            LogKind::Player | LogKind::Steering => "cardata_",
            LogKind::Bot => "botdata_",
            LogKind::AiPath => "aidata_",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogKind::ALL
            .into_iter()
            .find(|k| k.name() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "unknown log kind '{}' (expected one of: player, bot, ai-path, steering)",
                    s
                )
            })
    }
}

/// Field-pattern table for one log kind
#[derive(Debug, Clone)]
pub struct LogSchema {
    kind: LogKind,
    timestamp: TimestampKind,
    patterns: Vec<FieldPattern>,
    required: FieldSet,
}

static PLAYER: LazyLock<LogSchema> = LazyLock::new(|| {
    LogSchema::new(
        LogKind::Player,
        TimestampKind::Game,
        vec![
            FieldPattern::scalar("car Location i=", Field::CarX),
            FieldPattern::scalar("car Location j=", Field::CarY),
            FieldPattern::new(
                "Continuous angles:",
                ANGLE_PAIR,
                vec![Field::TargetAngle, Field::CurrentAngle],
            ),
            FieldPattern::new(
                "Track assistance:",
                DIFF_CONTROL,
                vec![Field::Diff, Field::Control],
            ),
        ],
    )
    .expect("player schema")
});

static BOT: LazyLock<LogSchema> = LazyLock::new(|| {
    LogSchema::new(
        LogKind::Bot,
        TimestampKind::Game,
        vec![
            FieldPattern::scalar("targetNode X:", Field::TargetX),
            FieldPattern::scalar("targetNode Y:", Field::TargetY),
            FieldPattern::scalar("car Location i:", Field::CarX),
            FieldPattern::scalar("car Location j:", Field::CarY),
            FieldPattern::new(
                "Continuous angles:",
                ANGLE_PAIR,
                vec![Field::TargetAngle, Field::CurrentAngle],
            ),
            FieldPattern::new(
                "steerControl: angle=",
                DIFF_CONTROL,
                vec![Field::Diff, Field::Control],
            ),
        ],
    )
    .expect("bot schema")
});

static AI_PATH: LazyLock<LogSchema> = LazyLock::new(|| {
    LogSchema::new(
        LogKind::AiPath,
        TimestampKind::Game,
        vec![
            FieldPattern::scalar("targetNode X:", Field::TargetX),
            FieldPattern::scalar("targetNode Y:", Field::TargetY),
            FieldPattern::scalar("car Location i:", Field::CarX),
            FieldPattern::scalar("car Location j:", Field::CarY),
        ],
    )
    .expect("ai path schema")
});

static STEERING: LazyLock<LogSchema> = LazyLock::new(|| {
    LogSchema::new(
        LogKind::Steering,
        TimestampKind::Game,
        vec![FieldPattern::new(
            "angle=",
            STEERING_LINE,
            vec![
                Field::SteerAngle,
                Field::SteerCurrent,
                Field::Diff,
                Field::Control,
            ],
        )],
    )
    .expect("steering schema")
});

impl LogSchema {
    /// Build a schema; the required set is every field the patterns feed
    pub fn new(
        kind: LogKind,
        timestamp: TimestampKind,
        patterns: Vec<Result<FieldPattern, LogError>>,
    ) -> Result<Self, LogError> {
        let patterns = patterns.into_iter().collect::<Result<Vec<_>, _>>()?;
        if patterns.is_empty() {
            return Err(LogError::Config(format!("schema '{}' has no patterns", kind)));
        }
        let required = patterns
            .iter()
            .flat_map(|p| p.fields().iter().copied())
            .collect();

        Ok(Self {
            kind,
            timestamp,
            patterns,
            required,
        })
    }

    /// Built-in schema for a log kind
    pub fn for_kind(kind: LogKind) -> Self {
        match kind {
            LogKind::Player => Self::player(),
            LogKind::Bot => Self::bot(),
            LogKind::AiPath => Self::ai_path(),
            LogKind::Steering => Self::steering(),
        }
    }

    /// Player car log (`cardata_N.log`), six fields per record
    pub fn player() -> Self {
        PLAYER.clone()
    }

    /// Bot log (`botdata_N.log`), eight fields per record
    pub fn bot() -> Self {
        BOT.clone()
    }

    /// Legacy AI path log (`aidata_N.log`), four fields per record
    pub fn ai_path() -> Self {
        AI_PATH.clone()
    }

    /// Legacy steering log, one line per record
    pub fn steering() -> Self {
        STEERING.clone()
    }

    /// Key records on a different line stamp
    pub fn with_timestamp(mut self, timestamp: TimestampKind) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Log kind
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    /// Timestamp kind
    pub fn timestamp(&self) -> TimestampKind {
        self.timestamp
    }

    /// Patterns, in matching order
    pub fn patterns(&self) -> &[FieldPattern] {
        &self.patterns
    }

    /// Fields a record needs before it is emitted
    pub fn required(&self) -> FieldSet {
        self.required
    }

    /// First pattern whose marker occurs in the line
    ///
    /// Markers are mutually exclusive in practice; schema order decides otherwise.
    pub fn match_line(&self, line: &str) -> Option<&FieldPattern> {
        self.patterns.iter().find(|p| p.matches_marker(line))
    }
}
