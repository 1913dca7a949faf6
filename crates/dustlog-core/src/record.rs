//! Assembled records and run series
//!
//! A [`Record`] is one complete timestep as emitted by the assembler. A
//! [`RunSeries`] is the ordered list of records from one log file. Typed samples
//! give each log kind a fixed shape for downstream consumers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{Field, FieldSet, LogKind};
use crate::timing::Timestamp;

/// One complete, immutable record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Timestamp of the last field line that went into this record
    pub timestamp: Timestamp,
    /// Field values
    pub values: BTreeMap<Field, f64>,
}

impl Record {
    /// Create a new record
    pub fn new(timestamp: Timestamp, values: BTreeMap<Field, f64>) -> Self {
        Self { timestamp, values }
    }

    /// Value of a field
    pub fn get(&self, field: Field) -> Option<f64> {
        self.values.get(&field).copied()
    }

    /// In-game seconds, if keyed on the game clock
    pub fn seconds(&self) -> Option<f64> {
        self.timestamp.seconds()
    }

    /// Fields present in this record
    pub fn fields(&self) -> FieldSet {
        self.values.keys().copied().collect()
    }
}

/// Fixed-shape view of a record for one log kind
pub trait FromRecord: Sized {
    /// Log kind this sample shape belongs to
    const KIND: LogKind;

    /// Build the sample; `None` if a field is missing
    fn from_record(record: &Record) -> Option<Self>;
}

/// Player car sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSample {
    /// Record timestamp
    pub timestamp: Timestamp,
    /// Car location, i component
    pub car_x: f64,
    /// Car location, j component
    pub car_y: f64,
    /// Continuous target heading
    pub target_angle: f64,
    /// Continuous current heading
    pub current_angle: f64,
    /// Target minus current heading
    pub diff: f64,
    /// Control input
    pub control: f64,
}

impl FromRecord for PlayerSample {
    const KIND: LogKind = LogKind::Player;

    fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            timestamp: record.timestamp.clone(),
            car_x: record.get(Field::CarX)?,
            car_y: record.get(Field::CarY)?,
            target_angle: record.get(Field::TargetAngle)?,
            current_angle: record.get(Field::CurrentAngle)?,
            diff: record.get(Field::Diff)?,
            control: record.get(Field::Control)?,
        })
    }
}

/// Bot car sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotSample {
    /// Record timestamp
    pub timestamp: Timestamp,
    /// Target node X
    pub target_x: f64,
    /// Target node Y
    pub target_y: f64,
    /// Car location, i component
    pub car_x: f64,
    /// Car location, j component
    pub car_y: f64,
    /// Continuous target heading
    pub target_angle: f64,
    /// Continuous current heading
    pub current_angle: f64,
    /// Target minus current heading
    pub diff: f64,
    /// Control input
    pub control: f64,
}

impl BotSample {
    /// Distance between the car and its target node
    pub fn target_distance(&self) -> f64 {
        (self.target_x - self.car_x).hypot(self.target_y - self.car_y)
    }
}

impl FromRecord for BotSample {
    const KIND: LogKind = LogKind::Bot;

    fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            timestamp: record.timestamp.clone(),
            target_x: record.get(Field::TargetX)?,
            target_y: record.get(Field::TargetY)?,
            car_x: record.get(Field::CarX)?,
            car_y: record.get(Field::CarY)?,
            target_angle: record.get(Field::TargetAngle)?,
            current_angle: record.get(Field::CurrentAngle)?,
            diff: record.get(Field::Diff)?,
            control: record.get(Field::Control)?,
        })
    }
}

/// Legacy AI path sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    /// Record timestamp
    pub timestamp: Timestamp,
    /// Target node X
    pub target_x: f64,
    /// Target node Y
    pub target_y: f64,
    /// Car location, i component
    pub car_x: f64,
    /// Car location, j component
    pub car_y: f64,
}

impl FromRecord for PathSample {
    const KIND: LogKind = LogKind::AiPath;

    fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            timestamp: record.timestamp.clone(),
            target_x: record.get(Field::TargetX)?,
            target_y: record.get(Field::TargetY)?,
            car_x: record.get(Field::CarX)?,
            car_y: record.get(Field::CarY)?,
        })
    }
}

/// Legacy steering sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteeringSample {
    /// Record timestamp
    pub timestamp: Timestamp,
    /// Steering target angle
    pub angle: f64,
    /// Steering current angle
    pub current: f64,
    /// Target minus current heading
    pub diff: f64,
    /// Control input
    pub control: f64,
}

impl FromRecord for SteeringSample {
    const KIND: LogKind = LogKind::Steering;

    fn from_record(record: &Record) -> Option<Self> {
        Some(Self {
            timestamp: record.timestamp.clone(),
            angle: record.get(Field::SteerAngle)?,
            current: record.get(Field::SteerCurrent)?,
            diff: record.get(Field::Diff)?,
            control: record.get(Field::Control)?,
        })
    }
}

/// A typed sample of any log kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Sample {
    /// Player car sample
    Player(PlayerSample),
    /// Bot sample
    Bot(BotSample),
    /// Legacy AI path sample
    AiPath(PathSample),
    /// Legacy steering sample
    Steering(SteeringSample),
}

impl Sample {
    /// Build the typed sample for `kind`
    pub fn from_record(kind: LogKind, record: &Record) -> Option<Self> {
        match kind {
            LogKind::Player => PlayerSample::from_record(record).map(Sample::Player),
            LogKind::Bot => BotSample::from_record(record).map(Sample::Bot),
            LogKind::AiPath => PathSample::from_record(record).map(Sample::AiPath),
            LogKind::Steering => SteeringSample::from_record(record).map(Sample::Steering),
        }
    }

    /// Timestamp of the underlying record
    pub fn timestamp(&self) -> &Timestamp {
        match self {
            Sample::Player(s) => &s.timestamp,
            Sample::Bot(s) => &s.timestamp,
            Sample::AiPath(s) => &s.timestamp,
            Sample::Steering(s) => &s.timestamp,
        }
    }
}

/// Ordered records from one log file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSeries {
    kind: LogKind,
    records: Vec<Record>,
}

impl RunSeries {
    /// Create an empty series
    pub fn new(kind: LogKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    /// Append a record
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Log kind
    pub fn kind(&self) -> LogKind {
        self.kind
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get all records
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Values of one field, in record order
    pub fn column(&self, field: Field) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.get(field)).collect()
    }

    /// Game seconds of every record
    pub fn times(&self) -> Vec<f64> {
        self.records.iter().filter_map(Record::seconds).collect()
    }

    /// Latest game time among the records
    pub fn completion_time(&self) -> Option<f64> {
        self.times().into_iter().reduce(f64::max)
    }

    /// Records whose game time lies in `[start, end]`
    pub fn records_in_range(&self, start: f64, end: f64) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(move |r| r.seconds().is_some_and(|t| t >= start && t <= end))
    }

    /// Typed view of every record
    ///
    /// Empty if `T` belongs to another log kind.
    pub fn samples<T: FromRecord>(&self) -> Vec<T> {
        if T::KIND != self.kind {
            return Vec::new();
        }
        self.records.iter().filter_map(T::from_record).collect()
    }

    /// Tagged typed view of every record
    pub fn tagged_samples(&self) -> Vec<Sample> {
        self.records
            .iter()
            .filter_map(|r| Sample::from_record(self.kind, r))
            .collect()
    }
}
