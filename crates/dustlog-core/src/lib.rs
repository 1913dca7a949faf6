//! # dustlog Core Library
//!
//! Core functionality for analyzing DustRacing2D telemetry logs.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Log record assembly (interleaved field lines into complete records)
//! - Lap-time and off-track extraction
//! - Run statistics (completion times, control input, path deviation)
//! - Study configuration, run discovery and reports
//! - CSV / JSON export
//!
//! ## Log kinds
//!
//! - Player car data (`cardata_N.log`)
//! - Bot data (`botdata_N.log`)
//! - Legacy AI path data (`aidata_N.log`)
//! - Lap times (`laptime_N.log`) and off-track flags (`offtrack_N.log`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use dustlog_core::{assembler::Assembler, schema::LogSchema};
//!
//! let series = Assembler::new(LogSchema::bot()).read_file("logs/F/0 Lag/botdata_3.log")?;
//! println!("{} records, finished at {:?}", series.len(), series.completion_time());
//! ```

pub mod assembler;
pub mod error;
pub mod export;
pub mod lap_time;
pub mod off_track;
pub mod record;
pub mod schema;
pub mod stats;
pub mod study;
pub mod timing;

pub use error::LogError;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::assembler::{Assembler, RecordBuilder};
    pub use crate::error::LogError;
    pub use crate::export::ExportFormat;
    pub use crate::lap_time::LapTimes;
    pub use crate::off_track::OffTrackSummary;
    pub use crate::record::{
        BotSample, FromRecord, PathSample, PlayerSample, Record, RunSeries, Sample,
        SteeringSample,
    };
    pub use crate::schema::{Field, FieldPattern, FieldSet, LogKind, LogSchema};
    pub use crate::stats::Summary;
    pub use crate::study::{RunLocator, Study, StudyConfig};
    pub use crate::timing::{Timestamp, TimestampKind};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
