//! Command-line front end for dustlog
//!
//! `dustlog parse` assembles one log, `lap-time` and `off-track` read the per-run
//! side logs, `runs` lists recorded runs and `analyze` builds every study report.

mod args;
mod commands;

pub use args::{Cli, Commands, LogLevel};
pub use commands::run;
