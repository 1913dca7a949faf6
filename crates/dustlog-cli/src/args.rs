use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use dustlog_core::schema::LogKind;

#[derive(Parser, Debug)]
#[command(name = "dustlog")]
#[command(about = "Assemble and analyze DustRacing2D telemetry logs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = "info", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Assemble the records of one log file
    Parse {
        file: PathBuf,

        /// Log kind: player, bot, ai-path or steering
        #[arg(long)]
        kind: LogKind,

        /// Key records on the wall-clock timestamp instead of game time
        #[arg(long)]
        wall_clock: bool,

        /// Write the records to a .csv or .json file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Print the finish times of a lap-time log
    LapTime { file: PathBuf },

    /// Print the off-track time of an off-track log
    OffTrack { file: PathBuf },

    /// List the run numbers present in a directory
    Runs {
        dir: PathBuf,

        #[arg(long, default_value = "cardata_")]
        prefix: String,
    },

    /// Analyze a whole study and write the reports
    Analyze {
        /// Study config (defaults to the built-in study)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        base_dir: Option<PathBuf>,

        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Write the default study config
    InitConfig { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}
