//! Error types for log loading, configuration and export
//!
//! Nothing at line level is an error: unmatched or malformed lines are skipped by
//! the parsers. These variants cover whole-file and whole-report failures only.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading logs or writing results
#[derive(Error, Debug)]
pub enum LogError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A log or config file does not exist
    #[error("Log file not found: {0}")]
    NotFound(PathBuf),

    /// Study config or schema is invalid
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Writing a report failed
    #[error("Export error: {0}")]
    Export(String),
}

impl LogError {
    /// Wrap an I/O error for `path`, mapping `NotFound` to its own variant
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            LogError::NotFound(path)
        } else {
            LogError::Io { path, source }
        }
    }

    /// Whether this error means the file simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, LogError::NotFound(_))
    }
}

impl From<csv::Error> for LogError {
    fn from(e: csv::Error) -> Self {
        LogError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for LogError {
    fn from(e: serde_json::Error) -> Self {
        LogError::Export(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_mapping() {
        let err = LogError::from_io(
            "logs/cardata_1.log",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Log file not found: logs/cardata_1.log");

        let err = LogError::from_io(
            "logs/cardata_1.log",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(!err.is_not_found());
    }
}
