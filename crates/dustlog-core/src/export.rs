//! Result export
//!
//! Record series and report rows are written as CSV or JSON; the race summary is
//! plain text.

use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::LogError;
use crate::record::RunSeries;
use crate::schema::LogSchema;
use crate::study::RaceReport;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl ExportFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }

    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Write a record series, one row per record
///
/// CSV columns are `time` followed by the schema's fields in a fixed order.
pub fn write_series<P: AsRef<Path>>(
    path: P,
    series: &RunSeries,
    format: ExportFormat,
) -> Result<(), LogError> {
    let path = path.as_ref();
    match format {
        ExportFormat::Json => write_json(path, series.records()),
        ExportFormat::Csv => {
            let fields: Vec<_> = LogSchema::for_kind(series.kind()).required().iter().collect();
            let mut writer = csv::Writer::from_path(path)?;

            let mut header = vec!["time".to_string()];
            header.extend(fields.iter().map(|f| f.name().to_string()));
            writer.write_record(&header)?;

            for record in series.records() {
                let mut row = vec![record.timestamp.to_string()];
                row.extend(
                    fields
                        .iter()
                        .map(|f| record.get(*f).map(|v| v.to_string()).unwrap_or_default()),
                );
                writer.write_record(&row)?;
            }
            writer.flush().map_err(|e| LogError::from_io(path, e))?;
            Ok(())
        }
    }
}

/// Write report rows; missing values become empty CSV cells or JSON `null`
pub fn write_rows<P, T>(path: P, rows: &[T], format: ExportFormat) -> Result<(), LogError>
where
    P: AsRef<Path>,
    T: Serialize,
{
    let path = path.as_ref();
    match format {
        ExportFormat::Json => write_json(path, rows),
        ExportFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush().map_err(|e| LogError::from_io(path, e))?;
            Ok(())
        }
    }
}

/// Write the plain-text race summary
pub fn write_race_summary<P: AsRef<Path>>(path: P, report: &RaceReport) -> Result<(), LogError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| LogError::from_io(path, e))?;
    let mut writer = BufWriter::new(file);
    render_race_summary(&mut writer, report)
        .and_then(|_| writer.flush())
        .map_err(|e| LogError::from_io(path, e))
}

/// Render the race summary text
pub fn render_race_summary<W: Write>(out: &mut W, report: &RaceReport) -> std::io::Result<()> {
    writeln!(out, "RACE TIME SUMMARY")?;
    writeln!(out, "=================")?;

    for (condition, summary) in report.by_condition() {
        writeln!(out)?;
        writeln!(out, "{}:", condition)?;
        writeln!(out, "  Average: {:.2}s", summary.mean)?;
        writeln!(out, "  Best:    {:.2}s", summary.min)?;
        writeln!(out, "  Worst:   {:.2}s", summary.max)?;
        match summary.std_dev {
            Some(std) => writeln!(out, "  Std Dev: {:.2}s", std)?,
            None => writeln!(out, "  Std Dev: n/a")?,
        }
    }

    writeln!(out)?;
    match report.best() {
        Some(best) => writeln!(
            out,
            "Best run: {} {} {} run {} ({:.2}s)",
            best.player, best.lag, best.condition, best.run, best.time
        )?,
        None => writeln!(out, "Best run: none")?,
    }
    if let Some(overall) = report.overall() {
        writeln!(out, "Overall average: {:.2}s", overall.mean)?;
    }
    writeln!(out, "Total races: {}", report.entries.len())?;
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), LogError> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).map_err(|e| LogError::from_io(path, e))
}
