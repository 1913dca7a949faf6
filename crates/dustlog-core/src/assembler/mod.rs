//! Log Record Assembler
//!
//! Turns an interleaved stream of log lines into complete records. Each line that
//! carries the schema's timestamp and one of its field markers contributes its
//! values to a pending record; once every required field is present the record is
//! emitted and the builder starts over.
//!
//! Lines without the timestamp, without a known marker, or with a value that does
//! not parse as a number contribute nothing. An incomplete record at the end of the
//! input is dropped.

mod builder;

pub use builder::RecordBuilder;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LogError;
use crate::record::{Record, RunSeries};
use crate::schema::LogSchema;

/// Line counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Lines read
    pub lines: usize,
    /// Lines carrying the schema's timestamp
    pub stamped: usize,
    /// Lines whose values were stored
    pub matched: usize,
    /// Records emitted
    pub records: usize,
}

/// Assembles records for one log schema
#[derive(Debug, Clone)]
pub struct Assembler {
    schema: LogSchema,
    builder: RecordBuilder,
    stats: ScanStats,
}

impl Assembler {
    /// Create an assembler with an empty pending record
    pub fn new(schema: LogSchema) -> Self {
        let builder = RecordBuilder::new(schema.required());
        Self {
            schema,
            builder,
            stats: ScanStats::default(),
        }
    }

    /// Schema in use
    pub fn schema(&self) -> &LogSchema {
        &self.schema
    }

    /// Counters so far
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// The record currently being assembled
    pub fn pending(&self) -> &RecordBuilder {
        &self.builder
    }

    /// Feed one line; returns a record when this line completes one
    pub fn push_line(&mut self, line: &str) -> Option<Record> {
        self.stats.lines += 1;

        let timestamp = self.schema.timestamp().extract(line)?;
        self.stats.stamped += 1;

        let values = self.schema.match_line(line)?.extract(line)?;
        self.stats.matched += 1;

        let record = self.builder.apply(timestamp, values)?;
        self.stats.records += 1;
        Some(record)
    }

    /// Assemble every record from a sequence of lines
    pub fn assemble<I, S>(mut self, lines: I) -> RunSeries
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.assemble_lines(lines)
    }

    /// Like [`Assembler::assemble`], keeping the assembler for its [`ScanStats`]
    pub fn assemble_lines<I, S>(&mut self, lines: I) -> RunSeries
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut series = RunSeries::new(self.schema.kind());
        for line in lines {
            if let Some(record) = self.push_line(line.as_ref()) {
                series.push(record);
            }
        }
        series
    }

    /// Assemble every record from a reader
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn read<R: BufRead>(mut self, reader: R) -> std::io::Result<RunSeries> {
        self.scan(reader)
    }

    /// Assemble every record from a log file
    pub fn read_file<P: AsRef<Path>>(mut self, path: P) -> Result<RunSeries, LogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LogError::from_io(path, e))?;
        let series = self
            .scan(BufReader::new(file))
            .map_err(|e| LogError::from_io(path, e))?;

        tracing::debug!(
            path = %path.display(),
            kind = %self.schema.kind(),
            lines = self.stats.lines,
            matched = self.stats.matched,
            records = self.stats.records,
            "assembled log"
        );
        Ok(series)
    }

    fn scan<R: BufRead>(&mut self, mut reader: R) -> std::io::Result<RunSeries> {
        let mut series = RunSeries::new(self.schema.kind());
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            if let Some(record) = self.push_line(&line) {
                series.push(record);
            }
        }
        Ok(series)
    }
}

/// Assemble a line sequence with a fresh assembler
pub fn assemble<I, S>(schema: LogSchema, lines: I) -> RunSeries
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Assembler::new(schema).assemble(lines)
}
