//! Field patterns
//!
//! A pattern pairs a marker substring (cheap pre-check) with a regex whose capture
//! groups feed one or more fields, in order.

use regex::Regex;

use super::Field;
use crate::error::LogError;

/// Numeric capture used by every scalar marker
const NUMBER: &str = r"([\d\.-]+)";

/// A labeled field-value pattern
#[derive(Debug, Clone)]
pub struct FieldPattern {
    marker: String,
    regex: Regex,
    fields: Vec<Field>,
}

impl FieldPattern {
    /// Create a pattern from a marker, a regex and the fields its groups feed
    ///
    /// The regex must have exactly one capture group per field.
    pub fn new(
        marker: impl Into<String>,
        pattern: &str,
        fields: Vec<Field>,
    ) -> Result<Self, LogError> {
        let marker = marker.into();
        let regex = Regex::new(pattern)
            .map_err(|e| LogError::Config(format!("pattern for '{}': {}", marker, e)))?;

        if fields.is_empty() {
            return Err(LogError::Config(format!(
                "pattern for '{}' feeds no fields",
                marker
            )));
        }
        let groups = regex.captures_len() - 1;
        if groups != fields.len() {
            return Err(LogError::Config(format!(
                "pattern for '{}' has {} capture groups but feeds {} fields",
                marker,
                groups,
                fields.len()
            )));
        }

        Ok(Self {
            marker,
            regex,
            fields,
        })
    }

    /// A single-value pattern: `<marker>\s*<number>`
    pub fn scalar(marker: impl Into<String>, field: Field) -> Result<Self, LogError> {
        let marker = marker.into();
        let pattern = format!(r"{}\s*{}", regex::escape(&marker), NUMBER);
        Self::new(marker, &pattern, vec![field])
    }

    /// Marker substring
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Fields fed by this pattern, in capture order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Whether this pattern fills more than one slot
    pub fn is_multi_value(&self) -> bool {
        self.fields.len() > 1
    }

    /// Cheap check: does the line carry this pattern's marker
    pub fn matches_marker(&self, line: &str) -> bool {
        line.contains(self.marker.as_str())
    }

    /// Extract every field value from a line
    ///
    /// All-or-nothing: if the regex does not match or any capture is not a valid
    /// number, nothing is returned.
    pub fn extract(&self, line: &str) -> Option<Vec<(Field, f64)>> {
        let caps = self.regex.captures(line)?;
        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = caps.get(i + 1)?.as_str().parse::<f64>().ok()?;
                Some((*field, value))
            })
            .collect()
    }
}
