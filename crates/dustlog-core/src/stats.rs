//! Descriptive statistics over run values

use serde::{Deserialize, Serialize};

use crate::record::RunSeries;
use crate::schema::Field;

/// Count, mean, spread and range of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of values
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1); `None` below two values
    pub std_dev: Option<f64>,
    /// Population standard deviation (n)
    pub pop_std_dev: f64,
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
}

impl Summary {
    /// Summarize a slice; `None` when it is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mean = mean(values)?;
        let n = values.len() as f64;
        let sq_dev: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();

        let std_dev = (values.len() > 1).then(|| (sq_dev / (n - 1.0)).sqrt());
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            count: values.len(),
            mean,
            std_dev,
            pop_std_dev: (sq_dev / n).sqrt(),
            min,
            max,
        })
    }
}

/// Arithmetic mean; `None` when empty
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Mean of absolute values; `None` when empty
pub fn mean_abs(values: &[f64]) -> Option<f64> {
    let abs: Vec<f64> = values.iter().map(|v| v.abs()).collect();
    mean(&abs)
}

/// Mean Euclidean distance between target node and car position
///
/// Uses every record carrying all four coordinates; `None` if there are none.
pub fn path_deviation(series: &RunSeries) -> Option<f64> {
    let distances: Vec<f64> = series
        .records()
        .iter()
        .filter_map(|r| {
            let dx = r.get(Field::TargetX)? - r.get(Field::CarX)?;
            let dy = r.get(Field::TargetY)? - r.get(Field::CarY)?;
            Some(dx.hypot(dy))
        })
        .collect();
    mean(&distances)
}
