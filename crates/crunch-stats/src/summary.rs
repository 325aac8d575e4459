use crunch_core::{CrunchError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one timing series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Largest sample.
    pub max: f64,
    /// Sample standard deviation (n - 1 denominator).
    pub stdev: f64,
    /// Sum of all samples.
    pub sum: f64,
}

impl Summary {
    /// Summarises `times`. At least two samples are required for a deviation.
    pub fn from_times(times: &[f64]) -> Result<Self, CrunchError> {
        if times.len() < 2 {
            return Err(CrunchError::Stats(
                ErrorInfo::new(
                    "insufficient-samples",
                    "standard deviation needs at least two samples",
                )
                .with_context("samples", times.len().to_string()),
            ));
        }
        let count = times.len();
        let sum: f64 = times.iter().sum();
        let mean = sum / count as f64;
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let squares: f64 = times.iter().map(|t| (t - mean).powi(2)).sum();
        let stdev = (squares / (count - 1) as f64).sqrt();
        Ok(Self {
            count,
            mean,
            max,
            stdev,
            sum,
        })
    }

    /// Mean, max, stdev and sum, in table column order.
    pub fn columns(&self) -> [f64; 4] {
        [self.mean, self.max, self.stdev, self.sum]
    }
}
