//! Length check and differencing ahead of estimation.

use crate::core::DailySeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{difference, initial_values, undifference};

/// A daily series differenced to order `d`, ready for ARMA estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    original: Vec<f64>,
    differenced: Vec<f64>,
    d: usize,
}

impl PreparedSeries {
    /// Counts on the original scale.
    pub fn original(&self) -> &[f64] {
        &self.original
    }

    /// Counts after `d` rounds of differencing.
    pub fn differenced(&self) -> &[f64] {
        &self.differenced
    }

    /// Differencing order applied.
    pub fn order(&self) -> usize {
        self.d
    }

    /// Rebuild the original counts from the differenced values.
    pub fn restore(&self) -> Vec<f64> {
        undifference(&self.differenced, &initial_values(&self.original, self.d))
    }
}

/// Reject series shorter than `min_points`, then difference `d` times.
pub fn prepare(series: &DailySeries, d: usize, min_points: usize) -> Result<PreparedSeries> {
    let needed = min_points.max(d + 1);
    if series.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: series.len(),
        });
    }

    let original = series.values();
    let differenced = difference(&original, d);

    Ok(PreparedSeries {
        original,
        differenced,
        d,
    })
}
