//! Forecast result structure for holding dated predictions.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Future dates with unrounded point predictions and optional intervals.
///
/// Values may be fractional or negative; rounding and clamping belong to the
/// presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastResult {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lower: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<f64>,
}

impl ForecastResult {
    /// Create a forecast from dates and point predictions.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            dates,
            values,
            lower: None,
            upper: None,
            level: None,
        })
    }

    /// Attach prediction interval bounds at the given coverage level.
    pub fn with_intervals(mut self, lower: Vec<f64>, upper: Vec<f64>, level: f64) -> Result<Self> {
        for bound in [&lower, &upper] {
            if bound.len() != self.values.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: self.values.len(),
                    got: bound.len(),
                });
            }
        }
        self.lower = Some(lower);
        self.upper = Some(upper);
        self.level = Some(level);
        Ok(self)
    }

    /// Number of forecast steps.
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Unrounded point predictions.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    pub fn has_intervals(&self) -> bool {
        self.lower.is_some() && self.upper.is_some()
    }

    pub fn lower(&self) -> Option<&[f64]> {
        self.lower.as_deref()
    }

    pub fn upper(&self) -> Option<&[f64]> {
        self.upper.as_deref()
    }

    /// Coverage level of the intervals, if any.
    pub fn level(&self) -> Option<f64> {
        self.level
    }
}
