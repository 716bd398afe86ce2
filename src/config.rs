//! Forecast request configuration.

use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use crate::report::NegativePolicy;
use serde::{Deserialize, Serialize};

/// Smallest forecast horizon the dashboard offers.
pub const MIN_HORIZON: usize = 7;
/// Largest forecast horizon the dashboard offers.
pub const MAX_HORIZON: usize = 30;
/// Default forecast horizon.
pub const DEFAULT_HORIZON: usize = 10;
/// Default minimum number of daily points required to fit.
pub const DEFAULT_MIN_POINTS: usize = 20;

/// Configuration for one forecast request.
///
/// Every field has a default, so a partial JSON object deserializes into a
/// usable configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Model order (p, d, q).
    pub order: ArimaOrder,
    /// Minimum number of daily points before fitting is attempted.
    pub min_points: usize,
    /// Number of days to forecast (7..=30).
    pub horizon: usize,
    /// Insert zero-count entries for calendar days with no events.
    pub fill_missing_days: bool,
    /// Estimate a constant drift on the differenced scale.
    pub include_drift: bool,
    /// Coverage of prediction intervals, or `None` to skip them.
    pub interval_level: Option<f64>,
    /// Maximum optimizer iterations.
    pub max_iter: usize,
    /// Optimizer convergence tolerance.
    pub tolerance: f64,
    /// Display policy for negative forecast values.
    pub negative_policy: NegativePolicy,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            order: ArimaOrder::default(),
            min_points: DEFAULT_MIN_POINTS,
            horizon: DEFAULT_HORIZON,
            fill_missing_days: true,
            include_drift: true,
            interval_level: Some(0.95),
            max_iter: 1000,
            tolerance: 1e-8,
            negative_policy: NegativePolicy::default(),
        }
    }
}

impl ForecastConfig {
    /// Set the model order.
    pub fn with_order(mut self, p: usize, d: usize, q: usize) -> Self {
        self.order = ArimaOrder::new(p, d, q);
        self
    }

    /// Set the forecast horizon.
    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the minimum number of daily points.
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Enable or disable calendar gap filling.
    pub fn with_fill_missing_days(mut self, fill: bool) -> Self {
        self.fill_missing_days = fill;
        self
    }

    /// Enable or disable the drift term.
    pub fn with_drift(mut self, include_drift: bool) -> Self {
        self.include_drift = include_drift;
        self
    }

    /// Set the prediction interval level (`None` disables intervals).
    pub fn with_interval_level(mut self, level: Option<f64>) -> Self {
        self.interval_level = level;
        self
    }

    /// Set the optimizer budget.
    pub fn with_optimizer(mut self, max_iter: usize, tolerance: f64) -> Self {
        self.max_iter = max_iter;
        self.tolerance = tolerance;
        self
    }

    /// Set the display policy for negative values.
    pub fn with_negative_policy(mut self, policy: NegativePolicy) -> Self {
        self.negative_policy = policy;
        self
    }

    /// Check every field against its valid range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&self.horizon) {
            return Err(ForecastError::InvalidConfig(format!(
                "horizon must be in {MIN_HORIZON}..={MAX_HORIZON}, got {}",
                self.horizon
            )));
        }
        if self.order.p > 5 || self.order.q > 5 {
            return Err(ForecastError::InvalidConfig(format!(
                "AR and MA orders must be at most 5, got {}",
                self.order
            )));
        }
        if self.order.d > 2 {
            return Err(ForecastError::InvalidConfig(format!(
                "differencing order must be at most 2, got {}",
                self.order.d
            )));
        }
        let floor = self.order.d + self.order.num_coefficients() + 2;
        if self.min_points < floor {
            return Err(ForecastError::InvalidConfig(format!(
                "min_points must be at least {floor} for {}, got {}",
                self.order, self.min_points
            )));
        }
        if let Some(level) = self.interval_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(ForecastError::InvalidConfig(format!(
                    "interval level must be in (0, 1), got {level}"
                )));
            }
        }
        if self.max_iter == 0 {
            return Err(ForecastError::InvalidConfig(
                "max_iter must be positive".to_string(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ForecastError::InvalidConfig(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
