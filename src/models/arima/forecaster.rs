//! Multi-step forecasting from a fitted model.

use crate::config::{MAX_HORIZON, MIN_HORIZON};
use crate::core::{offset_date, ForecastResult};
use crate::error::{ForecastError, ModelFitError, Result};
use crate::models::arima::diff::integrate;
use crate::models::arima::FittedModel;
use crate::utils::stats::normal_critical_value;
use chrono::NaiveDate;

impl FittedModel {
    /// Point forecasts on the count scale for `horizon` steps.
    ///
    /// The ARMA recursion runs on the differenced scale with future shocks
    /// set to zero, then the result is integrated back from the end of the
    /// observed series.
    pub fn predict(&self, horizon: usize) -> Vec<f64> {
        let mu = self.drift;
        let mut history = self.differenced.clone();
        let mut errors = self.residuals.clone();
        let mut diffs = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let t = history.len();
            let mut pred = mu;
            for (i, phi) in self.ar.iter().enumerate() {
                if t > i {
                    pred += phi * (history[t - 1 - i] - mu);
                }
            }
            for (j, theta) in self.ma.iter().enumerate() {
                if t > j {
                    pred += theta * errors[t - 1 - j];
                }
            }
            history.push(pred);
            errors.push(0.0);
            diffs.push(pred);
        }

        integrate(&diffs, &self.original, self.order.d)
    }

    /// First `n` ψ-weights of the integrated model `φ(B)(1 - B)^d x_t = θ(B) ε_t`.
    pub fn psi_weights(&self, n: usize) -> Vec<f64> {
        // Coefficients of φ(B)(1 - B)^d as a polynomial in B
        let mut poly = vec![1.0];
        poly.extend(self.ar.iter().map(|phi| -phi));
        for _ in 0..self.order.d {
            let mut next = vec![0.0; poly.len() + 1];
            for (i, c) in poly.iter().enumerate() {
                next[i] += c;
                next[i + 1] -= c;
            }
            poly = next;
        }
        let phi_star: Vec<f64> = poly.iter().skip(1).map(|c| -c).collect();

        let mut psi = Vec::with_capacity(n);
        for j in 0..n {
            let mut value = if j == 0 {
                1.0
            } else {
                self.ma.get(j - 1).copied().unwrap_or(0.0)
            };
            for (i, phi) in phi_star.iter().enumerate().take(j) {
                value += phi * psi[j - 1 - i];
            }
            psi.push(value);
        }
        psi
    }

    /// Forecast `horizon` days following `last_date`.
    ///
    /// With `level = Some(c)` the result carries symmetric normal prediction
    /// intervals with coverage `c`.
    pub fn forecast(
        &self,
        horizon: usize,
        last_date: NaiveDate,
        level: Option<f64>,
    ) -> Result<ForecastResult> {
        if !(MIN_HORIZON..=MAX_HORIZON).contains(&horizon) {
            return Err(ForecastError::InvalidConfig(format!(
                "horizon must be in {MIN_HORIZON}..={MAX_HORIZON}, got {horizon}"
            )));
        }

        let values = self.predict(horizon);
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ModelFitError::NonFiniteCoefficients.into());
        }

        let dates = (1..=horizon as u64)
            .map(|h| offset_date(last_date, h))
            .collect::<Result<Vec<_>>>()?;

        let forecast = ForecastResult::new(dates, values)?;
        let Some(level) = level else {
            return Ok(forecast);
        };

        let z = normal_critical_value(level);
        if !z.is_finite() {
            return Err(ForecastError::InvalidConfig(format!(
                "interval level must be in (0, 1), got {level}"
            )));
        }

        let psi = self.psi_weights(horizon);
        let mut cumulative = 0.0;
        let (mut lower, mut upper) = (Vec::with_capacity(horizon), Vec::with_capacity(horizon));
        for (value, weight) in forecast.values().iter().zip(&psi) {
            cumulative += weight * weight;
            let half_width = z * (self.sigma2 * cumulative).sqrt();
            lower.push(value - half_width);
            upper.push(value + half_width);
        }

        forecast.with_intervals(lower, upper, level)
    }
}
