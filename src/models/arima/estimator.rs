//! Maximum-likelihood estimation of ARIMA coefficients.

use crate::config::ForecastConfig;
use crate::error::{ForecastError, ModelFitError, Result};
use crate::models::arima::likelihood::kalman_filter;
use crate::models::arima::params::{near_invertibility_boundary, start_params, ArmaParams};
use crate::models::arima::{ArimaOrder, PreparedSeries};
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::variance;

/// Distance from a unit MA root below which a fit is logged as over-differenced.
const INVERTIBILITY_MARGIN: f64 = 1e-3;

/// Fits ARIMA(p, d, q) models to prepared series.
///
/// The estimator itself holds only settings; each call to
/// [`fit`](ArimaEstimator::fit) returns an independent [`FittedModel`].
#[derive(Debug, Clone)]
pub struct ArimaEstimator {
    order: ArimaOrder,
    include_drift: bool,
    optimizer: NelderMeadConfig,
}

impl ArimaEstimator {
    /// Create an estimator for the given order, with drift enabled.
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            order,
            include_drift: true,
            optimizer: NelderMeadConfig::default(),
        }
    }

    /// Build an estimator from a request configuration.
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self::new(config.order)
            .with_drift(config.include_drift)
            .with_optimizer(config.max_iter, config.tolerance)
    }

    /// Enable or disable the drift term.
    pub fn with_drift(mut self, include_drift: bool) -> Self {
        self.include_drift = include_drift;
        self
    }

    /// Set the optimizer iteration budget and tolerance.
    pub fn with_optimizer(mut self, max_iter: usize, tolerance: f64) -> Self {
        self.optimizer.max_iter = max_iter;
        self.optimizer.tolerance = tolerance;
        self
    }

    /// Model order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Estimate coefficients by maximising the exact Gaussian likelihood.
    pub fn fit(&self, prepared: &PreparedSeries) -> Result<FittedModel> {
        let order = self.order;
        if prepared.order() != order.d {
            return Err(ForecastError::InvalidConfig(format!(
                "series differenced {} times but model order is {order}",
                prepared.order()
            )));
        }

        let needed = order.d + order.num_coefficients() + 2;
        if prepared.original().len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: prepared.original().len(),
            });
        }

        let x = prepared.differenced();
        if !(variance(x) > 1e-12) {
            tracing::warn!(%order, "differenced series is constant");
            return Err(ModelFitError::ZeroVariance.into());
        }

        let include_drift = self.include_drift;
        let objective = |raw: &[f64]| {
            let params = ArmaParams::decode(raw, &order, include_drift);
            kalman_filter(x, &params.ar, &params.ma, params.drift)
                .map_or(f64::INFINITY, |innov| innov.objective())
        };

        let start = start_params(x, &order, include_drift);
        let result = nelder_mead(objective, &start, &self.optimizer);

        if !result.converged {
            tracing::warn!(%order, iterations = result.iterations, "optimizer did not converge");
            return Err(ModelFitError::NotConverged {
                iterations: result.iterations,
            }
            .into());
        }

        let params = ArmaParams::decode(&result.point, &order, include_drift);
        if !params.is_finite() {
            tracing::warn!(%order, "estimated coefficients are not finite");
            return Err(ModelFitError::NonFiniteCoefficients.into());
        }

        if near_invertibility_boundary(&params.ma, INVERTIBILITY_MARGIN) {
            tracing::debug!(
                %order,
                ma = ?params.ma,
                "MA polynomial is close to a unit root; series may be over-differenced"
            );
        }

        let innov = kalman_filter(x, &params.ar, &params.ma, params.drift)
            .ok_or(ModelFitError::NonFiniteLikelihood)?;
        let sigma2 = innov.sigma2();
        let log_likelihood = innov.log_likelihood();
        if !(sigma2.is_finite() && sigma2 > 0.0 && log_likelihood.is_finite()) {
            tracing::warn!(%order, sigma2, log_likelihood, "likelihood is not finite at the optimum");
            return Err(ModelFitError::NonFiniteLikelihood.into());
        }

        // AR + MA + sigma2 (+ drift)
        let k = (order.num_coefficients() + 1 + usize::from(include_drift)) as f64;
        let n = x.len() as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n.ln();

        tracing::debug!(
            %order,
            iterations = result.iterations,
            log_likelihood,
            sigma2,
            "fitted model"
        );

        Ok(FittedModel {
            order,
            ar: params.ar,
            ma: params.ma,
            drift: params.drift,
            include_drift,
            sigma2,
            original: prepared.original().to_vec(),
            differenced: x.to_vec(),
            residuals: innov.errors,
            log_likelihood,
            aic,
            bic,
            iterations: result.iterations,
        })
    }
}

impl Default for ArimaEstimator {
    fn default() -> Self {
        Self::new(ArimaOrder::default())
    }
}

/// An estimated ARIMA model together with the data it was fitted on.
#[derive(Debug, Clone)]
pub struct FittedModel {
    pub(super) order: ArimaOrder,
    pub(super) ar: Vec<f64>,
    pub(super) ma: Vec<f64>,
    pub(super) drift: f64,
    pub(super) include_drift: bool,
    pub(super) sigma2: f64,
    pub(super) original: Vec<f64>,
    pub(super) differenced: Vec<f64>,
    pub(super) residuals: Vec<f64>,
    pub(super) log_likelihood: f64,
    pub(super) aic: f64,
    pub(super) bic: f64,
    pub(super) iterations: usize,
}

impl FittedModel {
    /// Model order.
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// AR coefficients φ₁..φ_p.
    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar
    }

    /// MA coefficients θ₁..θ_q.
    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma
    }

    /// Mean of the differenced series (0 when drift is disabled).
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Whether the drift term was estimated.
    pub fn has_drift(&self) -> bool {
        self.include_drift
    }

    /// Innovation variance σ².
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// One-step prediction errors on the differenced scale.
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Number of observations the model was fitted on.
    pub fn n_obs(&self) -> usize {
        self.original.len()
    }

    pub fn log_likelihood(&self) -> f64 {
        self.log_likelihood
    }

    pub fn aic(&self) -> f64 {
        self.aic
    }

    pub fn bic(&self) -> f64 {
        self.bic
    }

    /// Optimizer iterations used.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DailySeries;
    use crate::models::arima::prepare;
    use chrono::NaiveDate;

    fn scenario_series() -> DailySeries {
        let counts = vec![
            10, 12, 11, 13, 14, 15, 13, 16, 17, 18, 16, 19, 20, 18, 21, 22, 20, 23, 24, 22,
        ];
        DailySeries::consecutive(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), counts).unwrap()
    }

    #[test]
    fn fits_trending_series() {
        let prepared = prepare(&scenario_series(), 1, 20).unwrap();
        let model = ArimaEstimator::default().fit(&prepared).unwrap();

        assert_eq!(model.order(), ArimaOrder::new(1, 1, 1));
        assert!(model.ar_coefficients()[0].abs() < 1.0);
        assert!(model.ma_coefficients()[0].abs() <= 1.0);
        assert!(model.drift() > 0.0);
        assert!(model.sigma2() > 0.0);
        assert_eq!(model.residuals().len(), 19);
        assert!(model.log_likelihood().is_finite());
        assert!(model.aic() < model.bic());
    }

    #[test]
    fn constant_series_has_zero_variance() {
        let series =
            DailySeries::consecutive(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), vec![5; 25])
                .unwrap();
        let prepared = prepare(&series, 1, 20).unwrap();
        let err = ArimaEstimator::default().fit(&prepared).unwrap_err();
        assert_eq!(err, ForecastError::ModelFit(ModelFitError::ZeroVariance));
    }

    #[test]
    fn linear_series_has_zero_variance_after_differencing() {
        let counts: Vec<u64> = (0..25).map(|i| 3 + 2 * i).collect();
        let series =
            DailySeries::consecutive(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), counts).unwrap();
        let prepared = prepare(&series, 1, 20).unwrap();
        let err = ArimaEstimator::default().fit(&prepared).unwrap_err();
        assert_eq!(err, ForecastError::ModelFit(ModelFitError::ZeroVariance));
    }

    #[test]
    fn exhausted_budget_is_not_converged() {
        let prepared = prepare(&scenario_series(), 1, 20).unwrap();
        let err = ArimaEstimator::default()
            .with_optimizer(2, 1e-12)
            .fit(&prepared)
            .unwrap_err();
        assert_eq!(
            err,
            ForecastError::ModelFit(ModelFitError::NotConverged { iterations: 2 })
        );
    }

    #[test]
    fn mismatched_differencing_is_rejected() {
        let prepared = prepare(&scenario_series(), 2, 20).unwrap();
        let err = ArimaEstimator::default().fit(&prepared).unwrap_err();
        assert!(matches!(err, ForecastError::InvalidConfig(_)));
    }

    #[test]
    fn fitting_is_deterministic() {
        let prepared = prepare(&scenario_series(), 1, 20).unwrap();
        let estimator = ArimaEstimator::default();
        let a = estimator.fit(&prepared).unwrap();
        let b = estimator.fit(&prepared).unwrap();

        assert_eq!(a.ar_coefficients(), b.ar_coefficients());
        assert_eq!(a.ma_coefficients(), b.ma_coefficients());
        assert_eq!(a.drift().to_bits(), b.drift().to_bits());
        assert_eq!(a.iterations(), b.iterations());
    }

    #[test]
    fn drift_can_be_disabled() {
        let prepared = prepare(&scenario_series(), 1, 20).unwrap();
        let model = ArimaEstimator::default()
            .with_drift(false)
            .fit(&prepared)
            .unwrap();
        assert!(!model.has_drift());
        assert_eq!(model.drift(), 0.0);
    }

    #[test]
    fn trending_scenario_ma_sits_near_unit_root() {
        let prepared = prepare(&scenario_series(), 1, 20).unwrap();
        let model = ArimaEstimator::default().fit(&prepared).unwrap();
        assert!(near_invertibility_boundary(
            model.ma_coefficients(),
            INVERTIBILITY_MARGIN
        ));

        let no_ma = ArimaEstimator::new(ArimaOrder::new(2, 1, 0))
            .fit(&prepared)
            .unwrap();
        assert!(!near_invertibility_boundary(
            no_ma.ma_coefficients(),
            INVERTIBILITY_MARGIN
        ));
    }

    #[test]
    fn higher_orders_fit() {
        let prepared = prepare(&scenario_series(), 1, 20).unwrap();
        let model = ArimaEstimator::new(ArimaOrder::new(2, 1, 0))
            .fit(&prepared)
            .unwrap();
        assert_eq!(model.ar_coefficients().len(), 2);
        assert!(model.ma_coefficients().is_empty());
    }
}
