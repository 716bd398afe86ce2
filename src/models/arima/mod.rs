//! ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - Differencing and its inverse
//! - Exact maximum-likelihood estimation via the Kalman filter
//! - Multi-step forecasts with normal prediction intervals

mod diff;
mod estimator;
mod forecaster;
mod likelihood;
mod order;
mod params;
mod prepare;

pub use diff::{difference, initial_values, integrate, undifference};
pub use estimator::{ArimaEstimator, FittedModel};
pub use likelihood::{kalman_filter, Innovations};
pub use order::ArimaOrder;
pub use params::{
    constrain_invertible, constrain_stationary, near_invertibility_boundary, partial_coefficients,
};
pub use prepare::{prepare, PreparedSeries};
