//! Numerical utilities shared by the estimator.

pub mod linalg;
pub mod optimization;
pub mod stats;

pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::normal_critical_value;
