//! Error types for the caseload-forecast library.

use serde::Serialize;
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while turning a dataset into a forecast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The dataset or its date column cannot be used.
    #[error("data error: {0}")]
    Data(#[from] DataError),

    /// The aggregated series is shorter than the configured minimum.
    #[error("insufficient data: need at least {needed} daily points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Parameter estimation failed.
    #[error("model fit failed: {0}")]
    ModelFit(#[from] ModelFitError),

    /// Configuration value out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Date-related error.
    #[error("timestamp error: {0}")]
    TimestampError(String),
}

/// Causes of a [`ForecastError::Data`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The requested date column does not exist.
    #[error("column '{0}' not found")]
    MissingColumn(String),

    /// No column name looks like a date column.
    #[error("no date column found")]
    NoDateColumn,

    /// The dataset has no rows.
    #[error("dataset is empty")]
    EmptyDataset,

    /// Every row had a missing or unparseable date.
    #[error("no parseable dates ({rejected} rows rejected)")]
    NoParseableDates { rejected: usize },
}

/// Causes of a [`ForecastError::ModelFit`].
///
/// Kept distinct so callers can tell "not enough signal" apart from
/// numerical instability.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelFitError {
    /// The differenced series is constant.
    #[error("series has zero variance after differencing")]
    ZeroVariance,

    /// The optimizer exhausted its iteration budget.
    #[error("optimizer did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    /// Estimated AR/MA coefficients are NaN or infinite.
    #[error("estimated coefficients are not finite")]
    NonFiniteCoefficients,

    /// The likelihood could not be evaluated at the optimum.
    #[error("log-likelihood is not finite")]
    NonFiniteLikelihood,
}

/// Coarse outcome of a forecast request, for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStatus {
    Success,
    DataError,
    InsufficientData,
    ModelFit,
    InvalidConfig,
}

impl ForecastError {
    /// Map the error onto the status reported to the caller.
    pub fn status(&self) -> ForecastStatus {
        match self {
            ForecastError::Data(_)
            | ForecastError::DimensionMismatch { .. }
            | ForecastError::TimestampError(_) => ForecastStatus::DataError,
            ForecastError::InsufficientData { .. } => ForecastStatus::InsufficientData,
            ForecastError::ModelFit(_) => ForecastStatus::ModelFit,
            ForecastError::InvalidConfig(_) => ForecastStatus::InvalidConfig,
        }
    }
}

impl ForecastStatus {
    /// Status of a finished request.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => ForecastStatus::Success,
            Err(e) => e.status(),
        }
    }

    /// Whether the request produced a forecast.
    pub fn is_success(&self) -> bool {
        matches!(self, ForecastStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        let err = ForecastError::InsufficientData { needed: 20, got: 19 };
        assert_eq!(
            err.to_string(),
            "insufficient data: need at least 20 daily points, got 19"
        );

        let err: ForecastError = DataError::MissingColumn("admission_date".into()).into();
        assert_eq!(
            err.to_string(),
            "data error: column 'admission_date' not found"
        );

        let err: ForecastError = ModelFitError::NotConverged { iterations: 1000 }.into();
        assert_eq!(
            err.to_string(),
            "model fit failed: optimizer did not converge within 1000 iterations"
        );

        let err = ForecastError::InvalidConfig("horizon must be in 7..=30".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: horizon must be in 7..=30"
        );
    }

    #[test]
    fn model_fit_causes_stay_distinguishable() {
        let zero: ForecastError = ModelFitError::ZeroVariance.into();
        let diverged: ForecastError = ModelFitError::NonFiniteCoefficients.into();
        assert_ne!(zero, diverged);
        assert_eq!(zero.status(), diverged.status());
        assert!(zero.to_string().contains("zero variance"));
    }

    #[test]
    fn errors_map_to_status() {
        assert_eq!(
            ForecastError::from(DataError::EmptyDataset).status(),
            ForecastStatus::DataError
        );
        assert_eq!(
            ForecastError::InsufficientData { needed: 20, got: 3 }.status(),
            ForecastStatus::InsufficientData
        );
        assert_eq!(
            ForecastError::from(ModelFitError::ZeroVariance).status(),
            ForecastStatus::ModelFit
        );
        assert_eq!(
            ForecastError::InvalidConfig(String::new()).status(),
            ForecastStatus::InvalidConfig
        );

        let ok: Result<()> = Ok(());
        assert!(ForecastStatus::of(&ok).is_success());
    }

    #[test]
    fn errors_are_clonable_and_comparable() {
        let err1 = ForecastError::from(DataError::NoParseableDates { rejected: 4 });
        let err2 = err1.clone();
        assert_eq!(err1, err2);
    }
}
