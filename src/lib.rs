//! # caseload-forecast
//!
//! Daily case-volume forecasting for hospital analytics dashboards.
//!
//! Turns an event-level dataset (one row per admission or appointment) into
//! a daily count series, fits an ARIMA(p, d, q) model by exact maximum
//! likelihood and forecasts the next 7 to 30 days on a continuous calendar
//! axis.
//!
//! ```no_run
//! use caseload_forecast::prelude::*;
//!
//! let mut dataset = Dataset::new(["patient_id", "admission_date"]);
//! dataset.push_record(["p1", "2024-03-01 08:15:00"])?;
//! // ... more rows ...
//!
//! let config = ForecastConfig::default().with_horizon(14);
//! let report = forecast_report(&dataset, None, &config)?;
//! for (date, count) in report.table() {
//!     println!("{date}: {count}");
//! }
//! # Ok::<(), caseload_forecast::ForecastError>(())
//! ```

#![allow(clippy::needless_range_loop)]

pub mod aggregate;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::aggregate::{aggregate_daily, Aggregation};
    pub use crate::config::ForecastConfig;
    pub use crate::core::{DailySeries, Dataset, ForecastResult};
    pub use crate::error::{DataError, ForecastError, ForecastStatus, ModelFitError, Result};
    pub use crate::models::arima::{prepare, ArimaEstimator, ArimaOrder, FittedModel};
    pub use crate::pipeline::{forecast, forecast_report, forecast_series};
    pub use crate::report::{package, ForecastReport, NegativePolicy};
}
