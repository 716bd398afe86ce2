//! Core data structures for daily case-volume forecasting.

mod daily_series;
mod dataset;
mod forecast;

pub(crate) use daily_series::offset_date;
pub use daily_series::DailySeries;
pub use dataset::Dataset;
pub use forecast::ForecastResult;
