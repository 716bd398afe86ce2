//! End-to-end forecast requests: aggregate, prepare, fit, forecast, package.
//!
//! Each call is independent. Nothing is cached between requests, so
//! concurrent callers only share their read-only inputs.

use crate::aggregate::aggregate_daily;
use crate::config::ForecastConfig;
use crate::core::{DailySeries, Dataset, ForecastResult};
use crate::error::{ForecastError, Result};
use crate::models::arima::{prepare, ArimaEstimator, FittedModel};
use crate::report::{package, ForecastReport};

/// Fit and forecast a ready daily series.
fn fit_and_forecast(
    series: &DailySeries,
    config: &ForecastConfig,
) -> Result<(FittedModel, ForecastResult)> {
    let prepared = prepare(series, config.order.d, config.min_points)?;
    let model = ArimaEstimator::from_config(config).fit(&prepared)?;

    let last_date = series
        .last_date()
        .ok_or_else(|| ForecastError::TimestampError("series has no dates".to_string()))?;
    let forecast = model.forecast(config.horizon, last_date, config.interval_level)?;

    tracing::debug!(
        order = %config.order,
        horizon = config.horizon,
        first = ?forecast.dates().first(),
        "forecast ready"
    );
    Ok((model, forecast))
}

/// Forecast daily counts from an event-level dataset.
///
/// Returns the aggregated series the model was fitted on together with the
/// forecast for the `config.horizon` days after it.
pub fn forecast(
    dataset: &Dataset,
    date_column: &str,
    config: &ForecastConfig,
) -> Result<(DailySeries, ForecastResult)> {
    config.validate()?;
    let aggregation = aggregate_daily(dataset, date_column, config.fill_missing_days)?;
    let (_, forecast) = fit_and_forecast(&aggregation.series, config)?;
    Ok((aggregation.series, forecast))
}

/// Forecast an already aggregated daily series.
///
/// Calendar gaps are filled first when `config.fill_missing_days` is set.
pub fn forecast_series(series: &DailySeries, config: &ForecastConfig) -> Result<ForecastResult> {
    config.validate()?;
    let (_, forecast) = if config.fill_missing_days && !series.is_contiguous() {
        fit_and_forecast(&series.with_missing_days_filled(), config)?
    } else {
        fit_and_forecast(series, config)?
    };
    Ok(forecast)
}

/// Forecast and package the result for presentation.
///
/// `date_column = None` picks the first column whose name contains "date".
pub fn forecast_report(
    dataset: &Dataset,
    date_column: Option<&str>,
    config: &ForecastConfig,
) -> Result<ForecastReport> {
    config.validate()?;
    let column = dataset.resolve_date_column(date_column)?;
    let aggregation = aggregate_daily(dataset, column, config.fill_missing_days)?;
    let (model, forecast) = fit_and_forecast(&aggregation.series, config)?;

    let report = package(&aggregation.series, &forecast, &model, config.negative_policy)?
        .with_diagnostics(aggregation.rejected_rows, aggregation.filled_days);
    Ok(report)
}
