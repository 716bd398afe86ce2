//! Presentation-ready packaging of actual and forecast tracks.

use crate::core::{offset_date, DailySeries, ForecastResult};
use crate::error::{ForecastError, Result};
use crate::models::arima::{ArimaOrder, FittedModel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How negative forecast values are shown.
///
/// Only the display value is affected; the unrounded forecast is always kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativePolicy {
    /// Show negative forecasts as zero and flag them.
    #[default]
    Clamp,
    /// Show negative forecasts as they are.
    Keep,
}

/// One observed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActualPoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// One forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    /// Unrounded model output.
    pub value: f64,
    /// Nearest integer (ties to even) after the negative policy.
    pub display: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    /// The rounded value was negative and is shown as zero.
    pub clamped: bool,
}

/// Estimated model parameters and fit statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub order: ArimaOrder,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub drift: f64,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub iterations: usize,
    pub n_obs: usize,
}

impl From<&FittedModel> for ModelSummary {
    fn from(model: &FittedModel) -> Self {
        Self {
            order: model.order(),
            ar: model.ar_coefficients().to_vec(),
            ma: model.ma_coefficients().to_vec(),
            drift: model.drift(),
            sigma2: model.sigma2(),
            log_likelihood: model.log_likelihood(),
            aic: model.aic(),
            bic: model.bic(),
            iterations: model.iterations(),
            n_obs: model.n_obs(),
        }
    }
}

/// Actual and forecast tracks on one date axis, plus model diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    pub actual: Vec<ActualPoint>,
    pub forecast: Vec<ForecastPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_level: Option<f64>,
    pub model: ModelSummary,
    /// Rows dropped during aggregation for a missing or bad date.
    pub rejected_rows: usize,
    /// Zero-count days inserted during aggregation.
    pub filled_days: usize,
}

impl ForecastReport {
    /// Attach aggregation diagnostics.
    pub fn with_diagnostics(mut self, rejected_rows: usize, filled_days: usize) -> Self {
        self.rejected_rows = rejected_rows;
        self.filled_days = filled_days;
        self
    }

    /// The "next N days" table: forecast dates with display values.
    pub fn table(&self) -> Vec<(NaiveDate, i64)> {
        self.forecast.iter().map(|p| (p.date, p.display)).collect()
    }

    /// Last observed date.
    pub fn last_actual_date(&self) -> Option<NaiveDate> {
        self.actual.last().map(|p| p.date)
    }

    /// Whether any display value was clamped to zero.
    pub fn any_clamped(&self) -> bool {
        self.forecast.iter().any(|p| p.clamped)
    }
}

fn display_value(value: f64, policy: NegativePolicy) -> (i64, bool) {
    let rounded = value.round_ties_even() as i64;
    match policy {
        NegativePolicy::Clamp if rounded < 0 => (0, true),
        _ => (rounded, false),
    }
}

/// Zip the observed series and its forecast into a report.
///
/// The forecast must start the day after the last observed date and advance
/// one day at a time.
pub fn package(
    series: &DailySeries,
    forecast: &ForecastResult,
    model: &FittedModel,
    policy: NegativePolicy,
) -> Result<ForecastReport> {
    let last = series
        .last_date()
        .ok_or_else(|| ForecastError::TimestampError("actual series is empty".to_string()))?;

    for (h, date) in forecast.dates().iter().enumerate() {
        let expected = offset_date(last, h as u64 + 1)?;
        if *date != expected {
            return Err(ForecastError::TimestampError(format!(
                "forecast step {} is dated {date}, expected {expected}",
                h + 1
            )));
        }
    }

    let actual = series
        .iter()
        .map(|(date, count)| ActualPoint { date, count })
        .collect();

    let points = forecast
        .iter()
        .enumerate()
        .map(|(h, (date, value))| {
            let (display, clamped) = display_value(value, policy);
            ForecastPoint {
                date,
                value,
                display,
                lower: forecast.lower().map(|b| b[h]),
                upper: forecast.upper().map(|b| b[h]),
                clamped,
            }
        })
        .collect::<Vec<_>>();

    let report = ForecastReport {
        actual,
        forecast: points,
        interval_level: forecast.level(),
        model: ModelSummary::from(model),
        rejected_rows: 0,
        filled_days: 0,
    };

    if report.any_clamped() {
        tracing::debug!(policy = ?policy, "negative forecast values clamped for display");
    }
    Ok(report)
}
