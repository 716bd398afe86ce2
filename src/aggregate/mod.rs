//! Daily aggregation of event-level rows into a count series.
//!
//! Rows are grouped by the calendar date of one column. Rows whose date is
//! missing or unparseable are dropped and counted, never fatal on their own.

mod dates;

pub use dates::parse_date;

use crate::core::{DailySeries, Dataset};
use crate::error::{DataError, Result};
use std::collections::BTreeMap;

/// Output of [`aggregate_daily`].
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Daily counts, ascending by date.
    pub series: DailySeries,
    /// Rows that contributed to the counts.
    pub accepted_rows: usize,
    /// Rows skipped because their date was missing or unparseable.
    pub rejected_rows: usize,
    /// Zero-count days inserted by gap filling.
    pub filled_days: usize,
}

/// Group rows of `dataset` by the calendar date in `date_column`.
///
/// With `fill_missing_days`, every calendar day between the first and last
/// observed date gets an entry, zero when no event fell on it.
pub fn aggregate_daily(
    dataset: &Dataset,
    date_column: &str,
    fill_missing_days: bool,
) -> Result<Aggregation> {
    let cells = dataset.column(date_column)?;
    if dataset.is_empty() {
        return Err(DataError::EmptyDataset.into());
    }

    let mut by_day: BTreeMap<_, u64> = BTreeMap::new();
    let mut accepted_rows = 0;
    let mut rejected_rows = 0;

    for cell in cells {
        match cell.and_then(parse_date) {
            Some(date) => {
                *by_day.entry(date).or_insert(0) += 1;
                accepted_rows += 1;
            }
            None => rejected_rows += 1,
        }
    }

    if by_day.is_empty() {
        return Err(DataError::NoParseableDates {
            rejected: rejected_rows,
        }
        .into());
    }
    if rejected_rows > 0 {
        tracing::warn!(
            column = date_column,
            rejected_rows,
            accepted_rows,
            "skipping rows with missing or unparseable dates"
        );
    }

    let (dates, counts): (Vec<_>, Vec<_>) = by_day.into_iter().unzip();
    let observed = DailySeries::new(dates, counts)?;
    let observed_days = observed.len();

    let series = if fill_missing_days {
        observed.with_missing_days_filled()
    } else {
        observed
    };
    let filled_days = series.len() - observed_days;

    tracing::debug!(
        column = date_column,
        days = series.len(),
        filled_days,
        "aggregated events into daily counts"
    );

    Ok(Aggregation {
        series,
        accepted_rows,
        rejected_rows,
        filled_days,
    })
}
