//! Daily count series produced by the aggregator.

use crate::error::{ForecastError, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// An ordered sequence of `(date, count)` pairs with strictly increasing dates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DailySeries {
    dates: Vec<NaiveDate>,
    counts: Vec<u64>,
}

impl DailySeries {
    /// Create a series, validating that dates are strictly increasing.
    pub fn new(dates: Vec<NaiveDate>, counts: Vec<u64>) -> Result<Self> {
        if dates.len() != counts.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: counts.len(),
            });
        }
        if dates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::TimestampError(
                "dates must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { dates, counts })
    }

    /// Create a gap-free series of consecutive days starting at `start`.
    pub fn consecutive(start: NaiveDate, counts: Vec<u64>) -> Result<Self> {
        let dates = (0..counts.len())
            .map(|i| offset_date(start, i as u64))
            .collect::<Result<Vec<_>>>()?;
        Self::new(dates, counts)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Dates in ascending order.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Event counts aligned with [`dates`](Self::dates).
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Counts as floating point values for model fitting.
    pub fn values(&self) -> Vec<f64> {
        self.counts.iter().map(|&c| c as f64).collect()
    }

    /// Iterate over `(date, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.dates.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Whether consecutive entries are exactly one day apart.
    pub fn is_contiguous(&self) -> bool {
        self.dates
            .windows(2)
            .all(|w| w[0].succ_opt() == Some(w[1]))
    }

    /// Return a copy with a zero-count entry for every absent calendar day
    /// between the first and last date.
    pub fn with_missing_days_filled(&self) -> DailySeries {
        let (Some(first), Some(last)) = (self.first_date(), self.last_date()) else {
            return self.clone();
        };

        let span = (last - first).num_days() as usize + 1;
        let mut dates = Vec::with_capacity(span);
        let mut counts = Vec::with_capacity(span);
        let mut observed = self.iter().peekable();

        for day in first.iter_days().take(span) {
            dates.push(day);
            match observed.peek() {
                Some(&(date, count)) if date == day => {
                    counts.push(count);
                    observed.next();
                }
                _ => counts.push(0),
            }
        }

        DailySeries { dates, counts }
    }
}

/// Add `days` calendar days to `date`.
pub(crate) fn offset_date(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| ForecastError::TimestampError(format!("{date} + {days} days overflows")))
}
