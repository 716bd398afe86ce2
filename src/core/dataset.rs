//! Tabular event dataset handed to the forecasting core.

use crate::error::{DataError, ForecastError, Result};

/// A rectangular table of optional string cells with named columns.
///
/// Each row is one event (an admission, an appointment). Only the date
/// column is read by the forecasting pipeline; every other column is carried
/// along untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Create an empty dataset with the given column names.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Create a dataset from columns and rows, validating row widths.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<Option<String>>>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    /// Append a row. Empty or whitespace-only cells are stored as missing.
    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        let row = row
            .into_iter()
            .map(|cell| cell.filter(|c| !c.trim().is_empty()))
            .collect();
        self.rows.push(row);
        Ok(())
    }

    /// Append a row of present string cells.
    pub fn push_record<I, S>(&mut self, record: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push_row(record.into_iter().map(|s| Some(s.into())).collect())
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate over the cells of one column.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = Option<&str>> + '_> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        Ok(self.rows.iter().map(move |row| row[idx].as_deref()))
    }

    /// First column whose name contains "date", ignoring case.
    pub fn detect_date_column(&self) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.to_lowercase().contains("date"))
            .map(String::as_str)
    }

    /// Resolve an explicit column name, or detect one when `None`.
    pub fn resolve_date_column<'a>(&'a self, requested: Option<&'a str>) -> Result<&'a str> {
        match requested {
            Some(name) => {
                if self.column_index(name).is_none() {
                    return Err(DataError::MissingColumn(name.to_string()).into());
                }
                Ok(name)
            }
            None => self
                .detect_date_column()
                .ok_or_else(|| DataError::NoDateColumn.into()),
        }
    }
}
