//! The in-memory dataset that every operation works on.
//!
//! A [`Dataset`] is an ordered set of uniquely named, typed columns of equal
//! length, stored as a polars `DataFrame`. Rows are exposed as [`Value`]
//! cells; cleaning operations mutate the dataset in place.

mod loader;

use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, Result, ResultExt};
use crate::types::{ColumnKind, Value};
use crate::utils::{any_value_to_value, column_kind, count_missing, series_values};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// A loaded tabular dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    source: Option<String>,
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

impl Dataset {
    /// Load a delimited text file (header row + data rows).
    ///
    /// Fails with [`ProfilerError::Load`] when the file is missing,
    /// unreadable, or malformed.
    pub fn load(path: impl AsRef<Path>, config: &ProfilerConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dataset from: {}", path.display());

        let frame = loader::read_path(path, config)?;
        info!("Dataset loaded successfully: {:?}", frame.shape());

        Ok(Self {
            frame,
            source: Some(path.display().to_string()),
        })
    }

    /// Parse delimited text held in memory.
    pub fn parse(text: &str, config: &ProfilerConfig) -> Result<Self> {
        let frame = loader::read_str(text, config)?;
        Ok(Self {
            frame,
            source: None,
        })
    }

    /// Wrap an existing DataFrame.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self {
            frame,
            source: None,
        }
    }

    /// Where the dataset was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.frame.width()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    /// Column names in declared order.
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// The polars Series backing a column.
    pub(crate) fn column_series(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map(|col| col.as_materialized_series())
            .map_err(|_| ProfilerError::ColumnNotFound(name.to_string()))
    }

    /// Logical kind of a column.
    pub fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        Ok(column_kind(self.column_series(name)?.dtype()))
    }

    /// Every cell of a column, in row order.
    pub fn column_values(&self, name: &str) -> Result<Vec<Value>> {
        let series = self.column_series(name)?;
        series_values(series).context(format!("Reading column '{}'", name))
    }

    /// Single cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Result<Value> {
        let series = self.column_series(column)?;
        if row >= series.len() {
            return Err(ProfilerError::RowOutOfRange {
                index: row,
                rows: series.len(),
            });
        }
        let cell = series
            .get(row)
            .context(format!("Reading row {} of '{}'", row, column))?;
        Ok(any_value_to_value(cell))
    }

    /// One row as (column name, value) pairs in column order.
    pub fn row(&self, row: usize) -> Result<Vec<(String, Value)>> {
        self.column_names()
            .into_iter()
            .map(|name| {
                let value = self.value(row, &name)?;
                Ok((name, value))
            })
            .collect()
    }

    /// Missing cells per column, in column order.
    pub fn missing_counts(&self) -> Result<Vec<(String, usize)>> {
        self.column_names()
            .into_iter()
            .map(|name| {
                let missing = count_missing(&self.column_values(&name)?);
                Ok((name, missing))
            })
            .collect()
    }

    /// Overwrite the column named like `series` in place.
    ///
    /// The column keeps its position; `series` must have one cell per row.
    pub(crate) fn replace_series(&mut self, series: Series) -> Result<()> {
        let name = series.name().to_string();
        if !self.has_column(&name) {
            return Err(ProfilerError::ColumnNotFound(name));
        }
        if series.len() != self.height() {
            return Err(ProfilerError::Internal(format!(
                "column '{}' rebuilt with {} cells for {} rows",
                name,
                series.len(),
                self.height()
            )));
        }

        self.frame
            .replace(&name, series)
            .context(format!("Replacing column '{}'", name))?;
        Ok(())
    }

    /// Remove a column, returning false if it did not exist.
    pub(crate) fn remove_column(&mut self, name: &str) -> Result<bool> {
        if !self.has_column(name) {
            return Ok(false);
        }
        self.frame
            .drop_in_place(name)
            .context(format!("Dropping column '{}'", name))?;
        Ok(true)
    }
}
