//! Statistical imputation methods.
//!
//! Provides median and mode imputation of missing values.

use crate::dataset::Dataset;
use crate::error::{ProfilerError, Result, ResultExt};
use crate::types::{FillOutcome, FillStrategy, Value};
use crate::utils::{count_missing, fill_missing_from_row, float_series, mode_index};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill the missing values of `column` using `strategy`.
    ///
    /// Fails with [`ProfilerError::ColumnNotFound`] for an unknown column and
    /// [`ProfilerError::TypeMismatch`] when the median of a non-numeric
    /// column is requested. A column without missing values is left
    /// untouched, so repeated calls are no-ops.
    pub fn fill_missing(
        dataset: &mut Dataset,
        column: &str,
        strategy: FillStrategy,
    ) -> Result<FillOutcome> {
        match strategy {
            FillStrategy::Median => Self::apply_median(dataset, column),
            FillStrategy::Mode => Self::apply_mode(dataset, column),
        }
    }

    /// Replace missing values with the median of the non-missing values.
    ///
    /// The column becomes a float column, since the median of integers can
    /// be fractional.
    pub fn apply_median(dataset: &mut Dataset, column: &str) -> Result<FillOutcome> {
        let kind = dataset.column_kind(column)?;
        if !kind.is_numeric() {
            return Err(ProfilerError::type_mismatch(column, "median", kind.as_str()));
        }

        let floats = float_series(dataset.column_series(column)?)
            .context(format!("Reading column '{}'", column))?;
        let missing = floats.null_count();

        let Some(median_val) = floats.median() else {
            if missing > 0 {
                warn!(
                    "'{}' has no non-missing values; median undefined, column left unchanged",
                    column
                );
            }
            return Ok(Self::outcome(column, FillStrategy::Median, Value::Missing, 0));
        };

        if missing == 0 {
            debug!("'{}' has no missing values, median fill skipped", column);
            return Ok(Self::outcome(
                column,
                FillStrategy::Median,
                Value::Float(median_val),
                0,
            ));
        }

        let filled = floats.f64()?.fill_null_with_values(median_val)?.into_series();
        dataset.replace_series(filled)?;

        info!("Filled {} missing values in '{}' with median: {:.2}", missing, column, median_val);
        Ok(Self::outcome(
            column,
            FillStrategy::Median,
            Value::Float(median_val),
            missing,
        ))
    }

    /// Replace missing values with the most frequent non-missing value.
    ///
    /// Ties go to the value seen first in row order. The column keeps its dtype.
    pub fn apply_mode(dataset: &mut Dataset, column: &str) -> Result<FillOutcome> {
        let values = dataset.column_values(column)?;

        let Some((first, _)) = mode_index(&values) else {
            if count_missing(&values) > 0 {
                warn!(
                    "'{}' has no non-missing values; mode undefined, column left unchanged",
                    column
                );
            }
            return Ok(Self::outcome(column, FillStrategy::Mode, Value::Missing, 0));
        };
        let mode_val = values[first].clone();

        let (series, filled) = fill_missing_from_row(dataset.column_series(column)?, first)
            .context(format!("Filling column '{}'", column))?;
        if filled == 0 {
            debug!("'{}' has no missing values, mode fill skipped", column);
            return Ok(Self::outcome(column, FillStrategy::Mode, mode_val, 0));
        }

        dataset.replace_series(series)?;

        info!("Filled {} missing values in '{}' with mode: '{}'", filled, column, mode_val);
        Ok(Self::outcome(column, FillStrategy::Mode, mode_val, filled))
    }

    fn outcome(column: &str, strategy: FillStrategy, fill_value: Value, filled: usize) -> FillOutcome {
        FillOutcome {
            column: column.to_string(),
            strategy,
            fill_value,
            filled,
        }
    }
}
