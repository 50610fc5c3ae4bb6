//! Dataset profiling: per-column summaries and correlations.
//!
//! This module provides:
//! - `describe`: counts, missing counts and kind-specific statistics
//! - `correlation_matrix`: pairwise-complete Pearson over numeric columns

mod correlation;
mod statistics;

use crate::config::ProfilerConfig;
use crate::dataset::Dataset;
use crate::error::{ProfilerError, Result, ResultExt};
use crate::types::{ColumnSummary, CorrelationMatrix, DatasetDescription, Value};
use crate::utils::{count_missing, unique_count};
use std::num::NonZeroUsize;
use std::thread;
use tracing::debug;

/// Profiler for summarizing dataset structure and statistics.
pub struct DatasetProfiler;

impl DatasetProfiler {
    /// Summarize every column of the dataset, sequentially.
    ///
    /// All-missing columns are reported with a zero count and NaN / `None`
    /// statistics rather than an error.
    pub fn describe(dataset: &Dataset) -> Result<DatasetDescription> {
        Self::describe_with(dataset, false)
    }

    /// Summarize every column, honouring `config.parallel_describe`.
    pub fn describe_with_config(
        dataset: &Dataset,
        config: &ProfilerConfig,
    ) -> Result<DatasetDescription> {
        Self::describe_with(dataset, config.parallel_describe)
    }

    /// Summarize every column, optionally spread over worker threads.
    ///
    /// Columns are split into at most `available_parallelism()` contiguous
    /// chunks, one scoped thread each. Both modes return identical results
    /// in column order.
    pub fn describe_with(dataset: &Dataset, parallel: bool) -> Result<DatasetDescription> {
        let names = dataset.column_names();

        let columns = if parallel && names.len() > 1 {
            Self::summarize_parallel(dataset, &names)?
        } else {
            names
                .iter()
                .map(|name| Self::summarize_column(dataset, name))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(DatasetDescription {
            row_count: dataset.height(),
            column_count: dataset.width(),
            columns,
        })
    }

    fn summarize_parallel(dataset: &Dataset, names: &[String]) -> Result<Vec<ColumnSummary>> {
        let workers = thread::available_parallelism()
            .map_or(1, NonZeroUsize::get)
            .min(names.len());
        let chunk_size = names.len().div_ceil(workers.max(1));
        debug!(
            "Summarizing {} columns on {} threads",
            names.len(),
            names.len().div_ceil(chunk_size)
        );

        thread::scope(|scope| {
            let handles = names
                .chunks(chunk_size)
                .enumerate()
                .map(|(idx, chunk)| {
                    thread::Builder::new()
                        .name(format!("describe-{}", idx))
                        .spawn_scoped(scope, move || {
                            chunk
                                .iter()
                                .map(|name| Self::summarize_column(dataset, name))
                                .collect::<Result<Vec<_>>>()
                        })
                        .map_err(ProfilerError::from)
                })
                .collect::<Result<Vec<_>>>()?;

            let mut columns = Vec::with_capacity(names.len());
            for handle in handles {
                let chunk = handle.join().map_err(|_| {
                    ProfilerError::Internal("column summary thread panicked".to_string())
                })??;
                columns.extend(chunk);
            }
            Ok(columns)
        })
    }

    /// Summarize a single column.
    pub fn summarize_column(dataset: &Dataset, name: &str) -> Result<ColumnSummary> {
        let kind = dataset.column_kind(name)?;
        let values = dataset.column_values(name)?;

        let total = values.len();
        let missing_count = count_missing(&values);
        let count = total - missing_count;
        let missing_percentage = if total > 0 {
            (missing_count as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        let stats = if kind.is_numeric() {
            statistics::numeric_stats(dataset.column_series(name)?)
                .context(format!("Summarizing column '{}'", name))?
        } else {
            statistics::categorical_stats(&values)
        };

        debug!(
            "Column '{}' ({}): {} values, {} missing",
            name, kind, count, missing_count
        );

        Ok(ColumnSummary {
            name: name.to_string(),
            kind,
            count,
            missing_count,
            missing_percentage,
            unique_count: unique_count(&values),
            stats,
        })
    }

    /// Pearson correlation between every pair of numeric columns.
    ///
    /// Rows where either value is missing are excluded pair by pair.
    /// Undefined coefficients (zero variance, fewer than two complete
    /// pairs) are NaN.
    pub fn correlation_matrix(dataset: &Dataset) -> Result<CorrelationMatrix> {
        let mut columns = Vec::new();
        let mut data = Vec::new();

        for name in dataset.column_names() {
            if !dataset.column_kind(&name)?.is_numeric() {
                continue;
            }
            let values: Vec<Option<f64>> = dataset
                .column_values(&name)?
                .iter()
                .map(Value::as_f64)
                .collect();
            columns.push(name);
            data.push(values);
        }

        debug!("Computing correlations over {} numeric columns", columns.len());

        Ok(CorrelationMatrix {
            values: correlation::correlation_values(&data),
            columns,
        })
    }
}
