//! Data cleaning operations for datasets.
//!
//! This module provides functionality for:
//! - Dropping a named column when it is present
//! - Dropping columns with a high missing rate
//! - Running an ordered [`CleaningPlan`]

use crate::config::ProfilerConfig;
use crate::dataset::Dataset;
use crate::error::{ProfilerError, Result, ResultExt};
use crate::imputers::StatisticalImputer;
use crate::types::{CleaningAction, CleaningPlan};
use crate::utils::count_missing;
use tracing::{debug, info};

/// Data cleaner for in-place cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove `name` if the dataset has it.
    ///
    /// Returns whether a column was removed. Absence is not an error, and
    /// row order and every other column are left untouched.
    pub fn drop_column_if_present(dataset: &mut Dataset, name: &str) -> Result<bool> {
        let dropped = dataset.remove_column(name)?;
        if dropped {
            info!("Dropped column '{}'", name);
        } else {
            debug!("Column '{}' not present, nothing to drop", name);
        }
        Ok(dropped)
    }

    /// Drop every column whose missing fraction is strictly above `threshold`.
    ///
    /// Returns the dropped column names in their original order.
    pub fn drop_sparse_columns(dataset: &mut Dataset, threshold: f64) -> Result<Vec<String>> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ProfilerError::InvalidConfig(format!(
                "sparse threshold {} must be between 0.0 and 1.0",
                threshold
            )));
        }

        let rows = dataset.height();
        if rows == 0 {
            return Ok(Vec::new());
        }

        let mut sparse = Vec::new();
        for name in dataset.column_names() {
            let missing = count_missing(&dataset.column_values(&name)?);
            if missing as f64 / rows as f64 > threshold {
                sparse.push(name);
            }
        }

        for name in &sparse {
            dataset.remove_column(name)?;
        }

        if !sparse.is_empty() {
            info!(
                "Removed {} columns with >{:.0}% missing values: {:?}",
                sparse.len(),
                threshold * 100.0,
                sparse
            );
        }

        Ok(sparse)
    }

    /// Apply each step of `plan` in order with the default configuration.
    pub fn apply_plan(dataset: &mut Dataset, plan: &CleaningPlan) -> Result<Vec<String>> {
        Self::apply_plan_with_config(dataset, plan, &ProfilerConfig::default())
    }

    /// Apply each step of `plan` in order.
    ///
    /// Sparse-column steps without their own threshold use
    /// `config.sparse_column_threshold`. Returns one human-readable line per
    /// step. The first failing step aborts the plan; earlier steps stay applied.
    pub fn apply_plan_with_config(
        dataset: &mut Dataset,
        plan: &CleaningPlan,
        config: &ProfilerConfig,
    ) -> Result<Vec<String>> {
        plan.validate()?;
        config.validate()?;

        let mut actions = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let action =
                Self::apply_step(dataset, step, config).context(format!("Step '{}'", step))?;
            actions.push(action);
        }

        Ok(actions)
    }

    fn apply_step(
        dataset: &mut Dataset,
        step: &CleaningAction,
        config: &ProfilerConfig,
    ) -> Result<String> {
        match step {
            CleaningAction::Fill { column, strategy } => {
                let outcome = StatisticalImputer::fill_missing(dataset, column, *strategy)?;
                Ok(if outcome.filled > 0 {
                    format!(
                        "Filled {} missing values in '{}' with {}: {}",
                        outcome.filled, column, strategy, outcome.fill_value
                    )
                } else {
                    format!("No missing values filled in '{}' ({})", column, strategy)
                })
            }
            CleaningAction::DropColumn { name } => {
                Ok(if Self::drop_column_if_present(dataset, name)? {
                    format!("Dropped column '{}'", name)
                } else {
                    format!("Column '{}' not present, nothing dropped", name)
                })
            }
            CleaningAction::DropSparse { threshold } => {
                let threshold = threshold.unwrap_or(config.sparse_column_threshold);
                let dropped = Self::drop_sparse_columns(dataset, threshold)?;
                Ok(if dropped.is_empty() {
                    format!("No columns with >{:.0}% missing values found", threshold * 100.0)
                } else {
                    format!(
                        "Removed {} columns with >{:.0}% missing values: {:?}",
                        dropped.len(),
                        threshold * 100.0,
                        dropped
                    )
                })
            }
        }
    }
}
