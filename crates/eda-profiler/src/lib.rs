//! Tabular Dataset Profiler
//!
//! A small exploratory-data-analysis toolkit built with Rust and Polars:
//! load a delimited file, inspect it, clean it, and summarize it for an
//! external charting front end.
//!
//! # Overview
//!
//! - **Loading**: header + delimited rows, empty fields are missing, ragged
//!   rows are rejected
//! - **Profiling**: per-column counts, missing counts, numeric statistics
//!   (min/max/mean/std/quartiles/skewness) or the mode for other columns
//! - **Cleaning**: median / mode imputation, dropping a column if present,
//!   dropping sparse columns
//! - **Correlation**: pairwise-complete Pearson matrix over numeric columns
//! - **Reporting**: JSON report and cleaned CSV for visualization tools
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use eda_profiler::{
//!     DataCleaner, Dataset, DatasetProfiler, FillStrategy, ProfilerConfig,
//!     StatisticalImputer,
//! };
//!
//! let config = ProfilerConfig::default();
//! let mut titanic = Dataset::load("train.csv", &config)?;
//!
//! StatisticalImputer::fill_missing(&mut titanic, "Age", FillStrategy::Median)?;
//! StatisticalImputer::fill_missing(&mut titanic, "Embarked", FillStrategy::Mode)?;
//! DataCleaner::drop_column_if_present(&mut titanic, "Cabin")?;
//!
//! let description = DatasetProfiler::describe(&titanic)?;
//! let correlation = DatasetProfiler::correlation_matrix(&titanic)?;
//!
//! println!("Age median: {:?}", description.get("Age").and_then(|c| c.median()));
//! println!("Fare/Pclass r = {:?}", correlation.get("Fare", "Pclass"));
//! ```
//!
//! # Cleaning Plans
//!
//! The same steps can be expressed as a [`CleaningPlan`] and applied in one go:
//!
//! ```rust,ignore
//! use eda_profiler::{CleaningPlan, DataCleaner};
//!
//! let actions = DataCleaner::apply_plan(&mut titanic, &CleaningPlan::titanic())?;
//! for action in actions {
//!     println!("{}", action);
//! }
//! ```

pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::DataCleaner;
pub use config::{ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder};
pub use dataset::Dataset;
pub use error::{ProfilerError, Result as ProfilerResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use profiler::DatasetProfiler;
pub use reporting::{EdaReport, ReportGenerator, ReportParams};
pub use types::{
    CleaningAction, CleaningPlan, ColumnKind, ColumnStats, ColumnSummary, CorrelationMatrix,
    DatasetDescription, FillOutcome, FillStrategy, Value,
};
