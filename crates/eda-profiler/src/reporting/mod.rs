//! Report generation module.
//!
//! This module turns a cleaned dataset into the artifacts handed to a
//! charting front end:
//! - a JSON [`EdaReport`] (column summaries, correlations, cleaning log)
//! - the cleaned dataset as CSV
//!
//! # Example
//!
//! ```rust,ignore
//! use eda_profiler::reporting::{ReportGenerator, ReportParams};
//!
//! let report = ReportGenerator::build_report(&dataset, ReportParams {
//!     source: dataset.source(),
//!     original_shape,
//!     missing_before,
//!     cleaning_actions: &actions,
//!     parallel: false,
//! })?;
//!
//! let generator = ReportGenerator::new("outputs");
//! generator.write_report_to_file(&report, "train")?;
//! generator.write_dataset(&dataset, "train")?;
//! ```

mod generator;

pub use generator::{EdaReport, ReportGenerator, ReportParams};
