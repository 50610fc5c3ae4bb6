//! Imputation methods for handling missing values.
//!
//! - Statistical: median and mode imputation

mod statistical;

pub use statistical::StatisticalImputer;
