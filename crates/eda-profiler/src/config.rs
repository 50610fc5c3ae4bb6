//! Configuration types for loading and profiling datasets.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic setup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default missing fraction above which a column counts as sparse.
pub const DEFAULT_SPARSE_COLUMN_THRESHOLD: f64 = 0.7;

/// Configuration for the profiler.
///
/// Use [`ProfilerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use eda_profiler::config::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .delimiter(b'\t')
///     .null_value("NA")
///     .parallel_describe(true)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Field delimiter of the input resource.
    /// If None, the delimiter is detected from the path and header line.
    /// Default: None
    pub delimiter: Option<u8>,

    /// Number of rows scanned when inferring column types.
    /// If None, every row is scanned.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Extra field values treated as missing, on top of empty fields.
    /// Default: empty
    pub null_values: Vec<String>,

    /// Whether to summarize columns on separate threads.
    /// Default: false
    pub parallel_describe: bool,

    /// Missing fraction (0.0 - 1.0) above which a column is considered sparse.
    /// Default: 0.7 (70%)
    pub sparse_column_threshold: f64,

    /// Output directory for reports and cleaned data.
    /// Default: "outputs"
    pub output_dir: PathBuf,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            infer_schema_length: None,
            null_values: Vec::new(),
            parallel_describe: false,
            sparse_column_threshold: DEFAULT_SPARSE_COLUMN_THRESHOLD,
            output_dir: PathBuf::from("outputs"),
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.sparse_column_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "sparse_column_threshold".to_string(),
                value: self.sparse_column_threshold,
            });
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidSchemaLength(0));
        }

        if let Some(delimiter) = self.delimiter
            && matches!(delimiter, b'"' | b'\n' | b'\r')
        {
            return Err(ConfigValidationError::InvalidDelimiter(delimiter as char));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid schema inference length: {0} (must be at least 1)")]
    InvalidSchemaLength(usize),

    #[error("Invalid delimiter: {0:?}")]
    InvalidDelimiter(char),
}

impl From<ConfigValidationError> for crate::error::ProfilerError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::ProfilerError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    delimiter: Option<u8>,
    infer_schema_length: Option<usize>,
    null_values: Vec<String>,
    parallel_describe: Option<bool>,
    sparse_column_threshold: Option<f64>,
    output_dir: Option<PathBuf>,
}

impl ProfilerConfigBuilder {
    /// Set the field delimiter explicitly, disabling auto-detection.
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Limit type inference to the first `rows` rows instead of the whole file.
    pub fn infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Treat an additional field value as missing (e.g. `"NA"`).
    pub fn null_value(mut self, marker: impl Into<String>) -> Self {
        self.null_values.push(marker.into());
        self
    }

    /// Enable or disable per-column threads in `describe`.
    pub fn parallel_describe(mut self, parallel: bool) -> Self {
        self.parallel_describe = Some(parallel);
        self
    }

    /// Set the missing fraction above which a column is considered sparse.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.7 = 70%)
    pub fn sparse_column_threshold(mut self, threshold: f64) -> Self {
        self.sparse_column_threshold = Some(threshold);
        self
    }

    /// Set the output directory for reports and cleaned data.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let config = ProfilerConfig {
            delimiter: self.delimiter,
            infer_schema_length: self.infer_schema_length,
            null_values: self.null_values,
            parallel_describe: self.parallel_describe.unwrap_or(false),
            sparse_column_threshold: self
                .sparse_column_threshold
                .unwrap_or(DEFAULT_SPARSE_COLUMN_THRESHOLD),
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("outputs")),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProfilerConfig::default();
        assert_eq!(config.delimiter, None);
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.sparse_column_threshold, 0.7);
        assert!(config.null_values.is_empty());
        assert!(!config.parallel_describe);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = ProfilerConfig::builder()
            .delimiter(b'\t')
            .infer_schema_length(500)
            .null_value("NA")
            .null_value("?")
            .parallel_describe(true)
            .sparse_column_threshold(0.5)
            .output_dir("reports")
            .build()
            .unwrap();

        assert_eq!(config.delimiter, Some(b'\t'));
        assert_eq!(config.infer_schema_length, Some(500));
        assert_eq!(config.null_values, vec!["NA".to_string(), "?".to_string()]);
        assert!(config.parallel_describe);
        assert_eq!(config.sparse_column_threshold, 0.5);
        assert_eq!(config.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = ProfilerConfig::builder().sparse_column_threshold(1.5).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_invalid_schema_length() {
        let result = ProfilerConfig::builder().infer_schema_length(0).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidSchemaLength(0)
        ));
    }

    #[test]
    fn test_validation_invalid_delimiter() {
        let result = ProfilerConfig::builder().delimiter(b'"').build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidDelimiter('"')
        ));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "delimiter": 59,
            "infer_schema_length": 10,
            "null_values": ["NA"],
            "parallel_describe": true,
            "sparse_column_threshold": 0.4,
            "output_dir": "custom_output"
        }"#;

        let config: ProfilerConfig = serde_json::from_str(json).expect("Should deserialize");

        assert_eq!(config.delimiter, Some(b';'));
        assert_eq!(config.infer_schema_length, Some(10));
        assert_eq!(config.null_values, vec!["NA".to_string()]);
        assert!(config.parallel_describe);
        assert_eq!(config.sparse_column_threshold, 0.4);
        assert_eq!(config.output_dir.to_str().unwrap(), "custom_output");
    }
}
