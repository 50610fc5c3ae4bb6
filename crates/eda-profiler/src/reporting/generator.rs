use crate::dataset::Dataset;
use crate::error::{Result, ResultExt};
use crate::profiler::DatasetProfiler;
use crate::types::{CorrelationMatrix, DatasetDescription};
use chrono::Local;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Report Types
// ============================================================================

/// Everything a charting front end needs about a cleaned dataset.
///
/// Serialized as JSON for both `--json` stdout output and `--emit-report`.
/// NaN statistics appear as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct EdaReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path of the input file, if loaded from disk
    pub source: Option<String>,
    /// Shape (rows, columns) before cleaning
    pub original_shape: (usize, usize),
    /// Shape (rows, columns) after cleaning
    pub final_shape: (usize, usize),
    /// Missing cells per column before cleaning
    pub missing_before: Vec<(String, usize)>,
    /// One line per cleaning step applied
    pub cleaning_actions: Vec<String>,
    /// Column summaries of the cleaned dataset
    pub description: DatasetDescription,
    /// Correlations between numeric columns of the cleaned dataset
    pub correlation: CorrelationMatrix,
}

/// Inputs captured before cleaning, needed to build an [`EdaReport`].
pub struct ReportParams<'a> {
    pub source: Option<&'a str>,
    pub original_shape: (usize, usize),
    pub missing_before: Vec<(String, usize)>,
    pub cleaning_actions: &'a [String],
    pub parallel: bool,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Describe the cleaned dataset and correlate its numeric columns.
    pub fn build_report(dataset: &Dataset, params: ReportParams<'_>) -> Result<EdaReport> {
        let ReportParams {
            source,
            original_shape,
            missing_before,
            cleaning_actions,
            parallel,
        } = params;

        let description = DatasetProfiler::describe_with(dataset, parallel)
            .context("Describing cleaned dataset")?;
        let correlation = DatasetProfiler::correlation_matrix(dataset)
            .context("Computing correlation matrix")?;

        Ok(EdaReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            source: source.map(str::to_string),
            original_shape,
            final_shape: dataset.shape(),
            missing_before,
            cleaning_actions: cleaning_actions.to_vec(),
            description,
            correlation,
        })
    }

    /// Write a report to `<base_name>_report.json` in the output directory.
    pub fn write_report_to_file(&self, report: &EdaReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write the cleaned dataset to `<base_name>_cleaned.csv` in the output directory.
    pub fn write_dataset(&self, dataset: &Dataset, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let output_path = self.output_dir.join(format!("{}_cleaned.csv", base_name));
        let mut file = File::create(&output_path)?;
        let mut frame = dataset.frame().clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut frame)
            .context(format!("Writing {}", output_path.display()))?;

        info!("Dataset saved: {}", output_path.display());

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfilerConfig;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "eda_profiler_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample() -> Dataset {
        Dataset::parse(
            "Age,Fare,Sex\n22,7.25,male\n,71.28,female\n38,53.1,female\n",
            &ProfilerConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_report() {
        let ds = sample();
        let actions = vec!["Dropped column 'Cabin'".to_string()];
        let report = ReportGenerator::build_report(
            &ds,
            ReportParams {
                source: Some("train.csv"),
                original_shape: (3, 4),
                missing_before: ds.missing_counts().unwrap(),
                cleaning_actions: &actions,
                parallel: false,
            },
        )
        .unwrap();

        assert_eq!(report.source.as_deref(), Some("train.csv"));
        assert_eq!(report.original_shape, (3, 4));
        assert_eq!(report.final_shape, (3, 3));
        assert_eq!(report.description.columns.len(), 3);
        assert_eq!(report.correlation.columns, vec!["Age", "Fare"]);
        assert_eq!(report.cleaning_actions, actions);
    }

    #[test]
    fn test_report_json_uses_null_for_nan() {
        let ds = Dataset::from_frame(
            df![
                "Age" => [Option::<f64>::None, None],
                "Cabin" => [Option::<&str>::None, None],
            ]
            .unwrap(),
        );
        let report = ReportGenerator::build_report(
            &ds,
            ReportParams {
                source: None,
                original_shape: ds.shape(),
                missing_before: Vec::new(),
                cleaning_actions: &[],
                parallel: false,
            },
        )
        .unwrap();

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert!(json["description"]["columns"][0]["stats"]["mean"].is_null());
        assert!(json["description"]["columns"][1]["stats"]["mode"].is_null());
    }

    #[test]
    fn test_write_report_and_dataset() {
        let dir = temp_dir("write");
        let generator = ReportGenerator::new(&dir);
        let ds = sample();
        let report = ReportGenerator::build_report(
            &ds,
            ReportParams {
                source: None,
                original_shape: ds.shape(),
                missing_before: ds.missing_counts().unwrap(),
                cleaning_actions: &[],
                parallel: true,
            },
        )
        .unwrap();

        let report_path = generator.write_report_to_file(&report, "train").unwrap();
        let csv_path = generator.write_dataset(&ds, "train").unwrap();

        assert!(report_path.ends_with("train_report.json"));
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(written["final_shape"], serde_json::json!([3, 3]));

        let reloaded = Dataset::load(&csv_path, &ProfilerConfig::default()).unwrap();
        assert_eq!(reloaded.shape(), ds.shape());
        assert_eq!(reloaded.column_names(), ds.column_names());

        let _ = fs::remove_dir_all(&dir);
    }
}
