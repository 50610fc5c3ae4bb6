use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProfilerError;

/// A single cell of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Missing,
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of the cell; booleans and text are not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Missing => Ok(()),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

/// Logical type of a column, derived from its storage dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Dates, nested types and anything else the reader produced.
    Other,
}

impl ColumnKind {
    /// Integer and float columns take part in numeric statistics.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Text => "text",
            ColumnKind::Other => "other",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

// ============================================================================
// Summaries
// ============================================================================

/// Kind-specific statistics of a column.
///
/// Numeric statistics are NaN when the column has no non-missing values;
/// NaN serializes as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnStats {
    Numeric {
        min: f64,
        max: f64,
        mean: f64,
        /// Sample standard deviation (n - 1).
        std: f64,
        q1: f64,
        median: f64,
        q3: f64,
        skewness: f64,
    },
    Categorical {
        /// Most frequent value, ties going to the earliest row.
        mode: Option<Value>,
        mode_count: usize,
    },
}

/// Per-column aggregate produced by `describe`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    /// Number of non-missing values.
    pub count: usize,
    pub missing_count: usize,
    pub missing_percentage: f64,
    /// Number of distinct non-missing values.
    pub unique_count: usize,
    pub stats: ColumnStats,
}

impl ColumnSummary {
    pub fn total(&self) -> usize {
        self.count + self.missing_count
    }

    pub fn mean(&self) -> Option<f64> {
        match self.stats {
            ColumnStats::Numeric { mean, .. } => Some(mean),
            ColumnStats::Categorical { .. } => None,
        }
    }

    pub fn median(&self) -> Option<f64> {
        match self.stats {
            ColumnStats::Numeric { median, .. } => Some(median),
            ColumnStats::Categorical { .. } => None,
        }
    }

    pub fn mode(&self) -> Option<&Value> {
        match &self.stats {
            ColumnStats::Categorical { mode, .. } => mode.as_ref(),
            ColumnStats::Numeric { .. } => None,
        }
    }
}

/// Column summaries of a whole dataset, in column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetDescription {
    pub row_count: usize,
    pub column_count: usize,
    pub columns: Vec<ColumnSummary>,
}

impl DatasetDescription {
    /// Look up the summary of a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnSummary> {
        self.columns.iter()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Total number of missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing_count).sum()
    }
}

/// Pairwise Pearson coefficients between the numeric columns of a dataset.
///
/// `values[i][j]` is the coefficient of `columns[i]` and `columns[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient of two columns, or None if either is not in the matrix.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }

    /// Column pairs (upper triangle) whose |r| is at least `threshold`,
    /// strongest first.
    pub fn strong_pairs(&self, threshold: f64) -> Vec<(String, String, f64)> {
        let mut pairs = Vec::new();
        for i in 0..self.columns.len() {
            for j in (i + 1)..self.columns.len() {
                let r = self.values[i][j];
                if !r.is_nan() && r.abs() >= threshold {
                    pairs.push((self.columns[i].clone(), self.columns[j].clone(), r));
                }
            }
        }
        pairs.sort_by(|a, b| b.2.abs().total_cmp(&a.2.abs()));
        pairs
    }
}

// ============================================================================
// Cleaning
// ============================================================================

/// How missing values of a column are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Median of the non-missing values; numeric columns only.
    Median,
    /// Most frequent non-missing value; any column.
    Mode,
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillStrategy::Median => f.write_str("median"),
            FillStrategy::Mode => f.write_str("mode"),
        }
    }
}

impl FromStr for FillStrategy {
    type Err = ProfilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(FillStrategy::Median),
            "mode" => Ok(FillStrategy::Mode),
            other => Err(ProfilerError::InvalidConfig(format!(
                "unknown fill strategy '{}' (expected 'median' or 'mode')",
                other
            ))),
        }
    }
}

/// Result of filling one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillOutcome {
    pub column: String,
    pub strategy: FillStrategy,
    /// The value written into missing cells; `Missing` if nothing could be computed.
    pub fill_value: Value,
    /// Number of cells that were filled.
    pub filled: usize,
}

/// One step of a [`CleaningPlan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CleaningAction {
    Fill {
        column: String,
        strategy: FillStrategy,
    },
    DropColumn {
        name: String,
    },
    /// Without a threshold the step uses `ProfilerConfig::sparse_column_threshold`.
    DropSparse {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
    },
}

impl fmt::Display for CleaningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleaningAction::Fill { column, strategy } => {
                write!(f, "fill '{}' with {}", column, strategy)
            }
            CleaningAction::DropColumn { name } => write!(f, "drop column '{}' if present", name),
            CleaningAction::DropSparse {
                threshold: Some(threshold),
            } => write!(f, "drop columns with >{:.0}% missing", threshold * 100.0),
            CleaningAction::DropSparse { threshold: None } => {
                f.write_str("drop columns above the configured missing threshold")
            }
        }
    }
}

/// Ordered list of cleaning steps, applied with `DataCleaner::apply_plan`.
///
/// # Example
///
/// ```rust,ignore
/// use eda_profiler::{CleaningPlan, FillStrategy};
///
/// let plan = CleaningPlan::new()
///     .fill("Age", FillStrategy::Median)
///     .fill("Embarked", FillStrategy::Mode)
///     .drop_column("Cabin");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningPlan {
    pub steps: Vec<CleaningAction>,
}

impl CleaningPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Titanic walkthrough: median Age, modal Embarked, no Cabin.
    pub fn titanic() -> Self {
        Self::new()
            .fill("Age", FillStrategy::Median)
            .fill("Embarked", FillStrategy::Mode)
            .drop_column("Cabin")
    }

    pub fn fill(mut self, column: impl Into<String>, strategy: FillStrategy) -> Self {
        self.steps.push(CleaningAction::Fill {
            column: column.into(),
            strategy,
        });
        self
    }

    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        self.steps.push(CleaningAction::DropColumn { name: name.into() });
        self
    }

    pub fn drop_sparse(mut self, threshold: f64) -> Self {
        self.steps.push(CleaningAction::DropSparse {
            threshold: Some(threshold),
        });
        self
    }

    /// Drop sparse columns using the threshold of the config the plan runs with.
    pub fn drop_sparse_configured(mut self) -> Self {
        self.steps.push(CleaningAction::DropSparse { threshold: None });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Parse a plan from JSON and validate it.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let plan: CleaningPlan = serde_json::from_str(json)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Reject thresholds outside 0.0 - 1.0 and empty column names.
    pub fn validate(&self) -> crate::error::Result<()> {
        for step in &self.steps {
            match step {
                CleaningAction::DropSparse {
                    threshold: Some(threshold),
                } if !(0.0..=1.0).contains(threshold) => {
                    return Err(ProfilerError::InvalidConfig(format!(
                        "sparse threshold {} must be between 0.0 and 1.0",
                        threshold
                    )));
                }
                CleaningAction::Fill { column: name, .. }
                | CleaningAction::DropColumn { name }
                    if name.trim().is_empty() =>
                {
                    return Err(ProfilerError::InvalidConfig(format!(
                        "empty column name in step '{}'",
                        step
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(22).to_string(), "22");
        assert_eq!(Value::Float(30.0).to_string(), "30");
        assert_eq!(Value::Float(29.5).to_string(), "29.5");
        assert_eq!(Value::from("S").to_string(), "S");
        assert_eq!(Value::Missing.to_string(), "");
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Integer(1),
            Value::Float(2.5),
            Value::Boolean(true),
            Value::from("C"),
            Value::Missing,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,2.5,true,"C",null]"#);
    }

    #[test]
    fn test_fill_strategy_from_str() {
        assert_eq!("median".parse::<FillStrategy>().unwrap(), FillStrategy::Median);
        assert_eq!(" MODE ".parse::<FillStrategy>().unwrap(), FillStrategy::Mode);
        assert!("mean".parse::<FillStrategy>().is_err());
    }

    #[test]
    fn test_titanic_plan() {
        let plan = CleaningPlan::titanic();
        assert_eq!(
            plan.steps,
            vec![
                CleaningAction::Fill {
                    column: "Age".to_string(),
                    strategy: FillStrategy::Median
                },
                CleaningAction::Fill {
                    column: "Embarked".to_string(),
                    strategy: FillStrategy::Mode
                },
                CleaningAction::DropColumn {
                    name: "Cabin".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_plan_from_json() {
        let json = r#"{
            "steps": [
                {"action": "fill", "column": "Age", "strategy": "median"},
                {"action": "drop_sparse", "threshold": 0.5},
                {"action": "drop_column", "name": "Ticket"},
                {"action": "drop_sparse"}
            ]
        }"#;
        let plan = CleaningPlan::from_json(json).unwrap();
        assert_eq!(plan.steps.len(), 4);
        assert_eq!(
            plan.steps[1],
            CleaningAction::DropSparse {
                threshold: Some(0.5)
            }
        );
        assert_eq!(plan.steps[3], CleaningAction::DropSparse { threshold: None });
        assert_eq!(
            serde_json::to_string(&plan.steps[3]).unwrap(),
            r#"{"action":"drop_sparse"}"#
        );
    }

    #[test]
    fn test_plan_validation() {
        assert!(CleaningPlan::new().drop_sparse(1.2).validate().is_err());
        assert!(CleaningPlan::new().drop_sparse_configured().validate().is_ok());
        assert!(CleaningPlan::new().drop_column("  ").validate().is_err());
        assert!(CleaningPlan::titanic().validate().is_ok());
    }

    #[test]
    fn test_correlation_lookup_and_strong_pairs() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            values: vec![
                vec![1.0, 0.9, -0.2],
                vec![0.9, 1.0, f64::NAN],
                vec![-0.2, f64::NAN, 1.0],
            ],
        };
        assert_eq!(matrix.get("a", "b"), Some(0.9));
        assert_eq!(matrix.get("a", "z"), None);

        let pairs = matrix.strong_pairs(0.5);
        assert_eq!(pairs, vec![("a".to_string(), "b".to_string(), 0.9)]);
    }
}
