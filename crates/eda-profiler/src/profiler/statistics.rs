//! Statistical analysis functions for column summaries.

use crate::types::{ColumnStats, Value};
use crate::utils::{float_series, mode};
use polars::prelude::*;

/// Numeric statistics over the non-missing values of a column.
///
/// Every statistic is NaN when the column has no values. A column whose
/// values are all equal has a std and skewness of exactly 0.0.
pub(crate) fn numeric_stats(series: &Series) -> PolarsResult<ColumnStats> {
    let observed = float_series(series)?.drop_nulls();
    let values = observed.f64()?;

    let min = observed.min::<f64>()?.unwrap_or(f64::NAN);
    let max = observed.max::<f64>()?.unwrap_or(f64::NAN);
    let mean = observed.mean().unwrap_or(f64::NAN);
    let constant = observed.len() > 1 && min == max;

    let std = if observed.len() < 2 {
        f64::NAN
    } else if constant {
        0.0
    } else {
        values.std(1).unwrap_or(f64::NAN)
    };

    Ok(ColumnStats::Numeric {
        min,
        max,
        mean,
        std,
        q1: quantile(values, 0.25)?,
        median: observed.median().unwrap_or(f64::NAN),
        q3: quantile(values, 0.75)?,
        skewness: calculate_skewness(values, mean, std, constant),
    })
}

/// Mode statistics for a non-numeric column.
pub(crate) fn categorical_stats(values: &[Value]) -> ColumnStats {
    match mode(values) {
        Some((value, count)) => ColumnStats::Categorical {
            mode: Some(value),
            mode_count: count,
        },
        None => ColumnStats::Categorical {
            mode: None,
            mode_count: 0,
        },
    }
}

/// Quantile with linear interpolation between the closest ranks.
fn quantile(values: &Float64Chunked, q: f64) -> PolarsResult<f64> {
    Ok(values
        .quantile(q, QuantileMethod::Linear)?
        .unwrap_or(f64::NAN))
}

/// Skewness as the mean cubed z-score; 0.0 for constant columns.
pub(crate) fn calculate_skewness(
    values: &Float64Chunked,
    mean: f64,
    std: f64,
    constant: bool,
) -> f64 {
    if constant {
        return 0.0;
    }
    if values.is_empty() || std.is_nan() || std == 0.0 {
        return f64::NAN;
    }

    let n = values.len() as f64;
    values
        .into_iter()
        .flatten()
        .map(|v| ((v - mean) / std).powi(3))
        .sum::<f64>()
        / n
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numeric(values: &[f64]) -> ColumnStats {
        numeric_stats(&Series::new("x".into(), values)).unwrap()
    }

    fn unwrap_numeric(stats: ColumnStats) -> (f64, f64, f64, f64, f64, f64, f64, f64) {
        match stats {
            ColumnStats::Numeric {
                min,
                max,
                mean,
                std,
                q1,
                median,
                q3,
                skewness,
            } => (min, max, mean, std, q1, median, q3, skewness),
            other => panic!("expected numeric stats, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_stats_basic() {
        let (min, max, mean, std, q1, median, q3, _) =
            unwrap_numeric(numeric(&[5.0, 1.0, 3.0, 2.0, 4.0]));
        assert_eq!(min, 1.0);
        assert_eq!(max, 5.0);
        assert_eq!(mean, 3.0);
        // Variance = 10 / 4 = 2.5
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(q1, 2.0);
        assert_eq!(median, 3.0);
        assert_eq!(q3, 4.0);
    }

    #[test]
    fn test_quartiles_interpolate_linearly() {
        let (_, _, _, _, q1, median, q3, _) = unwrap_numeric(numeric(&[4.0, 1.0, 3.0, 2.0]));
        assert_eq!(q1, 1.75);
        assert_eq!(median, 2.5);
        assert_eq!(q3, 3.25);
    }

    #[test]
    fn test_numeric_stats_skip_missing_and_nan() {
        let series = Series::new("Age".into(), &[Some(22.0), None, Some(f64::NAN), Some(38.0)]);
        let (min, max, mean, _, _, median, _, _) =
            unwrap_numeric(numeric_stats(&series).unwrap());
        assert_eq!((min, max, mean, median), (22.0, 38.0, 30.0, 30.0));
    }

    #[test]
    fn test_numeric_stats_empty_is_nan() {
        let series = Series::new("x".into(), &[Option::<f64>::None, None]);
        let (min, max, mean, std, q1, median, q3, skewness) =
            unwrap_numeric(numeric_stats(&series).unwrap());
        for stat in [min, max, mean, std, q1, median, q3, skewness] {
            assert!(stat.is_nan());
        }
    }

    #[test]
    fn test_single_value_has_nan_std() {
        let (_, _, mean, std, _, _, _, skewness) = unwrap_numeric(numeric(&[5.0]));
        assert_eq!(mean, 5.0);
        assert!(std.is_nan());
        assert!(skewness.is_nan());
    }

    #[test]
    fn test_constant_column_has_no_spread() {
        // 0.1 has no exact binary form, so its mean is not exactly 0.1
        let (min, max, _, std, _, _, _, skewness) = unwrap_numeric(numeric(&[0.1, 0.1, 0.1]));
        assert_eq!(min, max);
        assert_eq!(std, 0.0);
        assert_eq!(skewness, 0.0);

        let (_, _, _, std, _, _, _, skewness) = unwrap_numeric(numeric(&[5.0, 5.0, 5.0, 5.0]));
        assert_eq!(std, 0.0);
        assert_eq!(skewness, 0.0);
    }

    #[test]
    fn test_skewness_direction() {
        let (_, _, _, _, _, _, _, right) = unwrap_numeric(numeric(&[1.0, 1.0, 1.0, 2.0, 10.0]));
        assert!(right > 0.0);

        let (_, _, _, _, _, _, _, left) =
            unwrap_numeric(numeric(&[-10.0, -2.0, -1.0, -1.0, -1.0]));
        assert!(left < 0.0);
    }

    #[test]
    fn test_categorical_stats() {
        let values = vec![
            Value::from("S"),
            Value::from("C"),
            Value::from("S"),
            Value::Missing,
        ];
        assert_eq!(
            categorical_stats(&values),
            ColumnStats::Categorical {
                mode: Some(Value::from("S")),
                mode_count: 2
            }
        );
        assert_eq!(
            categorical_stats(&[Value::Missing]),
            ColumnStats::Categorical {
                mode: None,
                mode_count: 0
            }
        );
    }
}
