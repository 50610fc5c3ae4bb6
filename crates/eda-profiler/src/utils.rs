//! Shared utilities for profiling and cleaning.
//!
//! This module contains the helpers used across modules: dtype
//! classification, reading polars columns as [`Value`] cells, missing-value
//! masks and fills that keep the column dtype, and the first-seen mode.

use crate::types::{ColumnKind, Value};
use polars::prelude::*;
use std::collections::HashMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    is_integer_dtype(dtype) || is_float_dtype(dtype)
}

/// Get the column kind of a DataType.
pub fn column_kind(dtype: &DataType) -> ColumnKind {
    if is_integer_dtype(dtype) {
        ColumnKind::Integer
    } else if is_float_dtype(dtype) {
        ColumnKind::Float
    } else if matches!(dtype, DataType::Boolean) {
        ColumnKind::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        ColumnKind::Text
    } else {
        ColumnKind::Other
    }
}

// =============================================================================
// Series <-> Value Conversion
// =============================================================================

/// Read every cell of a Series as a [`Value`].
///
/// Nulls and float NaNs are both reported as [`Value::Missing`].
pub fn series_values(series: &Series) -> PolarsResult<Vec<Value>> {
    let values: Vec<Value> = match column_kind(series.dtype()) {
        ColumnKind::Integer => {
            let cast = series.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map_or(Value::Missing, Value::Integer))
                .collect()
        }
        ColumnKind::Float => {
            let cast = series.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| match v {
                    Some(x) if !x.is_nan() => Value::Float(x),
                    _ => Value::Missing,
                })
                .collect()
        }
        ColumnKind::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| v.map_or(Value::Missing, Value::Boolean))
            .collect(),
        ColumnKind::Text | ColumnKind::Other => {
            let cast = series.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map_or(Value::Missing, |s| Value::Text(s.to_string())))
                .collect()
        }
    };

    Ok(values)
}

/// Convert a single polars cell into a [`Value`].
pub fn any_value_to_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Missing,
        AnyValue::Boolean(b) => Value::Boolean(b),
        AnyValue::Int8(v) => Value::Integer(v as i64),
        AnyValue::Int16(v) => Value::Integer(v as i64),
        AnyValue::Int32(v) => Value::Integer(v as i64),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(v as i64),
        AnyValue::UInt16(v) => Value::Integer(v as i64),
        AnyValue::UInt32(v) => Value::Integer(v as i64),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Value::Missing, Value::Integer),
        AnyValue::Float32(v) if !v.is_nan() => Value::Float(v as f64),
        AnyValue::Float64(v) if !v.is_nan() => Value::Float(v),
        AnyValue::Float32(_) | AnyValue::Float64(_) => Value::Missing,
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => Value::Text(other.to_string()),
    }
}

/// Number of missing cells.
pub fn count_missing(values: &[Value]) -> usize {
    values.iter().filter(|v| v.is_missing()).count()
}

// =============================================================================
// Series Utilities
// =============================================================================

/// Cast a numeric Series to Float64, turning NaN into null.
pub fn float_series(series: &Series) -> PolarsResult<Series> {
    let floats = series.cast(&DataType::Float64)?;
    let cleaned: Float64Chunked = floats
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(cleaned.with_name(series.name().clone()).into_series())
}

/// Rows that count as missing: nulls, plus NaN in float columns.
pub fn missing_mask(series: &Series) -> PolarsResult<BooleanChunked> {
    let nulls = series.is_null();
    if is_float_dtype(series.dtype()) {
        Ok(&nulls | &series.is_nan()?)
    } else {
        Ok(nulls)
    }
}

/// Replace every missing cell with the cell at row `source`.
///
/// The dtype of the column is preserved. Returns the new Series and the
/// number of cells replaced.
pub fn fill_missing_from_row(series: &Series, source: usize) -> PolarsResult<(Series, usize)> {
    let mask = missing_mask(series)?;
    let filled = mask.num_trues();
    if filled == 0 {
        return Ok((series.clone(), 0));
    }

    let fill = series.new_from_index(source, series.len());
    let present = !&mask;
    Ok((series.zip_with(&present, &fill)?, filled))
}

// =============================================================================
// Mode
// =============================================================================

/// Hashable identity of a non-missing cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Integer(i64),
    Float(u64),
    Boolean(bool),
    Text(String),
}

impl CellKey {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(v) => Some(CellKey::Integer(*v)),
            // -0.0 and 0.0 count as the same value
            Value::Float(v) => Some(CellKey::Float((*v + 0.0).to_bits())),
            Value::Boolean(v) => Some(CellKey::Boolean(*v)),
            Value::Text(v) => Some(CellKey::Text(v.clone())),
            Value::Missing => None,
        }
    }
}

/// Row of the first occurrence of the most frequent non-missing value, and
/// that value's count.
///
/// Ties are broken in favour of the value that occurs first in row order.
pub fn mode_index(values: &[Value]) -> Option<(usize, usize)> {
    let mut counts: HashMap<CellKey, (usize, usize)> = HashMap::new();
    for (idx, value) in values.iter().enumerate() {
        if let Some(key) = CellKey::of(value) {
            counts.entry(key).or_insert((0, idx)).0 += 1;
        }
    }

    counts
        .into_values()
        .max_by(|(count_a, first_a), (count_b, first_b)| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(count, first)| (first, count))
}

/// Most frequent non-missing value and its count.
pub fn mode(values: &[Value]) -> Option<(Value, usize)> {
    mode_index(values).map(|(first, count)| (values[first].clone(), count))
}

/// Number of distinct non-missing values.
pub fn unique_count(values: &[Value]) -> usize {
    values
        .iter()
        .filter_map(CellKey::of)
        .collect::<std::collections::HashSet<_>>()
        .len()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_kind() {
        assert_eq!(column_kind(&DataType::Int64), ColumnKind::Integer);
        assert_eq!(column_kind(&DataType::UInt8), ColumnKind::Integer);
        assert_eq!(column_kind(&DataType::Float32), ColumnKind::Float);
        assert_eq!(column_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(column_kind(&DataType::String), ColumnKind::Text);
        assert_eq!(column_kind(&DataType::Date), ColumnKind::Other);
        assert!(is_numeric_dtype(&DataType::Int32));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_series_values_maps_nulls_and_nan() {
        let series = Series::new("x".into(), &[Some(1.5), None, Some(f64::NAN)]);
        let values = series_values(&series).unwrap();
        assert_eq!(
            values,
            vec![Value::Float(1.5), Value::Missing, Value::Missing]
        );
    }

    #[test]
    fn test_series_values_text() {
        let series = Series::new("x".into(), &[Some("S"), None, Some("C")]);
        let values = series_values(&series).unwrap();
        assert_eq!(values, vec![Value::from("S"), Value::Missing, Value::from("C")]);
    }

    #[test]
    fn test_any_value_to_value() {
        assert_eq!(any_value_to_value(AnyValue::Null), Value::Missing);
        assert_eq!(any_value_to_value(AnyValue::Int32(7)), Value::Integer(7));
        assert_eq!(any_value_to_value(AnyValue::Float64(f64::NAN)), Value::Missing);
        assert_eq!(any_value_to_value(AnyValue::String("Q")), Value::from("Q"));
    }

    #[test]
    fn test_mode_first_encountered_tie_break() {
        let values = vec![
            Value::from("Q"),
            Value::from("S"),
            Value::Missing,
            Value::from("S"),
            Value::from("Q"),
        ];
        assert_eq!(mode(&values), Some((Value::from("Q"), 2)));
    }

    #[test]
    fn test_mode_majority_wins() {
        let values = vec![
            Value::from("C"),
            Value::from("S"),
            Value::from("S"),
            Value::from("Q"),
        ];
        assert_eq!(mode(&values), Some((Value::from("S"), 2)));
        assert_eq!(mode(&[Value::Missing, Value::Missing]), None);
    }

    #[test]
    fn test_unique_count_ignores_missing() {
        let values = vec![
            Value::Integer(1),
            Value::Missing,
            Value::Integer(1),
            Value::Integer(2),
        ];
        assert_eq!(unique_count(&values), 2);
    }

    #[test]
    fn test_float_series_turns_nan_into_null() {
        let series = Series::new("Fare".into(), &[Some(7.25), Some(f64::NAN), None]);
        let floats = float_series(&series).unwrap();
        assert_eq!(floats.name().as_str(), "Fare");
        assert_eq!(floats.null_count(), 2);

        let ints = Series::new("Age".into(), &[Some(22i64), None]);
        assert_eq!(float_series(&ints).unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_missing_mask_counts_nan_in_float_columns() {
        let series = Series::new("x".into(), &[Some(1.0), Some(f64::NAN), None]);
        assert_eq!(missing_mask(&series).unwrap().num_trues(), 2);

        let text = Series::new("s".into(), &[Some("NaN"), None]);
        assert_eq!(missing_mask(&text).unwrap().num_trues(), 1);
    }

    #[test]
    fn test_fill_missing_from_row_keeps_dtype() {
        let dates = Series::new("d".into(), &[Some("2024-01-01"), None, Some("2024-03-05")])
            .cast(&DataType::Date)
            .unwrap();

        let (filled, count) = fill_missing_from_row(&dates, 0).unwrap();

        assert_eq!(count, 1);
        assert_eq!(filled.dtype(), &DataType::Date);
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1).unwrap(), dates.get(0).unwrap());
    }

    #[test]
    fn test_fill_missing_from_row_without_missing() {
        let series = Series::new("n".into(), &[1i64, 2, 3]);
        let (filled, count) = fill_missing_from_row(&series, 0).unwrap();
        assert_eq!(count, 0);
        assert!(filled.equals_missing(&series));
    }

    #[test]
    fn test_mode_index_reports_first_row() {
        let values = vec![
            Value::Missing,
            Value::from("C"),
            Value::from("S"),
            Value::from("S"),
        ];
        assert_eq!(mode_index(&values), Some((2, 2)));
        assert_eq!(mode_index(&[Value::Missing]), None);
    }
}
