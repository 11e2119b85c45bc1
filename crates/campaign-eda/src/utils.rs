//! Shared utilities for the analysis pipeline.
//!
//! This module contains the dtype helpers and column accessors used across
//! the cleaner, the classifier and the analyzers.

use crate::error::{EdaError, Result};
use polars::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a data type for analysis purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Date or datetime types
    Datetime,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Other/unknown types
    Other,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
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
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is a datetime type.
#[inline]
pub fn is_datetime_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Datetime(_, _) | DataType::Date | DataType::Time
    )
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if is_datetime_dtype(dtype) {
        DtypeCategory::Datetime
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String | DataType::Categorical(_, _)) {
        DtypeCategory::String
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// String Parsing Utilities
// =============================================================================

/// Currency symbols stripped from the front of monetary values.
pub const CURRENCY_SYMBOLS: [char; 3] = ['$', '€', '£'];

/// Thousands separator removed from monetary values.
pub const GROUPING_SEPARATOR: char = ',';

/// Strip currency formatting from a string.
///
/// ```rust,ignore
/// assert_eq!(clean_currency_string(" $84,835.00 "), "84835.00");
/// ```
pub fn clean_currency_string(s: &str) -> String {
    let trimmed = s.trim();
    let without_symbol = trimmed
        .strip_prefix(|c: char| CURRENCY_SYMBOLS.contains(&c))
        .unwrap_or(trimmed);
    without_symbol
        .chars()
        .filter(|c| *c != GROUPING_SEPARATOR)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Parse a currency-formatted string into an `f64`.
///
/// Returns `None` for blank or unparseable input.
pub fn parse_currency(s: &str) -> Option<f64> {
    let cleaned = clean_currency_string(s);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Order two category labels, comparing numerically when both parse as numbers.
///
/// Numeric labels sort before text labels, so `"2" < "10" < "Married"`.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

// =============================================================================
// Column Access Utilities
// =============================================================================

/// Look up a column, mapping a miss to [`EdaError::ColumnNotFound`].
pub fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|col| col.as_materialized_series())
        .map_err(|_| EdaError::ColumnNotFound(name.to_string()))
}

/// Owned list of column names in table order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a numeric column as `f64` values, keeping nulls.
///
/// NaN values are treated as missing.
pub fn column_as_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = require_column(df, name)?;
    series_as_f64(series)
}

/// Read a numeric series as `f64` values, keeping nulls.
pub fn series_as_f64(series: &Series) -> Result<Vec<Option<f64>>> {
    if !is_numeric_dtype(series.dtype()) {
        return Err(EdaError::TypeConversionFailed {
            column: series.name().to_string(),
            target_type: "Float64".to_string(),
            reason: format!("column has non-numeric dtype {}", series.dtype()),
        });
    }

    let float_series = series.cast(&DataType::Float64)?;
    let values = float_series
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Ok(values)
}

/// Read any column as display labels, keeping nulls.
pub fn column_as_labels(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = require_column(df, name)?;
    series_as_labels(series)
}

/// Read any series as display labels, keeping nulls.
pub fn series_as_labels(series: &Series) -> Result<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    let labels = str_series
        .str()?
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect();
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_currency_string() {
        assert_eq!(clean_currency_string("$84,835.00"), "84835.00");
        assert_eq!(clean_currency_string(" $6,560.00 "), "6560.00");
        assert_eq!(clean_currency_string("$0.00"), "0.00");
        assert_eq!(clean_currency_string("1,000"), "1000");
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$6,560.00"), Some(6560.0));
        assert_eq!(parse_currency("$0.00"), Some(0.0));
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("   "), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("n/a"), None);
    }

    #[test]
    fn test_compare_labels_numeric_aware() {
        let mut labels = vec!["10", "2", "Single", "1", "Married"];
        labels.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(labels, vec!["1", "2", "10", "Married", "Single"]);
    }

    #[test]
    fn test_dtype_category() {
        assert_eq!(get_dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(get_dtype_category(&DataType::Date), DtypeCategory::Datetime);
        assert_eq!(get_dtype_category(&DataType::String), DtypeCategory::String);
        assert_eq!(get_dtype_category(&DataType::Boolean), DtypeCategory::Boolean);
    }

    #[test]
    fn test_require_column_missing() {
        let df = df!["a" => [1, 2]].unwrap();
        let err = require_column(&df, "b").unwrap_err();
        assert!(matches!(err, EdaError::ColumnNotFound(ref c) if c == "b"));
    }

    #[test]
    fn test_column_as_f64_keeps_nulls() {
        let df = df!["x" => [Some(1i64), None, Some(3)]].unwrap();
        let values = column_as_f64(&df, "x").unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_column_as_f64_rejects_text() {
        let df = df!["x" => ["a", "b"]].unwrap();
        assert!(column_as_f64(&df, "x").is_err());
    }

    #[test]
    fn test_column_as_labels() {
        let df = df!["x" => [Some(1i64), None]].unwrap();
        let labels = column_as_labels(&df, "x").unwrap();
        assert_eq!(labels, vec![Some("1".to_string()), None]);
    }
}
