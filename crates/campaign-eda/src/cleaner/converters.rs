//! Type conversion functions for data cleaning.

use crate::error::{EdaError, Result};
use crate::utils::{is_numeric_dtype, parse_currency};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use tracing::{debug, warn};

/// Days between 0001-01-01 and 1970-01-01; polars stores `Date` as days since the epoch.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

// Date layouts tried when no explicit format is configured, first match wins.
static DATE_LAYOUTS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{2}$").expect("Invalid regex: M/D/YY"),
            "%m/%d/%y",
        ),
        (
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("Invalid regex: M/D/YYYY"),
            "%m/%d/%Y",
        ),
        (
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("Invalid regex: YYYY-MM-DD"),
            "%Y-%m-%d",
        ),
        (
            Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").expect("Invalid regex: YYYY/MM/DD"),
            "%Y/%m/%d",
        ),
        (
            Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}$").expect("Invalid regex: DD-MM-YYYY"),
            "%d-%m-%Y",
        ),
        (
            Regex::new(r"^\d{1,2}\.\d{1,2}\.\d{4}$").expect("Invalid regex: DD.MM.YYYY"),
            "%d.%m.%Y",
        ),
        (
            Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}$").expect("Invalid regex: datetime"),
            "%Y-%m-%d %H:%M:%S",
        ),
        (
            Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}$").expect("Invalid regex: ISO"),
            "%Y-%m-%dT%H:%M:%S",
        ),
    ]
});

/// Convert a currency-formatted string series to Float64.
///
/// Blank and unparseable cells become null. Returns the converted series and
/// the number of non-blank cells that could not be parsed.
pub(crate) fn currency_to_float(series: &Series) -> Result<(Series, usize)> {
    if is_numeric_dtype(series.dtype()) {
        return Ok((series.cast(&DataType::Float64)?, 0));
    }

    if series.dtype() != &DataType::String {
        return Err(EdaError::TypeConversionFailed {
            column: series.name().to_string(),
            target_type: "Float64".to_string(),
            reason: format!("unsupported source dtype {}", series.dtype()),
        });
    }

    let str_series = series.str()?;
    let mut result_vec: Vec<Option<f64>> = Vec::with_capacity(str_series.len());
    let mut unparseable = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) => {
                let parsed = parse_currency(val);
                if parsed.is_none() && !val.trim().is_empty() {
                    debug!("Unparseable currency value '{}' in {}", val, series.name());
                    unparseable += 1;
                }
                result_vec.push(parsed);
            }
            None => result_vec.push(None),
        }
    }

    Ok((Series::new(series.name().clone(), result_vec), unparseable))
}

/// Infer a chrono format from a sample value.
pub(crate) fn infer_date_format(sample: &str) -> Option<&'static str> {
    let sample = sample.trim();
    DATE_LAYOUTS
        .iter()
        .find(|(pattern, _)| pattern.is_match(sample))
        .map(|(_, format)| *format)
}

/// Parse a single value with a chrono format, accepting date-only or date-time layouts.
pub(crate) fn parse_date_value(value: &str, format: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, format)
                .ok()
                .map(|dt| dt.date())
        })
}

/// Convert a date-formatted string series to a polars `Date` series.
///
/// Null and blank cells stay null. Any other cell that fails to parse aborts
/// the conversion with [`EdaError::DateParseFailed`]; dates are never
/// silently degraded.
pub(crate) fn string_to_date(series: &Series, format: Option<&str>) -> Result<Series> {
    match series.dtype() {
        DataType::Date => return Ok(series.clone()),
        DataType::Datetime(_, _) => return Ok(series.cast(&DataType::Date)?),
        DataType::String => {}
        other => {
            return Err(EdaError::TypeConversionFailed {
                column: series.name().to_string(),
                target_type: "Date".to_string(),
                reason: format!("unsupported source dtype {}", other),
            });
        }
    }

    let column = series.name().to_string();
    let str_series = series.str()?;

    let format: Option<String> = match format {
        Some(f) => Some(f.to_string()),
        None => {
            let first = str_series
                .into_iter()
                .enumerate()
                .find_map(|(row, v)| v.filter(|s| !s.trim().is_empty()).map(|s| (row, s)));

            match first {
                Some((row, sample)) => match infer_date_format(sample) {
                    Some(f) => {
                        debug!("Inferred date format '{}' for {}", f, column);
                        Some(f.to_string())
                    }
                    None => {
                        return Err(EdaError::DateParseFailed {
                            column,
                            row,
                            value: sample.to_string(),
                        });
                    }
                },
                None => {
                    warn!("Date column '{}' has no values to parse", column);
                    None
                }
            }
        }
    };

    let mut days: Vec<Option<i32>> = Vec::with_capacity(str_series.len());
    for (row, opt_val) in str_series.into_iter().enumerate() {
        match (opt_val, format.as_deref()) {
            (Some(val), Some(fmt)) if !val.trim().is_empty() => {
                let date = parse_date_value(val, fmt).ok_or_else(|| EdaError::DateParseFailed {
                    column: column.clone(),
                    row,
                    value: val.to_string(),
                })?;
                days.push(Some(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE));
            }
            _ => days.push(None),
        }
    }

    Ok(Series::new(series.name().clone(), days).cast(&DataType::Date)?)
}
