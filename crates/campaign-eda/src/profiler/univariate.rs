//! Univariate summaries for discrete and continuous columns.

use super::statistics::{mean, quantile_sorted, sample_variance, sorted};
use crate::error::Result;
use crate::types::{ContinuousSummary, DiscreteSummary, ValueCount};
use crate::utils::{column_as_f64, column_as_labels};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Count, distinct values and frequency table for each named column.
///
/// Read-only; missing values are counted separately and never imputed.
pub fn summarize_discrete<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> Result<Vec<DiscreteSummary>> {
    columns
        .iter()
        .map(|name| summarize_discrete_column(df, name.as_ref()))
        .collect()
}

/// Min, max, mean, median and spread for each named column.
///
/// Read-only; statistics are computed over non-missing values only.
pub fn summarize_continuous<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
) -> Result<Vec<ContinuousSummary>> {
    columns
        .iter()
        .map(|name| summarize_continuous_column(df, name.as_ref()))
        .collect()
}

fn summarize_discrete_column(df: &DataFrame, column: &str) -> Result<DiscreteSummary> {
    let labels = column_as_labels(df, column)?;

    let mut distinct_values: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut missing = 0;

    for label in labels {
        match label {
            Some(value) => {
                let entry = counts.entry(value.clone()).or_insert(0);
                if *entry == 0 {
                    distinct_values.push(value);
                }
                *entry += 1;
            }
            None => missing += 1,
        }
    }

    // Stable sort keeps first-appearance order among equal counts
    let mut value_counts: Vec<ValueCount> = distinct_values
        .iter()
        .map(|value| ValueCount {
            value: value.clone(),
            count: counts[value],
        })
        .collect();
    value_counts.sort_by(|a, b| b.count.cmp(&a.count));

    let count = value_counts.iter().map(|vc| vc.count).sum();
    debug!(
        "Discrete summary for {}: {} values, {} distinct",
        column,
        count,
        distinct_values.len()
    );

    Ok(DiscreteSummary {
        column: column.to_string(),
        count,
        missing,
        distinct_count: distinct_values.len(),
        distinct_values,
        value_counts,
    })
}

fn summarize_continuous_column(df: &DataFrame, column: &str) -> Result<ContinuousSummary> {
    let raw = column_as_f64(df, column)?;
    let missing = raw.iter().filter(|v| v.is_none()).count();
    let values: Vec<f64> = raw.into_iter().flatten().collect();
    let sorted_values = sorted(&values);

    let min = sorted_values.first().copied();
    let max = sorted_values.last().copied();
    let variance = sample_variance(&values);
    let q1 = quantile_sorted(&sorted_values, 0.25);
    let q3 = quantile_sorted(&sorted_values, 0.75);

    debug!("Continuous summary for {}: {} values", column, values.len());

    Ok(ContinuousSummary {
        column: column.to_string(),
        count: values.len(),
        missing,
        min,
        max,
        sum: values.iter().sum(),
        mean: mean(&values),
        median: quantile_sorted(&sorted_values, 0.5),
        variance,
        std: variance.map(f64::sqrt),
        range: min.zip(max).map(|(lo, hi)| hi - lo),
        q1,
        q3,
        iqr: q1.zip(q3).map(|(lo, hi)| hi - lo),
    })
}
