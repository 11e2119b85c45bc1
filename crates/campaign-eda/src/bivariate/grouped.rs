//! Aggregate statistics of a numeric column within the groups of a categorical one.

use crate::error::Result;
use crate::profiler::statistics::{mean, quantile_sorted, sample_std, sorted};
use crate::types::{GroupStats, GroupedStats};
use crate::utils::{column_as_f64, column_as_labels, compare_labels};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Partition rows by `group_column` and summarize `target_column` per group.
///
/// Groups are sorted by label and rows with a missing group key are dropped.
/// Missing target values are skipped; a group with no target values keeps
/// its size but reports `None` statistics.
pub fn grouped_stats(df: &DataFrame, group_column: &str, target_column: &str) -> Result<GroupedStats> {
    let keys = column_as_labels(df, group_column)?;
    let targets = column_as_f64(df, target_column)?;

    let mut buckets: HashMap<String, (usize, Vec<f64>)> = HashMap::new();
    for (key, value) in keys.into_iter().zip(targets) {
        let Some(key) = key else { continue };
        let bucket = buckets.entry(key).or_insert_with(|| (0, Vec::new()));
        bucket.0 += 1;
        if let Some(v) = value {
            bucket.1.push(v);
        }
    }

    let mut labels: Vec<String> = buckets.keys().cloned().collect();
    labels.sort_by(|a, b| compare_labels(a, b));

    let groups = labels
        .into_iter()
        .map(|label| {
            let (size, values) = &buckets[&label];
            let sorted_values = sorted(values);
            GroupStats {
                group: label.clone(),
                size: *size,
                count: values.len(),
                min: sorted_values.first().copied(),
                max: sorted_values.last().copied(),
                mean: mean(values),
                median: quantile_sorted(&sorted_values, 0.5),
                std: sample_std(values),
            }
        })
        .collect::<Vec<_>>();

    debug!(
        "Grouped {} by {}: {} groups",
        target_column,
        group_column,
        groups.len()
    );

    Ok(GroupedStats {
        group_column: group_column.to_string(),
        target_column: target_column.to_string(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;

    #[test]
    fn test_grouped_stats_reference_example() {
        let df = df![
            "group" => ["A", "A", "B", "A"],
            "value" => [1.0, 2.0, 10.0, 3.0],
        ]
        .unwrap();

        let stats = grouped_stats(&df, "group", "value").unwrap();
        let a = stats.group("A").unwrap();
        let b = stats.group("B").unwrap();

        assert_eq!(a.mean, Some(2.0));
        assert_eq!(b.mean, Some(10.0));
        assert_eq!(a.min, Some(1.0));
        assert_eq!(b.min, Some(10.0));
        assert_eq!(a.max, Some(3.0));
        assert_eq!(a.median, Some(2.0));
        assert_eq!(a.size, 3);
        assert_eq!(b.std, None);
    }

    #[test]
    fn test_grouped_stats_sorted_groups() {
        let df = df![
            "Marital_Status" => ["Single", "Married", "Divorced", "Married"],
            "Income" => [1.0, 2.0, 3.0, 4.0],
        ]
        .unwrap();

        let stats = grouped_stats(&df, "Marital_Status", "Income").unwrap();
        let order: Vec<&str> = stats.groups.iter().map(|g| g.group.as_str()).collect();
        assert_eq!(order, vec!["Divorced", "Married", "Single"]);
    }

    #[test]
    fn test_grouped_stats_skips_missing() {
        let df = df![
            "g" => [Some("A"), Some("A"), None, Some("B")],
            "v" => [Some(1.0), None, Some(100.0), None],
        ]
        .unwrap();

        let stats = grouped_stats(&df, "g", "v").unwrap();
        assert_eq!(stats.groups.len(), 2);

        let a = stats.group("A").unwrap();
        assert_eq!(a.size, 2);
        assert_eq!(a.count, 1);
        assert_eq!(a.mean, Some(1.0));

        let b = stats.group("B").unwrap();
        assert_eq!(b.count, 0);
        assert_eq!(b.mean, None);
    }

    #[test]
    fn test_grouped_stats_text_target_rejected() {
        let df = df!["g" => ["A"], "v" => ["x"]].unwrap();
        assert!(matches!(
            grouped_stats(&df, "g", "v"),
            Err(EdaError::TypeConversionFailed { .. })
        ));
    }
}
