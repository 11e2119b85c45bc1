//! Cross-tabulation of two categorical columns.

use crate::error::Result;
use crate::types::{CrossTab, MARGIN_LABEL, Normalize};
use crate::utils::{column_as_labels, compare_labels};
use polars::prelude::*;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Build a contingency table of `index` against `columns`.
///
/// Rows with a missing value in either column are dropped. Labels are sorted
/// (numerically when they parse as numbers). With `margins`, an `All`
/// row and/or column is appended following the usual dataframe convention:
///
/// | normalize | margin row | margin column |
/// |-----------|------------|---------------|
/// | `None`    | yes        | yes           |
/// | `All`     | yes        | yes           |
/// | `Index`   | yes        | no            |
/// | `Columns` | no         | yes           |
///
/// When no row has both values the table has no labels, and margins are
/// still appended with a zero grand total.
pub fn crosstab(
    df: &DataFrame,
    index: &str,
    columns: &str,
    normalize: Normalize,
    margins: bool,
) -> Result<CrossTab> {
    let index_labels = column_as_labels(df, index)?;
    let column_labels = column_as_labels(df, columns)?;

    let pairs: Vec<(String, String)> = index_labels
        .into_iter()
        .zip(column_labels)
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect();

    let row_labels = sorted_labels(pairs.iter().map(|(a, _)| a.as_str()));
    let col_labels = sorted_labels(pairs.iter().map(|(_, b)| b.as_str()));

    let row_pos: HashMap<&str, usize> = row_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();
    let col_pos: HashMap<&str, usize> = col_labels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let mut counts = vec![vec![0.0; col_labels.len()]; row_labels.len()];
    for (a, b) in &pairs {
        counts[row_pos[a.as_str()]][col_pos[b.as_str()]] += 1.0;
    }

    debug!(
        "Cross-tab {} x {}: {} rows, {}x{} cells",
        index,
        columns,
        pairs.len(),
        row_labels.len(),
        col_labels.len()
    );

    let mut tab = CrossTab {
        index_column: index.to_string(),
        columns_column: columns.to_string(),
        normalize,
        margins,
        row_labels,
        col_labels,
        values: counts,
    };

    apply_normalization(&mut tab, pairs.len() as f64);
    Ok(tab)
}

fn sorted_labels<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<String> {
    let unique: BTreeSet<&str> = labels.collect();
    let mut sorted: Vec<String> = unique.into_iter().map(|s| s.to_string()).collect();
    sorted.sort_by(|a, b| compare_labels(a, b));
    sorted
}

/// Normalize raw counts in place and append margins.
///
/// An empty table divides nothing, so `total` may be zero.
fn apply_normalization(tab: &mut CrossTab, total: f64) {
    let row_totals = tab.row_sums();
    let col_totals = tab.col_sums();

    match tab.normalize {
        Normalize::None => {}
        Normalize::All => {
            for row in tab.values.iter_mut() {
                for cell in row.iter_mut() {
                    *cell /= total;
                }
            }
        }
        Normalize::Index => {
            for (row, row_total) in tab.values.iter_mut().zip(&row_totals) {
                for cell in row.iter_mut() {
                    *cell /= row_total;
                }
            }
        }
        Normalize::Columns => {
            for row in tab.values.iter_mut() {
                for (cell, col_total) in row.iter_mut().zip(&col_totals) {
                    *cell /= col_total;
                }
            }
        }
    }

    if !tab.margins {
        return;
    }

    let (margin_row, margin_col, corner) = match tab.normalize {
        Normalize::None => (Some(col_totals), Some(row_totals), total),
        Normalize::All => (
            Some(col_totals.iter().map(|c| c / total).collect()),
            Some(row_totals.iter().map(|r| r / total).collect()),
            if total > 0.0 { 1.0 } else { 0.0 },
        ),
        Normalize::Index => (Some(col_totals.iter().map(|c| c / total).collect()), None, 0.0),
        Normalize::Columns => (None, Some(row_totals.iter().map(|r| r / total).collect()), 0.0),
    };

    if let Some(margin_col) = margin_col {
        for (row, value) in tab.values.iter_mut().zip(margin_col) {
            row.push(value);
        }
        tab.col_labels.push(MARGIN_LABEL.to_string());
    }

    if let Some(mut margin_row) = margin_row {
        if tab.col_labels.last().map(String::as_str) == Some(MARGIN_LABEL) {
            margin_row.push(corner);
        }
        tab.values.push(margin_row);
        tab.row_labels.push(MARGIN_LABEL.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const EPS: f64 = 1e-12;

    fn sample_frame() -> DataFrame {
        df![
            "Marital_Status" => [
                Some("Single"), Some("Married"), Some("Single"), Some("Together"),
                Some("Married"), Some("Married"), None, Some("Single"),
            ],
            "Response" => [
                Some(1i64), Some(0), Some(0), Some(0),
                Some(1), Some(0), Some(1), None,
            ],
        ]
        .unwrap()
    }

    #[test]
    fn test_crosstab_counts() {
        let tab = crosstab(&sample_frame(), "Marital_Status", "Response", Normalize::None, false)
            .unwrap();

        assert_eq!(tab.row_labels, vec!["Married", "Single", "Together"]);
        assert_eq!(tab.col_labels, vec!["0", "1"]);
        assert_eq!(
            tab.values,
            vec![vec![2.0, 1.0], vec![1.0, 1.0], vec![1.0, 0.0]]
        );
        // Row sums equal group sizes over rows with both values present
        assert_eq!(tab.row_sums(), vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_crosstab_counts_with_margins() {
        let tab = crosstab(&sample_frame(), "Marital_Status", "Response", Normalize::None, true)
            .unwrap();

        assert_eq!(tab.row_labels.last().unwrap(), "All");
        assert_eq!(tab.col_labels.last().unwrap(), "All");
        assert_eq!(tab.get("Married", "All"), Some(3.0));
        assert_eq!(tab.get("All", "0"), Some(4.0));
        assert_eq!(tab.get("All", "All"), Some(6.0));
    }

    #[test]
    fn test_crosstab_index_rows_sum_to_one() {
        let tab = crosstab(&sample_frame(), "Marital_Status", "Response", Normalize::Index, false)
            .unwrap();

        for sum in tab.row_sums() {
            assert!((sum - 1.0).abs() < EPS);
        }
        assert!((tab.get("Married", "0").unwrap() - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn test_crosstab_index_margins_add_row_only() {
        let tab = crosstab(&sample_frame(), "Marital_Status", "Response", Normalize::Index, true)
            .unwrap();

        assert_eq!(tab.row_labels.len(), 4);
        assert_eq!(tab.col_labels, vec!["0", "1"]);
        assert!((tab.get("All", "0").unwrap() - 4.0 / 6.0).abs() < EPS);
        assert!((tab.get("All", "1").unwrap() - 2.0 / 6.0).abs() < EPS);
    }

    #[test]
    fn test_crosstab_columns_normalized() {
        let tab = crosstab(&sample_frame(), "Marital_Status", "Response", Normalize::Columns, true)
            .unwrap();

        assert_eq!(tab.row_labels, vec!["Married", "Single", "Together"]);
        assert_eq!(tab.col_labels, vec!["0", "1", "All"]);
        let sums = tab.col_sums();
        for sum in sums {
            assert!((sum - 1.0).abs() < EPS);
        }
        assert!((tab.get("Married", "All").unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_crosstab_all_normalized_with_margins() {
        let tab = crosstab(&sample_frame(), "Marital_Status", "Response", Normalize::All, true)
            .unwrap();

        assert_eq!(tab.get("All", "All"), Some(1.0));
        let inner: f64 = tab.values[..3].iter().map(|row| row[..2].iter().sum::<f64>()).sum();
        assert!((inner - 1.0).abs() < EPS);
    }

    #[test]
    fn test_crosstab_numeric_labels_sorted_numerically() {
        let df = df!["a" => [10i64, 2, 1], "b" => ["x", "y", "x"]].unwrap();
        let tab = crosstab(&df, "a", "b", Normalize::None, false).unwrap();
        assert_eq!(tab.row_labels, vec!["1", "2", "10"]);
    }

    #[test]
    fn test_crosstab_missing_column() {
        assert!(crosstab(&sample_frame(), "Marital_Status", "Nope", Normalize::None, false).is_err());
    }

    #[test]
    fn test_crosstab_no_complete_rows_keeps_margins() {
        let df = df![
            "Marital_Status" => [Some("Single"), None, None],
            "Response" => [None, Some(1i64), None],
        ]
        .unwrap();

        let raw = crosstab(&df, "Marital_Status", "Response", Normalize::None, false).unwrap();
        assert!(raw.row_labels.is_empty());
        assert!(raw.values.is_empty());

        for normalize in [Normalize::None, Normalize::All] {
            let tab = crosstab(&df, "Marital_Status", "Response", normalize, true).unwrap();
            assert_eq!(tab.row_labels, vec![MARGIN_LABEL]);
            assert_eq!(tab.col_labels, vec![MARGIN_LABEL]);
            assert_eq!(tab.values, vec![vec![0.0]]);
        }

        let by_row = crosstab(&df, "Marital_Status", "Response", Normalize::Index, true).unwrap();
        assert_eq!(by_row.row_labels, vec![MARGIN_LABEL]);
        assert!(by_row.col_labels.is_empty());
    }
}
