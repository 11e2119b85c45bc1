use crate::error::Result;
use crate::types::{
    ContinuousSummary, CorrelationMatrix, CrossTab, DiscreteSummary, EdaReport, GroupedStats,
    Normalize,
};
use std::fmt::{self, Write};

/// Width of the label column in every table.
const LABEL_WIDTH: usize = 20;
/// Width of each value column in every table.
const CELL_WIDTH: usize = 12;
/// Longest value list printed inline for a discrete column.
const MAX_INLINE_VALUES: usize = 20;

/// Renders an [`EdaReport`] for people or for other programs.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Human-readable console report.
    pub fn render_text(report: &EdaReport) -> String {
        TextReport(report).to_string()
    }

    /// Pretty-printed JSON report.
    pub fn render_json(report: &EdaReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

/// Display adapter holding the console layout.
struct TextReport<'a>(&'a EdaReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f, "MARKETING CAMPAIGN EDA")?;
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(f)?;
        writeln!(f, "Input:    {} rows x {} columns", report.input_shape.0, report.input_shape.1)?;
        writeln!(
            f,
            "Cleaned:  {} rows x {} columns",
            report.cleaned_shape.0, report.cleaned_shape.1
        )?;
        writeln!(
            f,
            "Filtered: {} rows x {} columns",
            report.filtered_shape.0, report.filtered_shape.1
        )?;
        writeln!(f, "Duration: {}ms", report.duration_ms)?;
        writeln!(f)?;

        write_list(f, "Cleaning Actions:", &report.cleaning_actions)?;
        write_list(f, "Outlier Filter:", &report.filter_steps)?;

        section(f, "DISCRETE COLUMNS")?;
        for summary in &report.discrete_summaries {
            write_discrete(f, summary)?;
        }

        section(f, "CONTINUOUS COLUMNS")?;
        for summary in &report.continuous_summaries {
            write_continuous(f, summary)?;
        }

        section(f, "CORRELATION MATRIX")?;
        write_correlation(f, &report.correlation)?;

        section(f, "CROSS-TABULATIONS")?;
        for tab in &report.crosstabs {
            write_crosstab(f, tab)?;
        }

        section(f, "GROUPED STATISTICS")?;
        for grouped in &report.grouped {
            write_grouped(f, grouped)?;
        }

        writeln!(f, "{}", "=".repeat(80))
    }
}

fn section(f: &mut impl Write, title: &str) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(40))?;
    writeln!(f)
}

fn column_banner(f: &mut impl Write, name: &str) -> fmt::Result {
    let stars = "*".repeat(10);
    writeln!(f, "{} {} {}", stars, name, stars)
}

fn write_list(f: &mut impl Write, title: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "{}", title)?;
    for item in items {
        writeln!(f, "  - {}", item)?;
    }
    writeln!(f)
}

fn write_discrete(f: &mut impl Write, summary: &DiscreteSummary) -> fmt::Result {
    column_banner(f, &summary.column)?;
    writeln!(f, "Count: {}  Missing: {}", summary.count, summary.missing)?;

    let shown: Vec<&str> = summary
        .distinct_values
        .iter()
        .take(MAX_INLINE_VALUES)
        .map(String::as_str)
        .collect();
    let ellipsis = if summary.distinct_count > MAX_INLINE_VALUES { ", ..." } else { "" };
    writeln!(
        f,
        "Distinct values ({}): {}{}",
        summary.distinct_count,
        shown.join(", "),
        ellipsis
    )?;

    writeln!(f, "Value counts:")?;
    for vc in &summary.value_counts {
        writeln!(f, "  {:<w$} {:>8}", truncate_label(&vc.value), vc.count, w = LABEL_WIDTH)?;
    }
    writeln!(f)
}

fn write_continuous(f: &mut impl Write, summary: &ContinuousSummary) -> fmt::Result {
    column_banner(f, &summary.column)?;
    let rows: [(&str, Option<f64>); 12] = [
        ("count", Some(summary.count as f64)),
        ("missing", Some(summary.missing as f64)),
        ("mean", summary.mean),
        ("std", summary.std),
        ("variance", summary.variance),
        ("min", summary.min),
        ("25%", summary.q1),
        ("50%", summary.median),
        ("75%", summary.q3),
        ("max", summary.max),
        ("range", summary.range),
        ("iqr", summary.iqr),
    ];
    for (label, value) in rows {
        writeln!(f, "  {:<10} {:>w$}", label, format_value(value), w = CELL_WIDTH + 4)?;
    }
    writeln!(f, "  {:<10} {:>w$}", "sum", format_number(summary.sum), w = CELL_WIDTH + 4)?;
    writeln!(f)
}

fn write_correlation(f: &mut impl Write, corr: &CorrelationMatrix) -> fmt::Result {
    write!(f, "{:<w$}", "", w = LABEL_WIDTH)?;
    for col in &corr.columns {
        write!(f, " {:>w$}", truncate_cell(col), w = CELL_WIDTH)?;
    }
    writeln!(f)?;

    for (name, row) in corr.columns.iter().zip(&corr.values) {
        write!(f, "{:<w$}", truncate_label(name), w = LABEL_WIDTH)?;
        for value in row {
            let cell = value.map_or_else(|| "NaN".to_string(), |v| format!("{:.3}", v));
            write!(f, " {:>w$}", cell, w = CELL_WIDTH)?;
        }
        writeln!(f)?;
    }
    writeln!(f)
}

fn write_crosstab(f: &mut impl Write, tab: &CrossTab) -> fmt::Result {
    writeln!(
        f,
        "{} x {} ({}{})",
        tab.index_column,
        tab.columns_column,
        tab.normalize.display_name(),
        if tab.margins { ", with margins" } else { "" }
    )?;

    write!(f, "{:<w$}", truncate_label(&tab.index_column), w = LABEL_WIDTH)?;
    for label in &tab.col_labels {
        write!(f, " {:>w$}", truncate_cell(label), w = CELL_WIDTH)?;
    }
    writeln!(f)?;

    for (label, row) in tab.row_labels.iter().zip(&tab.values) {
        write!(f, "{:<w$}", truncate_label(label), w = LABEL_WIDTH)?;
        for value in row {
            let cell = match tab.normalize {
                Normalize::None => format!("{:.0}", value),
                _ => format!("{:.4}", value),
            };
            write!(f, " {:>w$}", cell, w = CELL_WIDTH)?;
        }
        writeln!(f)?;
    }
    writeln!(f)
}

fn write_grouped(f: &mut impl Write, grouped: &GroupedStats) -> fmt::Result {
    writeln!(f, "{} by {}", grouped.target_column, grouped.group_column)?;
    write!(f, "{:<w$}", truncate_label(&grouped.group_column), w = LABEL_WIDTH)?;
    for header in ["count", "min", "max", "mean", "median", "std"] {
        write!(f, " {:>w$}", header, w = CELL_WIDTH)?;
    }
    writeln!(f)?;

    for group in &grouped.groups {
        write!(f, "{:<w$}", truncate_label(&group.group), w = LABEL_WIDTH)?;
        write!(f, " {:>w$}", group.count, w = CELL_WIDTH)?;
        for value in [group.min, group.max, group.mean, group.median, group.std] {
            write!(f, " {:>w$}", format_value(value), w = CELL_WIDTH)?;
        }
        writeln!(f)?;
    }
    writeln!(f)
}

fn format_value(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), format_number)
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn truncate_label(s: &str) -> String {
    truncate_to(s, LABEL_WIDTH - 1)
}

fn truncate_cell(s: &str) -> String {
    truncate_to(s, CELL_WIDTH)
}

/// Truncate a string to `max_len` characters with ellipsis.
fn truncate_to(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
