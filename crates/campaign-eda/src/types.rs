use serde::{Deserialize, Serialize};

/// Disjoint split of the table's numeric and text columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPartition {
    /// Numeric columns holding real-valued measurements.
    pub continuous: Vec<String>,
    /// Text columns.
    pub discrete_text: Vec<String>,
    /// Numeric columns holding codes or small counts (identifiers removed).
    pub discrete_numeric: Vec<String>,
}

impl ColumnPartition {
    /// All discrete columns, text first.
    pub fn discrete(&self) -> Vec<String> {
        self.discrete_text
            .iter()
            .chain(&self.discrete_numeric)
            .cloned()
            .collect()
    }

    /// Total number of classified columns.
    pub fn len(&self) -> usize {
        self.continuous.len() + self.discrete_text.len() + self.discrete_numeric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One entry of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Univariate summary of a discrete column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteSummary {
    pub column: String,
    /// Number of non-missing values.
    pub count: usize,
    /// Number of missing values.
    pub missing: usize,
    /// Number of distinct non-missing values.
    pub distinct_count: usize,
    /// Distinct non-missing values in order of first appearance.
    pub distinct_values: Vec<String>,
    /// Value counts, most frequent first; ties keep first-appearance order.
    pub value_counts: Vec<ValueCount>,
}

/// Univariate summary of a continuous column.
///
/// Statistics that are undefined for the data (empty column, a single value
/// for the spread measures) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousSummary {
    pub column: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample variance (n - 1 denominator).
    pub variance: Option<f64>,
    /// Sample standard deviation (n - 1 denominator).
    pub std: Option<f64>,
    pub range: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub iqr: Option<f64>,
}

/// Pairwise Pearson correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the coefficient between `columns[i]` and `columns[j]`,
    /// or `None` when it is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient between two named columns.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Normalization mode for a cross-tabulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Normalize {
    /// Raw counts
    #[default]
    None,
    /// Divide every cell by the grand total
    All,
    /// Each row sums to 1
    Index,
    /// Each column sums to 1
    Columns,
}

impl Normalize {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::None => "counts",
            Self::All => "normalized (all)",
            Self::Index => "normalized (index)",
            Self::Columns => "normalized (columns)",
        }
    }
}

/// Label used for margin rows and columns.
pub const MARGIN_LABEL: &str = "All";

/// Contingency table between two categorical columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    pub index_column: String,
    pub columns_column: String,
    pub normalize: Normalize,
    pub margins: bool,
    /// Row labels; includes [`MARGIN_LABEL`] last when a margin row is present.
    pub row_labels: Vec<String>,
    /// Column labels; includes [`MARGIN_LABEL`] last when a margin column is present.
    pub col_labels: Vec<String>,
    /// `values[row][col]`.
    pub values: Vec<Vec<f64>>,
}

impl CrossTab {
    /// Cell value by labels.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.row_labels.iter().position(|r| r == row)?;
        let j = self.col_labels.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.values.iter().map(|row| row.iter().sum()).collect()
    }

    /// Sum of each column.
    pub fn col_sums(&self) -> Vec<f64> {
        (0..self.col_labels.len())
            .map(|j| self.values.iter().map(|row| row[j]).sum())
            .collect()
    }
}

/// Aggregate statistics of a target column within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub group: String,
    /// Rows in the group.
    pub size: usize,
    /// Non-missing target values in the group.
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

/// Grouped aggregation of a numeric column by a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedStats {
    pub group_column: String,
    pub target_column: String,
    /// One entry per group, sorted by group label.
    pub groups: Vec<GroupStats>,
}

impl GroupedStats {
    pub fn group(&self, label: &str) -> Option<&GroupStats> {
        self.groups.iter().find(|g| g.group == label)
    }
}

/// Everything the pipeline computed, ready for printing or JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdaReport {
    pub input_shape: (usize, usize),
    pub cleaned_shape: (usize, usize),
    pub filtered_shape: (usize, usize),
    pub cleaning_actions: Vec<String>,
    pub filter_steps: Vec<String>,
    pub partition: ColumnPartition,
    pub discrete_summaries: Vec<DiscreteSummary>,
    pub continuous_summaries: Vec<ContinuousSummary>,
    pub correlation: CorrelationMatrix,
    pub crosstabs: Vec<CrossTab>,
    pub grouped: Vec<GroupedStats>,
    pub duration_ms: u64,
}
