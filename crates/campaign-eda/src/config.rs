//! Configuration types for the EDA pipeline.
//!
//! The dataset-specific pieces of the analysis (which numeric columns are
//! really discrete codes, which rows count as outliers, which column pairs
//! get cross-tabulated) live here instead of in the stages themselves, so
//! the same pipeline can be pointed at a differently shaped file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Numeric columns that encode categories or small counts for the
/// marketing dataset.
pub const DEFAULT_DISCRETE_NUMERIC: [&str; 16] = [
    "ID",
    "Year_Birth",
    "Kidhome",
    "Teenhome",
    "NumDealsPurchases",
    "NumWebPurchases",
    "NumCatalogPurchases",
    "NumStorePurchases",
    "NumWebVisitsMonth",
    "AcceptedCmp3",
    "AcceptedCmp4",
    "AcceptedCmp5",
    "AcceptedCmp1",
    "AcceptedCmp2",
    "Response",
    "Complain",
];

/// Comparison used by a [`ThresholdRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// Keep rows where `value < limit`
    #[default]
    LessThan,
    /// Keep rows where `value <= limit`
    LessOrEqual,
    /// Keep rows where `value > limit`
    GreaterThan,
    /// Keep rows where `value >= limit`
    GreaterOrEqual,
}

impl Comparison {
    /// Evaluate the comparison for a single value.
    #[inline]
    pub fn holds(&self, value: f64, limit: f64) -> bool {
        match self {
            Self::LessThan => value < limit,
            Self::LessOrEqual => value <= limit,
            Self::GreaterThan => value > limit,
            Self::GreaterOrEqual => value >= limit,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterOrEqual => ">=",
        }
    }
}

/// Row-retention predicate: a row survives when `column <comparison> limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub column: String,
    #[serde(default)]
    pub comparison: Comparison,
    pub limit: f64,
}

impl ThresholdRule {
    /// Shorthand for the common `column < limit` rule.
    pub fn below(column: impl Into<String>, limit: f64) -> Self {
        Self {
            column: column.into(),
            comparison: Comparison::LessThan,
            limit,
        }
    }
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.comparison.symbol(), self.limit)
    }
}

/// Column roles used by the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    /// Numeric columns that should be treated as discrete.
    pub discrete_numeric: Vec<String>,
    /// Identifier columns, excluded from every analysis set.
    pub identifiers: Vec<String>,
}

impl Default for ColumnRoles {
    fn default() -> Self {
        Self {
            discrete_numeric: DEFAULT_DISCRETE_NUMERIC
                .iter()
                .map(|s| s.to_string())
                .collect(),
            identifiers: vec!["ID".to_string()],
        }
    }
}

/// A pair of column names, used for cross-tabs and grouped aggregations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPair {
    pub left: String,
    pub right: String,
}

impl ColumnPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Configuration for the analysis pipeline.
///
/// Use [`AnalysisConfig::builder()`] for a fluent API, or deserialize it
/// from JSON with [`AnalysisConfig::from_json_file`].
///
/// # Example
///
/// ```rust,ignore
/// use campaign_eda::config::{AnalysisConfig, ThresholdRule};
///
/// let config = AnalysisConfig::builder()
///     .income_column("Income")
///     .outlier_rules(vec![ThresholdRule::below("Income", 100_000.0)])
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Currency-formatted text column converted to `Float64`.
    /// Default: "Income"
    pub income_column: String,

    /// Date-formatted text column converted to `Date`.
    /// Default: "Dt_Customer"
    pub date_column: String,

    /// Explicit chrono format for the date column.
    /// If None, the format is inferred from the first non-null value.
    /// Default: None
    pub date_format: Option<String>,

    /// Column roles for the classifier.
    pub roles: ColumnRoles,

    /// Outlier rules, applied in order.
    pub outlier_rules: Vec<ThresholdRule>,

    /// Whether to run the outlier filter before bivariate analysis.
    /// Default: true
    pub apply_outlier_filter: bool,

    /// (index, columns) pairs for cross-tabulation.
    /// Default: Marital_Status x Response
    pub crosstab_pairs: Vec<ColumnPair>,

    /// (group, target) pairs for grouped aggregation.
    /// Default: Income by Marital_Status
    pub group_aggregations: Vec<ColumnPair>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            income_column: "Income".to_string(),
            date_column: "Dt_Customer".to_string(),
            date_format: None,
            roles: ColumnRoles::default(),
            outlier_rules: default_outlier_rules(),
            apply_outlier_filter: true,
            crosstab_pairs: vec![ColumnPair::new("Marital_Status", "Response")],
            group_aggregations: vec![ColumnPair::new("Marital_Status", "Income")],
        }
    }
}

/// Thresholds used for the marketing dataset.
pub fn default_outlier_rules() -> Vec<ThresholdRule> {
    vec![
        ThresholdRule::below("Income", 100_000.0),
        ThresholdRule::below("MntMeatProducts", 1000.0),
        ThresholdRule::below("MntSweetProducts", 200.0),
        ThresholdRule::below("MntGoldProds", 250.0),
    ]
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| crate::error::EdaError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.income_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnName(
                "income_column".to_string(),
            ));
        }

        if self.date_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyColumnName(
                "date_column".to_string(),
            ));
        }

        if let Some(format) = &self.date_format
            && format.trim().is_empty()
        {
            return Err(ConfigValidationError::EmptyDateFormat);
        }

        for rule in &self.outlier_rules {
            if rule.column.trim().is_empty() {
                return Err(ConfigValidationError::EmptyColumnName(
                    "outlier_rules.column".to_string(),
                ));
            }
            if !rule.limit.is_finite() {
                return Err(ConfigValidationError::NonFiniteLimit {
                    column: rule.column.clone(),
                    value: rule.limit,
                });
            }
        }

        for pair in self.crosstab_pairs.iter().chain(&self.group_aggregations) {
            if pair.left.trim().is_empty() || pair.right.trim().is_empty() {
                return Err(ConfigValidationError::EmptyColumnName(
                    "column pair".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Column name for '{0}' must not be empty")]
    EmptyColumnName(String),

    #[error("Date format must not be empty when provided")]
    EmptyDateFormat,

    #[error("Invalid limit for '{column}': {value} (must be finite)")]
    NonFiniteLimit { column: String, value: f64 },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    income_column: Option<String>,
    date_column: Option<String>,
    date_format: Option<String>,
    roles: Option<ColumnRoles>,
    outlier_rules: Option<Vec<ThresholdRule>>,
    apply_outlier_filter: Option<bool>,
    crosstab_pairs: Option<Vec<ColumnPair>>,
    group_aggregations: Option<Vec<ColumnPair>>,
}

impl AnalysisConfigBuilder {
    /// Set the currency-formatted column to convert to floats.
    pub fn income_column(mut self, column: impl Into<String>) -> Self {
        self.income_column = Some(column.into());
        self
    }

    /// Set the date column to parse.
    pub fn date_column(mut self, column: impl Into<String>) -> Self {
        self.date_column = Some(column.into());
        self
    }

    /// Set an explicit chrono format (e.g. `"%m/%d/%y"`) for the date column.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Set the column roles used by the classifier.
    pub fn roles(mut self, roles: ColumnRoles) -> Self {
        self.roles = Some(roles);
        self
    }

    /// Replace the outlier rules.
    pub fn outlier_rules(mut self, rules: Vec<ThresholdRule>) -> Self {
        self.outlier_rules = Some(rules);
        self
    }

    /// Enable or disable the outlier filter.
    pub fn apply_outlier_filter(mut self, apply: bool) -> Self {
        self.apply_outlier_filter = Some(apply);
        self
    }

    /// Replace the cross-tabulated column pairs.
    pub fn crosstab_pairs(mut self, pairs: Vec<ColumnPair>) -> Self {
        self.crosstab_pairs = Some(pairs);
        self
    }

    /// Replace the grouped aggregation pairs (group, target).
    pub fn group_aggregations(mut self, pairs: Vec<ColumnPair>) -> Self {
        self.group_aggregations = Some(pairs);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            income_column: self.income_column.unwrap_or(defaults.income_column),
            date_column: self.date_column.unwrap_or(defaults.date_column),
            date_format: self.date_format,
            roles: self.roles.unwrap_or(defaults.roles),
            outlier_rules: self.outlier_rules.unwrap_or(defaults.outlier_rules),
            apply_outlier_filter: self
                .apply_outlier_filter
                .unwrap_or(defaults.apply_outlier_filter),
            crosstab_pairs: self.crosstab_pairs.unwrap_or(defaults.crosstab_pairs),
            group_aggregations: self
                .group_aggregations
                .unwrap_or(defaults.group_aggregations),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.income_column, "Income");
        assert_eq!(config.date_column, "Dt_Customer");
        assert_eq!(config.outlier_rules.len(), 4);
        assert_eq!(config.roles.discrete_numeric.len(), 16);
        assert_eq!(config.roles.identifiers, vec!["ID".to_string()]);
        assert!(config.apply_outlier_filter);
    }

    #[test]
    fn test_default_outlier_rules() {
        let rules = default_outlier_rules();
        assert_eq!(rules[0].to_string(), "Income < 100000");
        assert_eq!(rules[3], ThresholdRule::below("MntGoldProds", 250.0));
    }

    #[test]
    fn test_comparison_holds() {
        assert!(Comparison::LessThan.holds(1.0, 2.0));
        assert!(!Comparison::LessThan.holds(2.0, 2.0));
        assert!(Comparison::LessOrEqual.holds(2.0, 2.0));
        assert!(Comparison::GreaterThan.holds(3.0, 2.0));
        assert!(Comparison::GreaterOrEqual.holds(2.0, 2.0));
        assert!(!Comparison::LessThan.holds(f64::NAN, 2.0));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .income_column("Salary")
            .date_format("%Y-%m-%d")
            .apply_outlier_filter(false)
            .outlier_rules(vec![ThresholdRule::below("Salary", 50.0)])
            .build()
            .unwrap();

        assert_eq!(config.income_column, "Salary");
        assert_eq!(config.date_format.as_deref(), Some("%Y-%m-%d"));
        assert!(!config.apply_outlier_filter);
        assert_eq!(config.outlier_rules.len(), 1);
    }

    #[test]
    fn test_validation_rejects_non_finite_limit() {
        let result = AnalysisConfig::builder()
            .outlier_rules(vec![ThresholdRule::below("Income", f64::INFINITY)])
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::NonFiniteLimit { .. }
        ));
    }

    #[test]
    fn test_validation_rejects_empty_column() {
        let result = AnalysisConfig::builder().income_column("  ").build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyColumnName(_)
        ));
    }

    #[test]
    fn test_config_from_partial_json() {
        let json = r#"{
            "income_column": "Income",
            "outlier_rules": [
                { "column": "Income", "comparison": "less_or_equal", "limit": 75000 },
                { "column": "Recency", "limit": 90 }
            ],
            "crosstab_pairs": [{ "left": "Education", "right": "Response" }]
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.outlier_rules.len(), 2);
        assert_eq!(config.outlier_rules[0].comparison, Comparison::LessOrEqual);
        assert_eq!(config.outlier_rules[1].comparison, Comparison::LessThan);
        assert_eq!(config.crosstab_pairs[0].left, "Education");
        // Omitted fields keep their defaults
        assert_eq!(config.date_column, "Dt_Customer");
        assert_eq!(config.group_aggregations.len(), 1);
    }

    #[test]
    fn test_config_partial_roles_keep_defaults() {
        let json = r#"{ "roles": { "discrete_numeric": ["Kidhome", "Teenhome"] } }"#;

        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.roles.discrete_numeric, vec!["Kidhome", "Teenhome"]);
        assert_eq!(config.roles.identifiers, vec!["ID".to_string()]);

        let roles: ColumnRoles = serde_json::from_str(r#"{ "identifiers": ["CustomerKey"] }"#).unwrap();
        assert_eq!(roles.identifiers, vec!["CustomerKey".to_string()]);
        assert_eq!(roles.discrete_numeric.len(), 16);
    }
}
