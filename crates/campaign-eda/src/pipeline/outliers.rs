//! Outlier filtering module.
//!
//! Rows are removed with fixed per-column thresholds rather than a
//! statistical bound, so the cut points stay explainable and stable.

use crate::config::ThresholdRule;
use crate::error::{ResultExt, Result};
use crate::utils::column_as_f64;
use polars::prelude::*;
use tracing::{debug, info};

/// Drops rows that violate any of a set of threshold rules.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    rules: Vec<ThresholdRule>,
}

impl OutlierFilter {
    pub fn new(rules: Vec<ThresholdRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    /// Apply every rule in order and return the surviving rows.
    ///
    /// A missing value never satisfies a rule, so rows with a null in a
    /// filtered column are dropped. The column set is unchanged. The second
    /// element lists one step per rule with the row count that remained.
    pub fn apply(&self, df: DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let original_rows = df.height();
        let mut df = df;
        let mut steps = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let before = df.height();
            let mask = Self::rule_mask(&df, rule)?;
            df = df
                .filter(&mask)
                .context(format!("Applying outlier rule '{}'", rule))?;

            let removed = before - df.height();
            debug!("Rule {} removed {} rows", rule, removed);
            info!("After {}: {} rows", rule, df.height());
            steps.push(format!(
                "Kept {} rows where {} ({} removed)",
                df.height(),
                rule,
                removed
            ));
        }

        info!(
            "Outlier filter kept {} of {} rows",
            df.height(),
            original_rows
        );
        Ok((df, steps))
    }

    fn rule_mask(df: &DataFrame, rule: &ThresholdRule) -> Result<BooleanChunked> {
        let values = column_as_f64(df, &rule.column)?;
        let mask_values: Vec<bool> = values
            .into_iter()
            .map(|v| v.is_some_and(|val| rule.comparison.holds(val, rule.limit)))
            .collect();
        Ok(BooleanChunked::from_slice("mask".into(), &mask_values))
    }
}

impl Default for OutlierFilter {
    fn default() -> Self {
        Self::new(crate::config::default_outlier_rules())
    }
}
