//! Data cleaning module.
//!
//! This module provides functionality for:
//! - Trimming whitespace from column headers
//! - Converting currency-formatted text to Float64
//! - Parsing date-formatted text to Date
//!
//! Each step consumes a DataFrame and returns a new one.

mod converters;
mod sanitizers;

pub use sanitizers::trim_column_names;

use crate::config::AnalysisConfig;
use crate::error::{Result, ResultExt};
use crate::utils::require_column;
use polars::prelude::*;
use tracing::{info, warn};

/// Data cleaner for the header, currency and date fixes.
pub struct DataCleaner;

impl DataCleaner {
    /// Run every cleaning step on a dataset.
    ///
    /// This includes:
    /// 1. Trimming column names
    /// 2. Converting the income column to Float64
    /// 3. Parsing the customer-since column to Date
    ///
    /// Returns the cleaned table and a list of human-readable actions.
    pub fn clean(&self, df: DataFrame, config: &AnalysisConfig) -> Result<(DataFrame, Vec<String>)> {
        let mut cleaning_actions = Vec::new();

        info!("Performing data cleaning...");

        let (df, renamed) = self.trim_headers(df)?;
        if renamed > 0 {
            cleaning_actions.push(format!("Trimmed whitespace from {} column names", renamed));
        } else {
            cleaning_actions.push("Column names already trimmed".to_string());
        }

        let (df, unparseable) = self
            .clean_currency_column(df, &config.income_column)
            .context("Cleaning income column")?;
        let nulls = require_column(&df, &config.income_column)?.null_count();
        cleaning_actions.push(format!(
            "Converted '{}' to Float64 ({} missing, {} unparseable)",
            config.income_column, nulls, unparseable
        ));

        let df = self
            .parse_date_column(df, &config.date_column, config.date_format.as_deref())
            .context("Parsing customer-since dates")?;
        cleaning_actions.push(format!("Parsed '{}' as Date", config.date_column));

        Ok((df, cleaning_actions))
    }

    /// Trim leading/trailing whitespace from every column name.
    ///
    /// Returns the renamed table and how many names changed.
    pub fn trim_headers(&self, df: DataFrame) -> Result<(DataFrame, usize)> {
        sanitizers::trim_column_names(df)
    }

    /// Convert a currency-formatted text column to Float64.
    ///
    /// Blank or unparseable cells become null. Returns the new table and the
    /// number of non-blank cells that could not be parsed.
    pub fn clean_currency_column(&self, df: DataFrame, column: &str) -> Result<(DataFrame, usize)> {
        let mut df = df;
        let series = require_column(&df, column)?;
        let (converted, unparseable) = converters::currency_to_float(series)?;

        if unparseable > 0 {
            warn!(
                "{} values in '{}' could not be parsed and were set to null",
                unparseable, column
            );
        }

        df.replace(column, converted)?;
        Ok((df, unparseable))
    }

    /// Parse a date-formatted text column into a Date column.
    ///
    /// With `format` unset the layout is inferred from the first non-null
    /// value. Any malformed value fails the whole conversion.
    pub fn parse_date_column(
        &self,
        df: DataFrame,
        column: &str,
        format: Option<&str>,
    ) -> Result<DataFrame> {
        let mut df = df;
        let series = require_column(&df, column)?;
        let parsed = converters::string_to_date(series, format)?;
        df.replace(column, parsed)?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EdaError;

    fn raw_frame() -> DataFrame {
        df![
            "ID" => [1, 2, 3],
            " Income " => [Some("$6,560.00"), Some("$0.00"), None],
            "Dt_Customer " => ["6/16/14", "6/15/14", "5/13/14"],
        ]
        .unwrap()
    }

    #[test]
    fn test_clean_full() {
        let config = AnalysisConfig::default();
        let (df, actions) = DataCleaner.clean(raw_frame(), &config).unwrap();

        assert_eq!(df.column("Income").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Dt_Customer").unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column("Income").unwrap().null_count(), 1);
        assert_eq!(actions.len(), 3);
        assert!(actions[0].contains("2 column names"));
    }

    #[test]
    fn test_clean_preserves_row_count() {
        let config = AnalysisConfig::default();
        let (df, _) = DataCleaner.clean(raw_frame(), &config).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_clean_missing_income_column() {
        let df = df!["Dt_Customer" => ["6/16/14"]].unwrap();
        let err = DataCleaner
            .clean(df, &AnalysisConfig::default())
            .unwrap_err();
        assert!(err.is_missing_column());
    }

    #[test]
    fn test_clean_bad_date_is_fatal() {
        let df = df![
            "Income" => ["$1.00", "$2.00"],
            "Dt_Customer" => ["6/16/14", "garbage"],
        ]
        .unwrap();

        let err = DataCleaner
            .clean(df, &AnalysisConfig::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "DATE_PARSE_FAILED");
        assert!(matches!(err, EdaError::WithContext { .. }));
    }
}
