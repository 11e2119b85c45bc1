//! Marketing Campaign EDA Library
//!
//! Exploratory data analysis of a marketing-campaign customer table, built
//! with Rust and Polars.
//!
//! # Overview
//!
//! The library runs a fixed sequence of stages over one CSV file:
//!
//! - **Loading**: CSV into a typed table
//! - **Cleaning**: header trimming, currency income to Float64, dates to Date
//! - **Classification**: continuous vs discrete columns from configured roles
//! - **Univariate Summaries**: distinct values and counts, descriptive statistics
//! - **Outlier Filtering**: fixed per-column thresholds
//! - **Bivariate Analysis**: correlation matrix, cross-tabs, grouped aggregates
//! - **Reporting**: console text or JSON
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use campaign_eda::{Pipeline, ReportGenerator};
//!
//! let report = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .load_and_run("data/marketing_data.csv")?;
//!
//! println!("{}", ReportGenerator::render_text(&report));
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to point the pipeline at a differently shaped file:
//!
//! ```rust,ignore
//! use campaign_eda::config::*;
//!
//! let config = AnalysisConfig::builder()
//!     .income_column("Income")
//!     .date_format("%m/%d/%y")
//!     .outlier_rules(vec![ThresholdRule::below("Income", 150_000.0)])
//!     .crosstab_pairs(vec![ColumnPair::new("Education", "Response")])
//!     .build()?;
//! ```
//!
//! The individual stages are public too, so a caller can run one in
//! isolation:
//!
//! ```rust,ignore
//! use campaign_eda::bivariate::crosstab;
//! use campaign_eda::types::Normalize;
//!
//! let tab = crosstab(&df, "Marital_Status", "Response", Normalize::Index, true)?;
//! ```

pub mod bivariate;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use bivariate::{correlation_matrix, crosstab, grouped_stats};
pub use cleaner::DataCleaner;
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ColumnPair, ColumnRoles, Comparison,
    ConfigValidationError, ThresholdRule,
};
pub use error::{EdaError, Result as EdaResult, ResultExt};
pub use loader::load_csv;
pub use pipeline::{
    AnalysisStage, ClosureProgressReporter, OutlierFilter, Pipeline, PipelineBuilder,
    ProgressReporter, ProgressUpdate,
};
pub use profiler::{ColumnClassifier, summarize_continuous, summarize_discrete};
pub use reporting::ReportGenerator;
pub use types::{
    ColumnPartition, ContinuousSummary, CorrelationMatrix, CrossTab, DiscreteSummary, EdaReport,
    GroupStats, GroupedStats, MARGIN_LABEL, Normalize, ValueCount,
};
pub use utils::{
    DtypeCategory, compare_labels, get_dtype_category, is_numeric_dtype, parse_currency,
};
