//! Main analysis pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! orchestrating the exploratory analysis workflow.

use crate::bivariate::{correlation_matrix, crosstab, grouped_stats};
use crate::cleaner::DataCleaner;
use crate::config::AnalysisConfig;
use crate::error::{EdaError, Result, ResultExt};
use crate::loader::load_csv;
use crate::pipeline::OutlierFilter;
use crate::pipeline::progress::{
    AnalysisStage, ClosureProgressReporter, ProgressReporter, ProgressUpdate,
};
use crate::profiler::{ColumnClassifier, summarize_continuous, summarize_discrete};
use crate::types::{CrossTab, EdaReport, GroupedStats, Normalize};
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

const NORMALIZE_MODES: [Normalize; 4] = [
    Normalize::None,
    Normalize::All,
    Normalize::Index,
    Normalize::Columns,
];

/// The main analysis pipeline.
///
/// Every stage takes the previous stage's table by value and hands back a
/// new one; nothing is mutated behind the caller's back.
///
/// # Example
///
/// ```rust,ignore
/// use campaign_eda::{AnalysisConfig, Pipeline};
///
/// let report = Pipeline::builder()
///     .config(AnalysisConfig::builder().apply_outlier_filter(false).build()?)
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()?
///     .load_and_run("data/marketing_data.csv")?;
/// ```
pub struct Pipeline {
    config: AnalysisConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Read a CSV file and run the analysis on it.
    pub fn load_and_run(&self, path: impl AsRef<Path>) -> Result<EdaReport> {
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            0.0,
            format!("Loading {}", path.as_ref().display()),
        ));

        let df = match load_csv(path) {
            Ok(df) => df,
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                return Err(e);
            }
        };

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Loading,
            1.0,
            format!("Loaded {} rows x {} columns", df.height(), df.width()),
        ));
        self.run(df)
    }

    /// Run every analysis stage over an already loaded table.
    pub fn run(&self, df: DataFrame) -> Result<EdaReport> {
        match self.run_internal(df) {
            Ok(report) => {
                self.report_progress(ProgressUpdate::complete("Analysis completed successfully"));
                Ok(report)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, df: DataFrame) -> Result<EdaReport> {
        let start_time = Instant::now();
        let input_shape = df.shape();
        info!(
            "Starting analysis of {} rows x {} columns",
            input_shape.0, input_shape.1
        );

        // Step 1: Cleaning
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Cleaning,
            0.0,
            "Cleaning headers, income and dates...",
        ));
        info!("Step 1: Cleaning dataset...");
        let (df, cleaning_actions) = self.cleaner.clean(df, &self.config)?;
        let cleaned_shape = df.shape();
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Cleaning,
            1.0,
            format!("Applied {} cleaning actions", cleaning_actions.len()),
        ));

        // Step 2: Classification
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Classifying,
            0.0,
            "Classifying columns...",
        ));
        info!("Step 2: Classifying columns...");
        let partition = ColumnClassifier::classify(&df, &self.config.roles);
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Classifying,
            1.0,
            format!(
                "{} continuous, {} discrete columns",
                partition.continuous.len(),
                partition.discrete_text.len() + partition.discrete_numeric.len()
            ),
        ));

        // Step 3: Univariate summaries on the unfiltered table
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Summarizing,
            0.0,
            "Summarizing columns...",
        ));
        info!("Step 3: Summarizing columns...");
        let discrete_summaries = summarize_discrete(&df, &partition.discrete())
            .context("Summarizing discrete columns")?;
        let continuous_summaries = summarize_continuous(&df, &partition.continuous)
            .context("Summarizing continuous columns")?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Summarizing,
            1.0,
            format!(
                "Summarized {} columns",
                discrete_summaries.len() + continuous_summaries.len()
            ),
        ));

        // Step 4: Outlier filtering
        let (df, filter_steps) = if self.config.apply_outlier_filter {
            self.report_progress(ProgressUpdate::new(
                AnalysisStage::Filtering,
                0.0,
                "Removing outliers...",
            ));
            info!("Step 4: Removing outliers...");
            let filter = OutlierFilter::new(self.config.outlier_rules.clone());
            let (filtered, steps) = filter.apply(df).context("Filtering outliers")?;
            self.report_progress(ProgressUpdate::new(
                AnalysisStage::Filtering,
                1.0,
                format!("{} rows remain after filtering", filtered.height()),
            ));
            (filtered, steps)
        } else {
            info!("Step 4: Skipping outlier filter (disabled)");
            (df, Vec::new())
        };
        let filtered_shape = df.shape();

        // Step 5: Bivariate analysis on the filtered table
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Bivariate,
            0.0,
            "Computing correlations...",
        ));
        info!("Step 5: Bivariate analysis...");
        // Discrete numeric codes (flags, counts) stay out of the matrix
        let correlation = correlation_matrix(&df, &partition.continuous)
            .context("Computing correlation matrix")?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Bivariate,
            0.4,
            "Cross-tabulating discrete pairs...",
        ));
        let crosstabs = self.crosstabs(&df)?;

        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Bivariate,
            0.8,
            "Aggregating by group...",
        ));
        let grouped = self.grouped(&df)?;
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Bivariate,
            1.0,
            format!(
                "{} cross-tabs, {} grouped aggregations",
                crosstabs.len(),
                grouped.len()
            ),
        ));

        // Step 6: Report
        self.report_progress(ProgressUpdate::new(
            AnalysisStage::Reporting,
            0.0,
            "Assembling report...",
        ));
        let duration_ms = start_time.elapsed().as_millis() as u64;
        info!("Analysis finished in {} ms", duration_ms);

        Ok(EdaReport {
            input_shape,
            cleaned_shape,
            filtered_shape,
            cleaning_actions,
            filter_steps,
            partition,
            discrete_summaries,
            continuous_summaries,
            correlation,
            crosstabs,
            grouped,
            duration_ms,
        })
    }

    /// Every configured pair in every normalization mode, without and with margins.
    fn crosstabs(&self, df: &DataFrame) -> Result<Vec<CrossTab>> {
        let mut tables = Vec::new();
        for pair in &self.config.crosstab_pairs {
            for normalize in NORMALIZE_MODES {
                for margins in [false, true] {
                    let tab = crosstab(df, &pair.left, &pair.right, normalize, margins)
                        .context(format!("Cross-tabulating {} x {}", pair.left, pair.right))?;
                    debug!(
                        "{} x {} ({}, margins={})",
                        pair.left,
                        pair.right,
                        normalize.display_name(),
                        margins
                    );
                    tables.push(tab);
                }
            }
        }
        Ok(tables)
    }

    fn grouped(&self, df: &DataFrame) -> Result<Vec<GroupedStats>> {
        self.config
            .group_aggregations
            .iter()
            .map(|pair| {
                grouped_stats(df, &pair.left, &pair.right)
                    .context(format!("Grouping {} by {}", pair.right, pair.left))
            })
            .collect()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<AnalysisConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the analysis configuration.
    pub fn config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a custom progress reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a closure-based progress callback.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<Pipeline> {
        let config = self.config.unwrap_or_default();
        config
            .validate()
            .map_err(|e| EdaError::InvalidConfig(e.to_string()))?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnPair, ThresholdRule};
    use std::sync::Mutex;

    fn sample_frame() -> DataFrame {
        df![
            " ID " => [1i64, 2, 3, 4, 5],
            "Income" => ["$50,000.00 ", "$150,000.00 ", "", "$30,000.00 ", "$40,000.00 "],
            "Dt_Customer" => ["6/16/14", "6/15/14", "5/13/14", "11/5/14", "8/4/14"],
            "Marital_Status" => ["Single", "Married", "Single", "Married", "Together"],
            "Response" => [1i64, 0, 0, 1, 0],
            "MntWines" => [100i64, 200, 300, 150, 50],
        ]
        .unwrap()
    }

    fn income_only_config() -> AnalysisConfig {
        AnalysisConfig::builder()
            .roles(crate::config::ColumnRoles {
                discrete_numeric: vec!["ID".to_string(), "Response".to_string()],
                identifiers: vec!["ID".to_string()],
            })
            .outlier_rules(vec![ThresholdRule::below("Income", 100_000.0)])
            .build()
            .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert!(pipeline.config().apply_outlier_filter);
        assert!(pipeline.progress_reporter.is_none());
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.income_column = "  ".to_string();
        let result = Pipeline::builder().config(config).build();
        assert!(matches!(result, Err(EdaError::InvalidConfig(_))));
    }

    #[test]
    fn test_pipeline_run_shapes() {
        let report = Pipeline::builder()
            .config(income_only_config())
            .build()
            .unwrap()
            .run(sample_frame())
            .unwrap();

        assert_eq!(report.input_shape, (5, 6));
        assert_eq!(report.cleaned_shape, (5, 6));
        // The 150k income and the missing income are both dropped
        assert_eq!(report.filtered_shape, (3, 6));
        assert_eq!(report.filter_steps.len(), 1);
        assert_eq!(report.partition.continuous, vec!["Income", "MntWines"]);
        assert_eq!(report.correlation.columns, vec!["Income", "MntWines"]);
        assert_eq!(report.crosstabs.len(), 8);
        assert_eq!(report.grouped.len(), 1);
    }

    #[test]
    fn test_pipeline_without_filter_keeps_rows() {
        let config = AnalysisConfig::builder()
            .apply_outlier_filter(false)
            .crosstab_pairs(vec![ColumnPair::new("Marital_Status", "Response")])
            .build()
            .unwrap();
        let report = Pipeline::builder()
            .config(config)
            .build()
            .unwrap()
            .run(sample_frame())
            .unwrap();

        assert_eq!(report.filtered_shape, report.cleaned_shape);
        assert!(report.filter_steps.is_empty());
    }

    #[test]
    fn test_pipeline_reports_progress() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        Pipeline::builder()
            .config(income_only_config())
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap()
            .run(sample_frame())
            .unwrap();

        let stages = stages.lock().unwrap();
        assert_eq!(stages.first(), Some(&AnalysisStage::Cleaning));
        assert_eq!(stages.last(), Some(&AnalysisStage::Complete));
        assert!(stages.contains(&AnalysisStage::Filtering));
        assert!(stages.contains(&AnalysisStage::Bivariate));
    }

    #[test]
    fn test_pipeline_missing_column_reports_failure() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let stages_clone = stages.clone();

        let df = sample_frame().drop("Marital_Status").unwrap();
        let result = Pipeline::builder()
            .config(income_only_config())
            .on_progress(move |update| {
                stages_clone.lock().unwrap().push(update.stage);
            })
            .build()
            .unwrap()
            .run(df);

        let err = result.unwrap_err();
        assert!(err.is_missing_column());
        assert_eq!(stages.lock().unwrap().last(), Some(&AnalysisStage::Failed));
    }
}
