//! CLI entry point for the marketing campaign EDA.

use anyhow::{Result, anyhow};
use campaign_eda::{AnalysisConfig, EdaReport, Pipeline, ReportGenerator};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of a marketing campaign dataset",
    long_about = "Cleans a marketing campaign CSV, summarizes every column, removes \
                  outliers and prints correlations, cross-tabulations and grouped \
                  statistics.\n\n\
                  EXAMPLES:\n  \
                  # Analyze the default dataset\n  \
                  campaign-eda\n\n  \
                  # Custom thresholds and column pairs\n  \
                  campaign-eda -i data.csv -c eda.json\n\n  \
                  # Machine-readable output\n  \
                  campaign-eda -i data.csv --json | jq .grouped"
)]
struct Args {
    /// Path to the CSV file to analyze
    #[arg(short, long, default_value = "data/marketing_data.csv")]
    input: PathBuf,

    /// JSON configuration file
    ///
    /// Missing fields fall back to the marketing dataset defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output JSON to stdout instead of the console report
    ///
    /// Disables all logging; only the final JSON report is written.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final report)
    #[arg(short, long)]
    quiet: bool,

    /// Skip the outlier filter
    #[arg(long)]
    no_filter: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            AnalysisConfig::from_json_file(path)?
        }
        None => AnalysisConfig::default(),
    };
    if args.no_filter {
        config.apply_outlier_filter = false;
    }

    let pipeline = build_pipeline(&args, config)?;

    info!("{}", "=".repeat(80));
    info!("Analyzing {}", args.input.display());
    info!("{}", "=".repeat(80));

    match pipeline.load_and_run(&args.input) {
        Ok(report) => print_report(&report, &args),
        Err(e) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": &e }))?);
            } else {
                error!("Analysis failed: {}", e);
            }
            Err(anyhow!("Analysis failed: {}", e))
        }
    }
}

fn build_pipeline(args: &Args, config: AnalysisConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

/// Print the finished report.
///
/// This uses `println!` intentionally: the report is the program's output,
/// not a log line, and must show regardless of log level.
fn print_report(report: &EdaReport, args: &Args) -> Result<()> {
    if args.json {
        println!("{}", ReportGenerator::render_json(report)?);
        return Ok(());
    }

    println!();
    print!("{}", ReportGenerator::render_text(report));
    println!("Use --json for machine-readable output");
    Ok(())
}
