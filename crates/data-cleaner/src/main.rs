//! CLI entry point for the data-quality analysis and cleaning engine.

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use data_cleaner::{
    AnalysisResponse, CleanedOutput, CleaningConfig, CleaningPreview, FillStrategy, Pipeline,
    ReportGenerator, Table, TableLoader,
};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// CLI-compatible fill strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFillStrategy {
    /// Drop high-missing columns, fill the rest
    Auto,
    /// Same as auto
    Drop,
    /// Never drop columns; fill everything
    Fill,
}

impl From<CliFillStrategy> for FillStrategy {
    fn from(cli: CliFillStrategy) -> Self {
        match cli {
            CliFillStrategy::Auto => FillStrategy::Auto,
            CliFillStrategy::Drop => FillStrategy::Drop,
            CliFillStrategy::Fill => FillStrategy::Fill,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data-quality analysis and cleaning for CSV and JSON datasets",
    long_about = "Profiles tabular uploads for data-quality issues and produces cleaned copies.\n\n\
                  EXAMPLES:\n  \
                  # Profile a file and list recommendations\n  \
                  data-cleaner analyze -i customers.csv\n\n  \
                  # Preview what cleaning would do\n  \
                  data-cleaner preview -i customers.csv --missing-threshold 0.5\n\n  \
                  # Clean and write outputs/cleaned_customers.csv\n  \
                  data-cleaner clean -i customers.csv --fill-strategy fill\n\n  \
                  # Machine-readable output\n  \
                  data-cleaner analyze -i records.json --json | jq .report.overview"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile a dataset and suggest fixes
    Analyze(CommonArgs),
    /// Clean a dataset and write the result in its source format
    Clean(CommonArgs),
    /// Predict the effect of cleaning without changing anything
    Preview(CommonArgs),
}

impl Command {
    fn args(&self) -> &CommonArgs {
        match self {
            Command::Analyze(args) | Command::Clean(args) | Command::Preview(args) => args,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct CommonArgs {
    /// Path to the CSV or JSON file
    #[arg(short, long)]
    input: String,

    /// Missing fraction (0.0 - 1.0) at or above which a column is dropped
    #[arg(long, default_value_t = data_cleaner::config::DEFAULT_MISSING_THRESHOLD)]
    missing_threshold: f64,

    /// How missing values are handled
    #[arg(long, value_enum, default_value = "auto")]
    fill_strategy: CliFillStrategy,

    /// Output directory
    ///
    /// `clean` always writes the cleaned file here (default ./outputs);
    /// `analyze` and `preview` write a JSON report only when this is set.
    #[arg(short, long)]
    output: Option<String>,

    /// Print the JSON response to stdout instead of a human-readable summary
    ///
    /// Disables all logging so stdout only contains JSON.
    #[arg(long)]
    json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors in the log
    #[arg(short, long)]
    quiet: bool,
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
    let cli = Cli::parse();
    let args = cli.command.args();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = CleaningConfig::builder()
        .missing_threshold(args.missing_threshold)
        .fill_strategy(args.fill_strategy.into())
        .build()?;
    debug!("Cleaning configuration: {:?}", config);

    let pipeline = Pipeline::builder().cleaning_config(config).build()?;

    let bytes =
        std::fs::read(&args.input).with_context(|| format!("Failed to read {}", args.input))?;
    let filename = file_name(&args.input);

    let result = match &cli.command {
        Command::Analyze(_) => run_analyze(&pipeline, &bytes, &filename, args),
        Command::Clean(_) => run_clean(&pipeline, &bytes, &filename, args),
        Command::Preview(_) => run_preview(&pipeline, &bytes, &filename, args),
    };

    result.inspect_err(|e| error!("{:#}", e))
}

fn run_analyze(pipeline: &Pipeline, bytes: &[u8], filename: &str, args: &CommonArgs) -> Result<()> {
    let dataset = TableLoader::load_file(bytes, filename)?;
    let response = pipeline.analyze_table(&dataset.table);

    if let Some(ref output) = args.output {
        let generator = ReportGenerator::new(PathBuf::from(output));
        let path = generator.write_report_to_file(&response, &file_stem(&args.input))?;
        info!("Analysis written to: {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_analysis(&response, &dataset.table, filename)
}

fn run_clean(pipeline: &Pipeline, bytes: &[u8], filename: &str, args: &CommonArgs) -> Result<()> {
    let output = pipeline.clean(bytes, filename)?;

    let generator = ReportGenerator::new(PathBuf::from(
        args.output.as_deref().unwrap_or("./outputs"),
    ));
    let path = generator.write_cleaned_file(&output)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_cleaning(&output, &path);
    Ok(())
}

fn run_preview(pipeline: &Pipeline, bytes: &[u8], filename: &str, args: &CommonArgs) -> Result<()> {
    let preview = pipeline.preview(bytes, filename)?;

    if let Some(ref output) = args.output {
        let generator = ReportGenerator::new(PathBuf::from(output));
        let base = format!("{}_preview", file_stem(&args.input));
        let path = generator.write_report_to_file(&preview, &base)?;
        info!("Preview written to: {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    print_preview(&preview);
    Ok(())
}

/// Print a human-readable analysis.
///
/// Uses `println!` for user-facing output so it is visible regardless of the
/// log level.
fn print_analysis(response: &AnalysisResponse, table: &Table, filename: &str) -> Result<()> {
    let overview = &response.report.overview;

    println!("\n{}", "=".repeat(80));
    println!("DATA QUALITY REPORT");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", filename);
    println!("  Rows: {}", overview.rows);
    println!("  Columns: {}", overview.columns);
    println!("  Missing values: {}", overview.total_missing_values);
    println!("  Duplicate rows: {}", overview.duplicate_rows);
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<10} {:<10} {:<10} {:<8} {:<8}",
        "Column", "Type", "Missing", "Missing %", "Unique", "Outliers"
    );
    println!("{}", "-".repeat(70));
    for col in &response.report.column_details {
        println!(
            "{:<20} {:<10} {:<10} {:<10.1} {:<8} {:<8}",
            truncate_str(&col.name, 19),
            col.dtype,
            col.missing_count,
            col.missing_percentage,
            col.unique_count,
            col.outlier_count
        );
    }
    println!();

    let problems: Vec<_> = response
        .report
        .column_details
        .iter()
        .filter(|col| col.has_problem)
        .collect();
    if !problems.is_empty() {
        println!("PROBLEM COLUMNS");
        println!("{}", "-".repeat(40));
        for col in problems {
            println!("  - {}: {}", col.name, col.reasons.join("; "));
        }
        println!();
    }

    println!("PREVIEW");
    println!("{}", "-".repeat(40));
    println!("{}", table.head(response.preview.len()).to_dataframe()?);
    println!();

    println!("RECOMMENDATIONS");
    println!("{}", "-".repeat(40));
    for recommendation in &response.recommendations {
        println!("  - {}", recommendation);
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("Use `data-cleaner preview` to see what cleaning would change");
    println!("{}", "=".repeat(80));
    Ok(())
}

fn print_preview(preview: &CleaningPreview) {
    let strategy = &preview.cleaning_strategy;

    println!("\n{}", "=".repeat(80));
    println!("CLEANING PREVIEW");
    println!("{}\n", "=".repeat(80));

    println!(
        "  File: {} ({}, {} rows x {} columns)",
        preview.file_info.filename,
        preview.file_info.file_type,
        preview.file_info.total_rows,
        preview.file_info.total_columns
    );
    println!(
        "  Strategy: {} (threshold {:.0}%)",
        strategy.fill_strategy,
        strategy.missing_threshold * 100.0
    );
    println!();

    println!("MISSING VALUE ANALYSIS");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<10} {:<10} {:<10} {:<30}",
        "Column", "Type", "Missing", "Missing %", "Action"
    );
    println!("{}", "-".repeat(80));
    for prediction in &preview.missing_value_analysis {
        println!(
            "{:<20} {:<10} {:<10} {:<10.1} {:<30}",
            truncate_str(&prediction.column_name, 19),
            prediction.data_type,
            prediction.missing_count,
            prediction.missing_percentage,
            prediction.fill_strategy
        );
    }
    println!();

    println!("PREDICTED ACTIONS");
    println!("{}", "-".repeat(40));
    for action in &preview.predicted_actions {
        println!("  - {}", action);
    }
    println!();

    println!("SUMMARY");
    println!("{}", "-".repeat(40));
    println!(
        "  Columns with missing values: {}",
        preview.summary.total_missing_columns
    );
    println!(
        "  High-missing columns: {}",
        preview.summary.high_missing_columns
    );
    println!(
        "  Columns after cleaning: {}",
        preview.summary.columns_after_cleaning
    );
    println!(
        "  Estimated improvement: {}",
        preview.summary.estimated_improvement
    );
    println!("{}", "=".repeat(80));
}

fn print_cleaning(output: &CleanedOutput, path: &Path) {
    let summary = &output.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!("Output: {}", path.display());
    println!(
        "  Rows: {} -> {} ({} duplicates removed)",
        summary.rows_before, summary.rows_after, summary.duplicate_rows_removed
    );
    println!(
        "  Columns: {} -> {} ({} dropped)",
        summary.original_column_count, summary.final_column_count, summary.dropped_column_count
    );
    println!();

    if !summary.actions.is_empty() {
        println!("Actions Taken:");
        for outcome in &summary.actions {
            println!("  - {}", outcome.action.describe(&outcome.column));
        }
        println!();
    }

    if !summary.renamed_columns.is_empty() {
        println!("Renamed Columns:");
        for rename in &summary.renamed_columns {
            println!("  - {} -> {}", rename.from, rename.to);
        }
        println!();
    }

    if !summary.warnings.is_empty() {
        println!("Warnings:");
        for warning in &summary.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max characters with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// File name component of a path, used for format detection.
fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Extract the file stem (name without extension) from a path.
fn file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}
