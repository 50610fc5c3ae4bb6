//! CLI entry point for the dataset profiler.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eda_profiler::{
    CleaningPlan, ColumnStats, DataCleaner, Dataset, EdaReport, FillStrategy, ProfilerConfig,
    ReportGenerator, ReportParams,
};
use std::path::Path;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Exploratory profiling and light cleaning of tabular datasets",
    long_about = "Load a delimited dataset, optionally fill or drop columns, then summarize \
                  every column and correlate the numeric ones.\n\n\
                  EXAMPLES:\n  \
                  # Summarize a file\n  \
                  eda-profiler -i train.csv\n\n  \
                  # The Titanic walkthrough (median Age, modal Embarked, drop Cabin)\n  \
                  eda-profiler -i train.csv --titanic -r\n\n  \
                  # Explicit steps\n  \
                  eda-profiler -i train.csv --fill Age=median --fill Embarked=mode --drop Cabin\n\n  \
                  # Machine-readable output\n  \
                  eda-profiler -i train.csv --json | jq .correlation"
)]
struct Args {
    /// Path to the delimited file to profile
    #[arg(short, long)]
    input: String,

    /// Output directory for the report and cleaned dataset
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Fill missing values of a column, as COLUMN=median or COLUMN=mode
    ///
    /// May be repeated; fills run in the order given.
    #[arg(long = "fill", value_name = "COLUMN=STRATEGY", value_parser = parse_fill)]
    fills: Vec<(String, FillStrategy)>,

    /// Drop a column if it is present
    ///
    /// May be repeated. Absent columns are ignored.
    #[arg(long = "drop", value_name = "COLUMN")]
    drops: Vec<String>,

    /// Drop columns whose missing fraction is above THRESHOLD (0.0 - 1.0)
    ///
    /// Without a value the configured default of 0.7 applies. The threshold
    /// also covers `drop_sparse` plan steps that leave it out.
    #[arg(long, value_name = "THRESHOLD", num_args = 0..=1)]
    drop_sparse: Option<Option<f64>>,

    /// Apply the Titanic cleaning steps (Age median, Embarked mode, drop Cabin)
    #[arg(long)]
    titanic: bool,

    /// Read cleaning steps from a JSON plan file
    ///
    /// Steps from --titanic, --fill, --drop and --drop-sparse run after the plan.
    #[arg(long, value_name = "FILE")]
    plan: Option<String>,

    /// Field delimiter (a single character, or "tab")
    ///
    /// If not specified, it is detected from the file extension and header line.
    #[arg(short, long, value_parser = parse_delimiter)]
    delimiter: Option<u8>,

    /// Extra field value to treat as missing (may be repeated)
    #[arg(long = "null-value", value_name = "MARKER")]
    null_values: Vec<String>,

    /// Summarize columns on separate threads
    #[arg(long)]
    parallel: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the final summary)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the report JSON.
    #[arg(long)]
    json: bool,

    /// Write the JSON report and the cleaned dataset to the output directory
    ///
    /// Files are saved as <input_name>_report.json and <input_name>_cleaned.csv
    #[arg(short = 'r', long)]
    emit_report: bool,
}

/// Parse a `COLUMN=strategy` pair. The last `=` separates the strategy so
/// column names may contain `=`.
fn parse_fill(raw: &str) -> Result<(String, FillStrategy), String> {
    let (column, strategy) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected COLUMN=median|mode, got '{}'", raw))?;

    if column.trim().is_empty() {
        return Err(format!("missing column name in '{}'", raw));
    }

    let strategy = strategy
        .trim()
        .parse::<FillStrategy>()
        .map_err(|e| e.to_string())?;

    Ok((column.to_string(), strategy))
}

fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "\\t" | "\t" | "tab" | "TAB" => Ok(b'\t'),
        _ => {
            let bytes = raw.as_bytes();
            if bytes.len() == 1 && bytes[0].is_ascii() {
                Ok(bytes[0])
            } else {
                Err(format!("delimiter must be a single ASCII character, got '{}'", raw))
            }
        }
    }
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
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = build_config(&args)?;
    let plan = build_plan(&args)?;

    let mut dataset = Dataset::load(&args.input, &config)
        .map_err(|e| anyhow!("Failed to load '{}': {}", args.input, e))?;

    let original_shape = dataset.shape();
    let missing_before = dataset.missing_counts()?;

    let actions = if plan.is_empty() {
        Vec::new()
    } else {
        info!("Applying {} cleaning steps", plan.steps.len());
        DataCleaner::apply_plan_with_config(&mut dataset, &plan, &config).map_err(|e| {
            error!("Cleaning failed: {}", e);
            anyhow!("Cleaning failed: {}", e)
        })?
    };

    let report = ReportGenerator::build_report(
        &dataset,
        ReportParams {
            source: dataset.source(),
            original_shape,
            missing_before,
            cleaning_actions: &actions,
            parallel: config.parallel_describe,
        },
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if args.emit_report {
        let input_stem = extract_file_stem(&args.input);
        let generator = ReportGenerator::new(&config.output_dir);
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        let data_path = generator.write_dataset(&dataset, &input_stem)?;
        info!("Report written to: {}", report_path.display());
        info!("Cleaned dataset written to: {}", data_path.display());
    }

    if !args.json {
        print_human_readable_summary(&report, &args);
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<ProfilerConfig> {
    let mut builder = ProfilerConfig::builder()
        .output_dir(&args.output)
        .parallel_describe(args.parallel);

    if let Some(Some(threshold)) = args.drop_sparse {
        builder = builder.sparse_column_threshold(threshold);
    }

    if let Some(delimiter) = args.delimiter {
        builder = builder.delimiter(delimiter);
    }

    for marker in &args.null_values {
        builder = builder.null_value(marker);
    }

    Ok(builder.build()?)
}

/// Collect cleaning steps: plan file first, then the Titanic steps, then
/// individual flags.
fn build_plan(args: &Args) -> Result<CleaningPlan> {
    let mut plan = match &args.plan {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read plan file '{}'", path))?;
            CleaningPlan::from_json(&json)
                .map_err(|e| anyhow!("Invalid plan file '{}': {}", path, e))?
        }
        None => CleaningPlan::new(),
    };

    if args.titanic {
        plan.steps.extend(CleaningPlan::titanic().steps);
    }

    for (column, strategy) in &args.fills {
        plan = plan.fill(column, *strategy);
    }

    for name in &args.drops {
        plan = plan.drop_column(name);
    }

    if args.drop_sparse.is_some() {
        plan = plan.drop_sparse_configured();
    }

    plan.validate()?;
    Ok(plan)
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{:.2}", value)
    }
}

/// Print the description and correlation matrix as plain tables.
///
/// Uses `println!` rather than logging so the summary shows regardless of
/// log level.
fn print_human_readable_summary(report: &EdaReport, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    println!("DATASET PROFILE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        args.input, report.original_shape.0, report.original_shape.1
    );
    println!(
        "After cleaning: {} rows x {} columns",
        report.final_shape.0, report.final_shape.1
    );
    println!();

    if !report.cleaning_actions.is_empty() {
        println!("Actions Taken:");
        for action in &report.cleaning_actions {
            println!("  - {}", action);
        }
        println!();
    }

    println!("COLUMN SUMMARIES");
    println!("{}", "-".repeat(40));
    println!(
        "{:<20} {:<8} {:>7} {:>8} {:>10} {:>10} {:>10} {:>10}",
        "Column", "Type", "Count", "Missing", "Mean", "Median", "Min", "Max"
    );
    println!("{}", "-".repeat(90));

    for col in report.description.iter() {
        match &col.stats {
            ColumnStats::Numeric {
                min,
                max,
                mean,
                median,
                ..
            } => println!(
                "{:<20} {:<8} {:>7} {:>8} {:>10} {:>10} {:>10} {:>10}",
                truncate_str(&col.name, 19),
                col.kind,
                col.count,
                col.missing_count,
                format_stat(*mean),
                format_stat(*median),
                format_stat(*min),
                format_stat(*max)
            ),
            ColumnStats::Categorical { mode, mode_count } => {
                let mode = mode
                    .as_ref()
                    .map(|m| format!("mode: {} ({})", truncate_str(&m.to_string(), 20), mode_count))
                    .unwrap_or_else(|| "mode: -".to_string());
                println!(
                    "{:<20} {:<8} {:>7} {:>8}   {}",
                    truncate_str(&col.name, 19),
                    col.kind,
                    col.count,
                    col.missing_count,
                    mode
                );
            }
        }
    }
    println!();

    let correlation = &report.correlation;
    if correlation.len() >= 2 {
        println!("CORRELATION MATRIX (Pearson)");
        println!("{}", "-".repeat(40));

        print!("{:<12}", "");
        for name in &correlation.columns {
            print!(" {:>10}", truncate_str(name, 10));
        }
        println!();

        for (name, row) in correlation.columns.iter().zip(&correlation.values) {
            print!("{:<12}", truncate_str(name, 11));
            for r in row {
                print!(" {:>10}", format_stat(*r));
            }
            println!();
        }
        println!();

        let strong = correlation.strong_pairs(0.5);
        if !strong.is_empty() {
            println!("Strong correlations (|r| >= 0.5):");
            for (a, b, r) in strong {
                println!("  {} ~ {}: {:.3}", a, b, r);
            }
            println!();
        }
    }

    println!("Use --json for machine-readable output");
    if !args.emit_report {
        println!("Use --emit-report to save the report and cleaned dataset");
    }
    println!("{}", "=".repeat(80));
}
