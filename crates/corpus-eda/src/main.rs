//! CLI entry point for the corpus EDA report.

use anyhow::Result;
use clap::Parser;
use corpus_eda::{DEFAULT_INPUT_PATH, EdaConfig, EdaResult, ReportPipeline};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory data analysis report for a JSON text corpus",
    long_about = "Loads a JSON array of records with a `text` field, derives text length, \
                  word count and unique word count, prints descriptive statistics, skewness \
                  and the Pearson correlation matrix, and saves six charts as PNG files.\n\n\
                  EXAMPLES:\n  \
                  # Analyse the default corpus in the current directory\n  \
                  corpus-eda\n\n  \
                  # Analyse another file, charts into results/\n  \
                  corpus-eda -i data/corpus.json -o results/\n\n  \
                  # Machine-readable summary\n  \
                  corpus-eda -i data/corpus.json --json | jq .statistics"
)]
struct Args {
    /// Path to the JSON (or JSON Lines) corpus
    #[arg(short, long, default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Directory the charts (and report) are written to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Number of histogram bins
    #[arg(long, default_value = "50")]
    bins: usize,

    /// Number of rows shown in the feature sample table
    #[arg(long, default_value = "5")]
    sample_rows: usize,

    /// TrueType font for chart text
    ///
    /// If not specified, common system font locations are searched.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Output the run report as JSON to stdout instead of the console tables
    ///
    /// Disables all logs; only the JSON report is written to stdout.
    #[arg(long)]
    json: bool,

    /// Write the JSON run report to the output directory
    ///
    /// The report will be saved as <input_name>_eda_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write the feature table (text plus derived features) to this CSV file
    #[arg(long)]
    export_features: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only the report. When `json_output`
/// is true, logging is disabled entirely.
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
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &Args) -> EdaResult<EdaConfig> {
    let mut builder = EdaConfig::builder()
        .input_path(&args.input)
        .output_dir(&args.output)
        .histogram_bins(args.bins)
        .sample_rows(args.sample_rows)
        .emit_report(args.emit_report);

    if let Some(font) = &args.font {
        builder = builder.font_path(font);
    }
    if let Some(path) = &args.export_features {
        builder = builder.export_features(path);
    }

    Ok(builder.build()?)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);
    debug!("Arguments: {:?}", args);

    let config = build_config(&args)?;
    let pipeline = ReportPipeline::builder().config(config).build()?;

    let result = if args.json {
        pipeline.run(io::sink())
    } else {
        pipeline.run(io::stdout().lock())
    };

    let report = match result {
        Ok(report) => report,
        Err(e) if e.is_load_error() => {
            eprintln!("Error loading JSON file: {e}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    info!("Wrote {} charts to {}", report.artifacts.len(), args.output.display());

    Ok(ExitCode::SUCCESS)
}
