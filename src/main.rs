//! CLI entry point for the card rater tool.
//!
//! `analyze` merges every rater's grades into an analysis results file;
//! `enrich` looks those cards up in the remote catalog.

use anyhow::Result;
use card_rater::analyzers::analyzer::analyze;
use card_rater::config::Config;
use card_rater::enrich::enrich;
use card_rater::infra::scryfall::ScryfallClient;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "card_rater")]
#[command(about = "Aggregate card ratings from several raters", long_about = None)]
struct Cli {
    /// JSON config file; defaults are used when it does not exist
    #[arg(short, long, global = true, default_value = "card_rater.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge every rater's sheet and write the analysis results
    Analyze {
        /// Rater to include (repeatable); replaces the configured list
        #[arg(short, long = "rater", value_name = "NAME")]
        raters: Vec<String>,

        /// Directory containing one ratings sheet per rater
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Analysis results file to write
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fetch catalog data for every analyzed card
    Enrich {
        /// Analysis results file to read
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Catalog data file to write
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pause between batch requests, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/card_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("card_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Analyze {
            raters,
            data_dir,
            output,
        } => {
            if !raters.is_empty() {
                config.raters = raters;
            }
            if let Some(dir) = data_dir {
                config.data_dir = dir;
            }
            if let Some(path) = output {
                config.analysis_output = path;
            }

            info!(raters = ?config.raters, "Starting analysis");
            let results = analyze(&config)?;
            println!(
                "Analysis of {} cards saved to {}",
                results.all_cards.len(),
                config.analysis_output.display()
            );
        }
        Commands::Enrich {
            input,
            output,
            delay_ms,
        } => {
            let input = input.unwrap_or_else(|| config.analysis_output.clone());
            if let Some(path) = output {
                config.catalog.output = path;
            }
            if let Some(ms) = delay_ms {
                config.catalog.delay_ms = ms;
            }

            let client = ScryfallClient::new(&config.catalog)?;
            let summary = enrich(&client, &config.catalog, &input).await?;

            info!(
                cards = summary.cards,
                batches = summary.batches,
                failed_batches = summary.failed_batches,
                records = summary.records,
                not_found = summary.not_found,
                "Enrichment summary"
            );
            if summary.written {
                println!(
                    "Success! Catalog data for {} cards saved to {}",
                    summary.records,
                    config.catalog.output.display()
                );
            } else {
                println!("Warning: No data was fetched from the catalog. Output file not written.");
            }
        }
    }

    Ok(())
}
