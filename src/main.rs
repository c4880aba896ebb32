//! Catalog-Sweep main entry point
//!
//! This is the command-line interface for the catalogue scraper and the
//! directory organizer.

use anyhow::{Context, Result};
use catalog_sweep::catalogue::scrape;
use catalog_sweep::config::{load_config_with_hash, validate, Config};
use catalog_sweep::organizer::{organize, print_organize_summary, CategoryTable, OrganizeOptions};
use catalog_sweep::output::{ensure_writable, export_and_report};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Catalog-Sweep: catalogue scraping and directory housekeeping
///
/// `scrape` walks a paginated product listing and exports the records to an
/// `.xlsx` workbook. `organize` sorts the files of a directory into category
/// folders by extension.
#[derive(Parser, Debug)]
#[command(name = "catalog-sweep")]
#[command(version)]
#[command(about = "Catalogue scraper and directory organizer", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the log, without colours, to this file
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape the paginated catalogue and export it to a workbook
    Scrape {
        /// Destination of the `.xlsx` workbook
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Stop after this many pages
        #[arg(long, value_name = "N")]
        max_pages: Option<u32>,

        /// Listing URL template with a `{}` page placeholder
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        /// Pause before every request after the first (milliseconds)
        #[arg(long, value_name = "MS")]
        delay_ms: Option<u64>,

        /// Retries per page after the first attempt
        #[arg(long, value_name = "N")]
        max_retries: Option<u32>,
    },

    /// Sort the files of a directory into category folders
    Organize {
        /// Directory to organize
        #[arg(value_name = "DIRECTORY", default_value = ".")]
        directory: PathBuf,

        /// Show what would be moved without touching any file
        #[arg(long)]
        dry_run: bool,

        /// Also pick up files from subdirectories
        #[arg(short, long)]
        recursive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    match cli.command {
        Command::Scrape {
            output,
            max_pages,
            base_url,
            delay_ms,
            max_retries,
        } => {
            let scraper = &mut config.scraper;
            if let Some(output) = output {
                scraper.output_path = output.to_string_lossy().into_owned();
            }
            if let Some(max_pages) = max_pages {
                scraper.max_pages = Some(max_pages);
            }
            if let Some(base_url) = base_url {
                scraper.base_url = base_url;
            }
            if let Some(delay_ms) = delay_ms {
                scraper.delay_ms = delay_ms;
            }
            if let Some(max_retries) = max_retries {
                scraper.max_retries = max_retries;
            }
            validate(&config).context("invalid scraper settings")?;

            handle_scrape(&config).await
        }
        Command::Organize {
            directory,
            dry_run,
            recursive,
        } => {
            let mut options = OrganizeOptions {
                dry_run,
                recursive,
                ignore: config.organizer.ignore.clone(),
            };
            if let Some(name) = cli.log_file.as_deref().and_then(Path::file_name) {
                options.ignore.push(name.to_string_lossy().into_owned());
            }

            handle_organize(&config, &directory, &options)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Log lines go to stdout and, when `log_file` is given, are appended to that
/// file without ANSI colours.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_sweep=info,warn"),
            1 => EnvFilter::new("catalog_sweep=debug,info"),
            2 => EnvFilter::new("catalog_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}

/// Handles the `scrape` command: scrape, export, summarize
async fn handle_scrape(config: &Config) -> Result<()> {
    let output_path = PathBuf::from(&config.scraper.output_path);

    // Fail before any network traffic if the workbook cannot be written
    ensure_writable(&output_path)
        .with_context(|| format!("output path {} is not writable", output_path.display()))?;

    let outcome = scrape(&config.scraper).await.context("scrape failed")?;

    // The summary is printed even when the export fails
    export_and_report(&outcome, &output_path)
        .with_context(|| format!("failed to export {}", output_path.display()))?;

    Ok(())
}

/// Handles the `organize` command
fn handle_organize(config: &Config, directory: &Path, options: &OrganizeOptions) -> Result<()> {
    let table = CategoryTable::from_config(&config.organizer);
    tracing::debug!("Categories: {}", table.names().join(", "));

    let report = organize(directory, &table, options)
        .with_context(|| format!("cannot organize {}", directory.display()))?;

    print_organize_summary(&report);

    Ok(())
}
