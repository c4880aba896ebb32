//! Catalog-Sweep: a paginated catalogue scraper and a directory organizer
//!
//! This crate implements two independent tools:
//! - a scraper that walks a paginated product listing, aggregates the
//!   listed items and exports them to an `.xlsx` workbook
//! - an organizer that sorts the files of a directory into category folders

pub mod catalogue;
pub mod config;
pub mod organizer;
pub mod output;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Catalog-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Export failed: {0}")]
    Write(#[from] WriteError),

    #[error("Not a directory: {}", path.display())]
    InvalidDirectory { path: PathBuf },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::LoopPhase,
        to: state::LoopPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// A failed attempt to fetch one listing page
///
/// Every variant is treated as transient by the pagination loop.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request failed for {url}: {message}")]
    Request { url: String, message: String },
}

/// A listing entry that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid price '{0}'")]
    InvalidPrice(String),

    #[error("invalid rating '{0}'")]
    InvalidRating(String),
}

/// Errors raised while exporting the workbook
///
/// Any of these means nothing was written at the destination.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write to {}: {source}", path.display())]
    Unwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}

/// Per-file organizer failures
///
/// These never abort a run; they end up as the reason of a failed outcome.
#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("cannot create folder {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot move {} to {}: {source}", from.display(), to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for Catalog-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use catalogue::{scrape, Record, ScrapeOutcome};
pub use config::Config;
pub use organizer::{organize, MoveOutcome, MoveStatus, OrganizeReport};
pub use output::{export_workbook, RecordSummary};
pub use state::{LoopPhase, PageState};
