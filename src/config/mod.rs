//! Configuration module for Catalog-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use catalog_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("catalog-sweep.toml")).unwrap();
//! println!("Scraping from: {}", config.scraper.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CategoryEntry, Config, OrganizerConfig, ScraperConfig, SelectorConfig, DEFAULT_BASE_URL,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
pub(crate) use validation::validate_base_url;
