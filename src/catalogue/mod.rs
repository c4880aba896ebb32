//! Catalogue scraping module
//!
//! This module contains the fetch-paginate-aggregate loop, including:
//! - HTTP fetching and error classification
//! - Listing page parsing into records
//! - The pagination/retry loop itself

mod fetcher;
mod pagination;
mod parser;

pub use fetcher::{build_http_client, fetch_page, page_url, FetchedPage};
pub use pagination::{ScrapeOutcome, Scraper};
pub use parser::{parse_listing_page, parse_price, ListingSelectors, ParsedPage, Record};

use crate::config::ScraperConfig;
use crate::SweepError;

/// Runs a complete scrape
///
/// This is the main entry point for scraping. It will:
/// 1. Validate the URL template and compile the selectors
/// 2. Build the HTTP client
/// 3. Fetch pages in order until the last page, the page limit, or a
///    permanently failed page
///
/// # Example
///
/// ```no_run
/// use catalog_sweep::catalogue::scrape;
/// use catalog_sweep::config::ScraperConfig;
///
/// # async fn example() -> Result<(), catalog_sweep::SweepError> {
/// let outcome = scrape(&ScraperConfig::default()).await?;
/// println!("{} records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn scrape(config: &ScraperConfig) -> Result<ScrapeOutcome, SweepError> {
    Scraper::new(config.clone())?.run().await
}
