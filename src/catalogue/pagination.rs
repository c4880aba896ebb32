//! Pagination loop - fetch, parse, retry, advance
//!
//! This module walks the listing one page at a time:
//! - Builds each page URL from the template
//! - Pauses for the fixed delay between requests
//! - Retries failed pages up to the configured limit
//! - Accumulates records in page order, then in-page order
//! - Stops on the last page, the page limit, or a permanently failed page

use crate::catalogue::fetcher::{build_http_client, fetch_page, page_url};
use crate::catalogue::parser::{parse_listing_page, ListingSelectors, Record};
use crate::config::{validate_base_url, ScraperConfig};
use crate::state::{LoopPhase, PageState};
use crate::{ConfigError, SweepError};
use chrono::{DateTime, Local};
use reqwest::Client;
use std::time::{Duration, Instant};

/// Result of one scrape run
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// Every successfully parsed record, in scrape order
    pub records: Vec<Record>,

    /// Pages that were fetched and parsed
    pub pages_fetched: u32,

    /// Pages that failed on every allowed attempt
    pub failed_pages: Vec<u32>,

    /// Listing entries skipped because of parse errors
    pub rejected_entries: usize,

    /// Wall-clock start of the run
    pub started_at: DateTime<Local>,

    /// Time spent in the loop
    pub elapsed: Duration,
}

impl ScrapeOutcome {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            pages_fetched: 0,
            failed_pages: Vec::new(),
            rejected_entries: 0,
            started_at: Local::now(),
            elapsed: Duration::ZERO,
        }
    }

    /// Number of permanently failed pages
    pub fn failed_page_count(&self) -> usize {
        self.failed_pages.len()
    }

    /// Returns true if some page or entry could not be scraped
    pub fn is_partial(&self) -> bool {
        !self.failed_pages.is_empty() || self.rejected_entries > 0
    }
}

/// Sequential catalogue scraper
pub struct Scraper {
    config: ScraperConfig,
    client: Client,
    selectors: ListingSelectors,
}

impl Scraper {
    /// Creates a new scraper instance
    ///
    /// # Returns
    ///
    /// * `Ok(Scraper)` - Ready to run
    /// * `Err(SweepError)` - Invalid URL template or selectors, or the HTTP
    ///   client could not be built
    pub fn new(config: ScraperConfig) -> Result<Self, SweepError> {
        validate_base_url(&config.base_url)?;
        let selectors = ListingSelectors::compile(&config.selectors)?;
        let client = build_http_client(&config)?;

        Ok(Self {
            config,
            client,
            selectors,
        })
    }

    /// Runs the pagination loop to completion
    ///
    /// Per-page failures never abort the run; they end it early and are
    /// reported in [`ScrapeOutcome::failed_pages`]. An error is returned only
    /// for internal inconsistencies.
    pub async fn run(&self) -> Result<ScrapeOutcome, SweepError> {
        let mut state = PageState::new(self.config.max_retries, self.config.max_pages);
        let mut outcome = ScrapeOutcome::new();
        let delay = Duration::from_millis(self.config.delay_ms);
        let start_time = Instant::now();
        let mut first_request = true;

        match self.config.max_pages {
            Some(max) => tracing::info!(
                "Starting scrape of {} (max {} pages)",
                self.config.base_url,
                max
            ),
            None => tracing::info!("Starting scrape of {}", self.config.base_url),
        }

        while !state.is_finished() {
            let page = state.page();
            let url = page_url(&self.config.base_url, page).ok_or_else(|| {
                ConfigError::InvalidUrl(format!(
                    "base_url '{}' has no page placeholder",
                    self.config.base_url
                ))
            })?;

            if !first_request && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            first_request = false;

            tracing::debug!(
                "Fetching page {} (attempt {}/{}): {}",
                page,
                state.attempt(),
                state.max_attempts(),
                url
            );

            match fetch_page(&self.client, &url).await {
                Ok(fetched) => {
                    let parsed = parse_listing_page(&fetched.body, &self.selectors);

                    for error in &parsed.rejected {
                        tracing::warn!("Page {}: skipped listing entry: {}", page, error);
                    }

                    tracing::info!(
                        "Page {}: {} records (HTTP {}, attempt {}/{})",
                        page,
                        parsed.records.len(),
                        fetched.status_code,
                        state.attempt(),
                        state.max_attempts()
                    );
                    if fetched.final_url != url {
                        tracing::debug!("Page {} was redirected to {}", page, fetched.final_url);
                    }

                    if parsed.records.is_empty() && parsed.has_next {
                        tracing::debug!("Page {} is empty but links to a next page", page);
                    }

                    outcome.pages_fetched += 1;
                    outcome.rejected_entries += parsed.rejected.len();
                    outcome.records.extend(parsed.records);

                    if state.record_success(parsed.has_next)? == LoopPhase::Done {
                        if state.has_next() {
                            tracing::info!("Page limit reached after page {}", page);
                        } else {
                            tracing::info!("No next page after page {}", page);
                        }
                    }
                }
                Err(e) => {
                    let attempt = state.attempt();

                    match state.record_failure()? {
                        LoopPhase::Retrying => tracing::warn!(
                            "Page {}: attempt {}/{} failed: {}; retrying",
                            page,
                            attempt,
                            state.max_attempts(),
                            e
                        ),
                        _ => {
                            tracing::error!(
                                "Page {}: failed permanently after {} attempts: {}",
                                page,
                                attempt,
                                e
                            );
                            outcome.failed_pages.push(page);
                        }
                    }
                }
            }

            tracing::trace!("Page {} left in phase {}", page, state.phase());

            if !state.is_finished() {
                state.resume()?;
            }
        }

        outcome.elapsed = start_time.elapsed();

        tracing::info!(
            "Scrape finished: {} records from {} pages, {} failed pages in {:?}",
            outcome.records.len(),
            outcome.pages_fetched,
            outcome.failed_page_count(),
            outcome.elapsed
        );

        Ok(outcome)
    }
}
