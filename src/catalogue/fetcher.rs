//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the scraper, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - Turning the listing URL template into per-page URLs
//! - GET requests for listing pages
//! - Error classification

use crate::config::ScraperConfig;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;

/// A successfully fetched listing page
#[derive(Debug)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Builds the URL of one listing page from the configured template
///
/// Both `{page}` and `{}` are accepted as placeholders. Returns `None` when
/// the template has neither.
///
/// # Example
///
/// ```
/// use catalog_sweep::catalogue::page_url;
///
/// assert_eq!(
///     page_url("http://books.toscrape.com/catalogue/page-{}.html", 2).as_deref(),
///     Some("http://books.toscrape.com/catalogue/page-2.html")
/// );
/// ```
pub fn page_url(template: &str, page: u32) -> Option<String> {
    let page = page.to_string();

    if template.contains("{page}") {
        Some(template.replace("{page}", &page))
    } else if template.contains("{}") {
        Some(template.replace("{}", &page))
    } else {
        None
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one listing page
///
/// Any non-2xx status is reported as [`FetchError::Status`]; transport
/// failures are classified as timeout, connection, or generic request
/// errors. The caller decides whether to retry.
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let final_url = response.url().to_string();
    let body = response.text().await.map_err(|e| classify_error(url, e))?;

    Ok(FetchedPage {
        final_url,
        status_code: status.as_u16(),
        body,
    })
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: error.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
