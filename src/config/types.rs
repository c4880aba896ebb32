use serde::Deserialize;

/// Default listing URL; `{}` is replaced by the page number
pub const DEFAULT_BASE_URL: &str = "http://books.toscrape.com/catalogue/page-{}.html";

/// Main configuration structure for Catalog-Sweep
///
/// Every section is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub organizer: OrganizerConfig,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Listing URL template with a `{}` or `{page}` placeholder
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum number of pages to visit (unbounded when absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Fixed pause before every request after the first (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Retries allowed per page after the first attempt
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Destination of the exported workbook
    #[serde(rename = "output-path")]
    pub output_path: String,

    pub selectors: SelectorConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_pages: None,
            delay_ms: 1000,
            max_retries: 3,
            timeout_secs: 15,
            user_agent: format!(
                "Mozilla/5.0 (compatible; catalog-sweep/{})",
                env!("CARGO_PKG_VERSION")
            ),
            output_path: "output/books_data.xlsx".to_string(),
            selectors: SelectorConfig::default(),
        }
    }
}

/// CSS selectors used to pick listing entries apart
///
/// Field selectors are evaluated relative to each entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One listing entry
    pub entry: String,

    /// Element carrying the title (attribute `title` or its text)
    pub title: String,

    /// Element whose text holds the price
    pub price: String,

    /// Element whose class list holds the rating word
    pub rating: String,

    /// Element whose text holds the stock status
    pub availability: String,

    /// Presence of this element on a page means another page follows
    #[serde(rename = "next-page")]
    pub next_page: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            entry: "article.product_pod".to_string(),
            title: "h3 a".to_string(),
            price: "p.price_color".to_string(),
            rating: "p.star-rating".to_string(),
            availability: "p.availability".to_string(),
            next_page: "li.next a".to_string(),
        }
    }
}

/// Organizer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// File names that are never moved
    pub ignore: Vec<String>,

    /// Extra categories, consulted before the built-in table
    #[serde(rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            ignore: vec!["file_organizer.log".to_string()],
            categories: Vec::new(),
        }
    }
}

/// A user-defined category with the extensions that belong to it
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Folder name the files are moved into
    pub name: String,

    /// Extensions without the leading dot (matched case-insensitively)
    pub extensions: Vec<String>,
}
