//! HTML parser for catalogue listing pages
//!
//! This module turns a listing page into:
//! - The records of every well-formed listing entry, in document order
//! - The parse errors of entries that were skipped
//! - Whether the page links to a next page

use crate::config::SelectorConfig;
use crate::{ConfigError, ParseError};
use scraper::{ElementRef, Html, Selector};

/// One scraped listing item
///
/// The rating is always within 1..=5 and the price is finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    title: String,
    price: f64,
    rating: u8,
    in_stock: bool,
}

impl Record {
    /// Creates a record
    ///
    /// # Returns
    ///
    /// * `Ok(Record)` - The rating is within 1..=5 and the price is finite
    /// * `Err(ParseError)` - Otherwise
    pub fn new(
        title: impl Into<String>,
        price: f64,
        rating: u8,
        in_stock: bool,
    ) -> Result<Self, ParseError> {
        if !(1..=5).contains(&rating) {
            return Err(ParseError::InvalidRating(rating.to_string()));
        }
        if !price.is_finite() {
            return Err(ParseError::InvalidPrice(price.to_string()));
        }

        Ok(Self {
            title: title.into(),
            price,
            rating,
            in_stock,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Price in the listing's currency
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Star rating, always within 1..=5
    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn in_stock(&self) -> bool {
        self.in_stock
    }
}

/// Compiled CSS selectors for listing pages
#[derive(Debug, Clone)]
pub struct ListingSelectors {
    entry: Selector,
    title: Selector,
    price: Selector,
    rating: Selector,
    availability: Selector,
    next_page: Selector,
}

impl ListingSelectors {
    /// Compiles the configured selectors
    ///
    /// # Returns
    ///
    /// * `Ok(ListingSelectors)` - Every selector parsed
    /// * `Err(ConfigError::InvalidSelector)` - The first selector that did not
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            entry: compile_selector("entry", &config.entry)?,
            title: compile_selector("title", &config.title)?,
            price: compile_selector("price", &config.price)?,
            rating: compile_selector("rating", &config.rating)?,
            availability: compile_selector("availability", &config.availability)?,
            next_page: compile_selector("next-page", &config.next_page)?,
        })
    }
}

fn compile_selector(name: &str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::InvalidSelector(format!("{} selector '{}': {:?}", name, selector, e))
    })
}

/// Extracted information from a listing page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Records of the well-formed entries, in document order
    pub records: Vec<Record>,

    /// One error per entry that was skipped
    pub rejected: Vec<ParseError>,

    /// Whether a next-page indicator was found
    pub has_next: bool,
}

/// Parses a listing page
///
/// Every entry is parsed on its own: an entry with a missing field, an
/// unparsable price, or a rating outside 1–5 is reported in
/// [`ParsedPage::rejected`] and the rest of the page is kept.
///
/// # Example
///
/// ```
/// use catalog_sweep::catalogue::{parse_listing_page, ListingSelectors};
/// use catalog_sweep::config::SelectorConfig;
///
/// let selectors = ListingSelectors::compile(&SelectorConfig::default()).unwrap();
/// let html = r#"
///     <article class="product_pod">
///         <p class="star-rating Three"></p>
///         <h3><a title="A Light in the Attic">A Light in the ...</a></h3>
///         <p class="price_color">£51.77</p>
///         <p class="instock availability">In stock</p>
///     </article>
///     <ul class="pager"><li class="next"><a href="page-2.html">next</a></li></ul>
/// "#;
///
/// let page = parse_listing_page(html, &selectors);
/// assert_eq!(page.records.len(), 1);
/// assert_eq!(page.records[0].rating(), 3);
/// assert!(page.has_next);
/// ```
pub fn parse_listing_page(html: &str, selectors: &ListingSelectors) -> ParsedPage {
    let document = Html::parse_document(html);
    let mut page = ParsedPage {
        has_next: document.select(&selectors.next_page).next().is_some(),
        ..ParsedPage::default()
    };

    for entry in document.select(&selectors.entry) {
        match parse_entry(entry, selectors) {
            Ok(record) => page.records.push(record),
            Err(e) => page.rejected.push(e),
        }
    }

    page
}

/// Parses a single listing entry into a record
fn parse_entry(entry: ElementRef, selectors: &ListingSelectors) -> Result<Record, ParseError> {
    let title = entry
        .select(&selectors.title)
        .next()
        .map(|element| {
            element
                .value()
                .attr("title")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| element_text(element))
        })
        .filter(|t| !t.is_empty())
        .ok_or(ParseError::MissingField("title"))?;

    let price = entry
        .select(&selectors.price)
        .next()
        .ok_or(ParseError::MissingField("price"))
        .and_then(|element| parse_price(&element_text(element)))?;

    let rating = entry
        .select(&selectors.rating)
        .next()
        .ok_or(ParseError::MissingField("rating"))
        .and_then(parse_rating)?;

    let in_stock = entry
        .select(&selectors.availability)
        .next()
        .map(|element| parse_availability(&element_text(element)))
        .ok_or(ParseError::MissingField("availability"))?;

    Record::new(title, price, rating, in_stock)
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Converts a price string like `£51.77` into a number
///
/// Everything but digits and the decimal point is dropped first, so currency
/// symbols and mis-decoded prefixes do not matter.
pub fn parse_price(text: &str) -> Result<f64, ParseError> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    cleaned
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidPrice(text.to_string()))
}

/// Reads the star rating of an entry
///
/// The rating is taken from a class word (`One`…`Five`), a numeric class,
/// or the element text, in that order. Anything outside 1–5 is rejected.
fn parse_rating(element: ElementRef) -> Result<u8, ParseError> {
    let classes: Vec<&str> = element.value().classes().collect();

    if let Some(rating) = classes.iter().find_map(|class| rating_word(class)) {
        return Ok(rating);
    }

    let candidate = classes
        .iter()
        .find(|class| class.parse::<i64>().is_ok())
        .map(|class| class.to_string())
        .unwrap_or_else(|| element_text(element));

    match candidate.parse::<u8>() {
        Ok(rating) if (1..=5).contains(&rating) => Ok(rating),
        _ if candidate.is_empty() => Err(ParseError::InvalidRating(
            element.value().attr("class").unwrap_or_default().trim().to_string(),
        )),
        _ => Err(ParseError::InvalidRating(candidate)),
    }
}

fn rating_word(word: &str) -> Option<u8> {
    match word.to_ascii_lowercase().as_str() {
        "one" => Some(1),
        "two" => Some(2),
        "three" => Some(3),
        "four" => Some(4),
        "five" => Some(5),
        _ => None,
    }
}

fn parse_availability(text: &str) -> bool {
    let text = text.to_lowercase();
    text.contains("in stock") && !text.contains("out of stock")
}
