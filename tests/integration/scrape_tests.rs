//! Integration tests for the scraper
//!
//! These tests use wiremock to serve listing pages and run the full
//! fetch-paginate-aggregate loop against them.

use calamine::{open_workbook, Data, Reader, Xlsx};
use catalog_sweep::catalogue::scrape;
use catalog_sweep::config::ScraperConfig;
use catalog_sweep::output::{export_workbook, RAW_DATA_SHEET, SUMMARY_SHEET};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One listing entry: (title, price, rating word, stock text)
type Entry<'a> = (&'a str, &'a str, &'a str, &'a str);

/// Renders a listing page in the catalogue's markup
fn listing_page(entries: &[Entry], has_next: bool) -> String {
    let mut html = String::from("<html><body><ol class=\"row\">");
    for (title, price, rating, stock) in entries {
        html.push_str(&format!(
            r#"<li><article class="product_pod">
                <p class="star-rating {rating}"></p>
                <h3><a href="book.html" title="{title}">{title}</a></h3>
                <div class="product_price">
                    <p class="price_color">£{price}</p>
                    <p class="instock availability">{stock}</p>
                </div>
            </article></li>"#,
        ));
    }
    html.push_str("</ol>");
    if has_next {
        html.push_str(r#"<ul class="pager"><li class="next"><a href="next.html">next</a></li></ul>"#);
    }
    html.push_str("</body></html>");
    html
}

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer, max_pages: Option<u32>) -> ScraperConfig {
    ScraperConfig {
        base_url: format!("{}/catalogue/page-{{}}.html", server.uri()),
        max_pages,
        delay_ms: 0, // No pause between requests in tests
        max_retries: 3,
        timeout_secs: 5,
        ..ScraperConfig::default()
    }
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path(format!("/catalogue/page-{}.html", page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_records_follow_page_order() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        listing_page(
            &[
                ("Alpha", "10.00", "One", "In stock"),
                ("Bravo", "20.00", "Two", "In stock"),
            ],
            true,
        ),
    )
    .await;
    mount_page(
        &server,
        2,
        listing_page(
            &[
                ("Charlie", "30.00", "Three", "Out of stock"),
                ("Delta", "40.00", "Four", "In stock"),
            ],
            true,
        ),
    )
    .await;
    mount_page(
        &server,
        3,
        listing_page(&[("Echo", "50.00", "Five", "In stock")], false),
    )
    .await;

    let outcome = scrape(&create_test_config(&server, None)).await.unwrap();

    let titles: Vec<&str> = outcome.records.iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);
    assert_eq!(outcome.pages_fetched, 3);
    assert!(outcome.failed_pages.is_empty());
    assert!(!outcome.is_partial());
    assert!(!outcome.records[2].in_stock());
    assert_eq!(outcome.records[4].rating(), 5);
}

#[tokio::test]
async fn test_permanently_failed_page_keeps_earlier_records() {
    let server = MockServer::start().await;

    let entries: Vec<(String, String)> = (1..=20)
        .map(|i| (format!("Book {}", i), format!("{}.50", i)))
        .collect();
    let page_one: Vec<Entry> = entries
        .iter()
        .map(|(title, price)| (title.as_str(), price.as_str(), "Three", "In stock"))
        .collect();
    mount_page(&server, 1, listing_page(&page_one, true)).await;

    // One initial attempt plus three retries
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(4)
        .mount(&server)
        .await;

    let outcome = scrape(&create_test_config(&server, Some(2))).await.unwrap();

    assert_eq!(outcome.records.len(), 20);
    assert_eq!(outcome.failed_pages, vec![2]);
    assert_eq!(outcome.failed_page_count(), 1);
    assert_eq!(outcome.pages_fetched, 1);
    assert!(outcome.is_partial());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        1,
        listing_page(&[("Alpha", "10.00", "One", "In stock")], false),
    )
    .await;

    let outcome = scrape(&create_test_config(&server, None)).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.failed_pages.is_empty());
}

#[tokio::test]
async fn test_retry_delay_stays_fixed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    mount_page(
        &server,
        1,
        listing_page(&[("Alpha", "10.00", "One", "In stock")], false),
    )
    .await;

    let config = ScraperConfig {
        delay_ms: 100,
        ..create_test_config(&server, None)
    };
    let outcome = scrape(&config).await.unwrap();

    assert_eq!(outcome.records.len(), 1);
    assert!(outcome.failed_pages.is_empty());

    // Three pauses of 100ms; a doubling schedule would need 700ms
    assert!(outcome.elapsed >= Duration::from_millis(300));
    assert!(outcome.elapsed < Duration::from_millis(650));
}

#[tokio::test]
async fn test_timeout_counts_as_failed_attempt() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_page(&[("Alpha", "10.00", "One", "In stock")], false))
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = ScraperConfig {
        max_retries: 1,
        timeout_secs: 1,
        ..create_test_config(&server, None)
    };
    let outcome = scrape(&config).await.unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.failed_pages, vec![1]);
    assert_eq!(outcome.pages_fetched, 0);
}

#[tokio::test]
async fn test_empty_page_with_next_continues() {
    let server = MockServer::start().await;

    mount_page(&server, 1, listing_page(&[], true)).await;
    mount_page(
        &server,
        2,
        listing_page(&[("Alpha", "10.00", "Two", "In stock")], false),
    )
    .await;

    let outcome = scrape(&create_test_config(&server, None)).await.unwrap();

    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 1);
    assert!(!outcome.is_partial());
}

#[tokio::test]
async fn test_page_limit_stops_before_next_page() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        listing_page(&[("Alpha", "10.00", "One", "In stock")], true),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = scrape(&create_test_config(&server, Some(1))).await.unwrap();

    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.records.len(), 1);
}

#[tokio::test]
async fn test_malformed_entry_is_skipped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        listing_page(
            &[
                ("Alpha", "10.00", "One", "In stock"),
                ("Broken", "free", "Two", "In stock"),
                ("Charlie", "12.00", "Zero", "In stock"),
                ("Delta", "14.00", "Four", "In stock"),
            ],
            false,
        ),
    )
    .await;

    let outcome = scrape(&create_test_config(&server, None)).await.unwrap();

    let titles: Vec<&str> = outcome.records.iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Alpha", "Delta"]);
    assert_eq!(outcome.rejected_entries, 2);
    assert!(outcome.is_partial());
}

#[tokio::test]
async fn test_scrape_and_export_workbook() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        listing_page(
            &[
                ("Alpha", "10.00", "One", "In stock"),
                ("Bravo", "30.00", "Five", "Out of stock"),
            ],
            false,
        ),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("output").join("books_data.xlsx");

    let outcome = scrape(&create_test_config(&server, None)).await.unwrap();
    let summary = export_workbook(&outcome.records, &output).unwrap();

    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.average_price, 20.0);
    assert_eq!(summary.in_stock, 1);
    assert_eq!(summary.out_of_stock, 1);

    let mut workbook: Xlsx<_> = open_workbook(&output).unwrap();

    let raw = workbook.worksheet_range(RAW_DATA_SHEET).unwrap();
    let rows: Vec<_> = raw.rows().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1][0], Data::String("Alpha".to_string()));
    assert_eq!(rows[2][1], Data::Float(30.0));
    assert_eq!(rows[2][3], Data::Bool(false));

    let summary_sheet = workbook.worksheet_range(SUMMARY_SHEET).unwrap();
    let average = summary_sheet
        .rows()
        .find(|row| row[0] == Data::String("Average price".to_string()))
        .map(|row| row[1].clone());
    assert_eq!(average, Some(Data::Float(20.0)));
}
