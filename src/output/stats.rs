//! Aggregate statistics over scraped records
//!
//! This module computes the summary figures exported next to the raw data
//! and prints the end-of-run report.

use crate::catalogue::{Record, ScrapeOutcome};
use std::collections::BTreeMap;
use std::path::Path;

/// One value of the summary view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Count(u64),
    Amount(f64),
}

/// Summary statistics for a record sequence
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSummary {
    /// Total number of records
    pub total_records: u64,

    /// Sum of all prices
    pub total_price: f64,

    /// Mean price, 0 when there are no records
    pub average_price: f64,

    /// Lowest price, 0 when there are no records
    pub min_price: f64,

    /// Highest price, 0 when there are no records
    pub max_price: f64,

    /// Records marked in stock
    pub in_stock: u64,

    /// Records marked out of stock
    pub out_of_stock: u64,

    /// Rating value -> count, with every value from 1 to 5 present
    pub rating_distribution: BTreeMap<u8, u64>,
}

impl RecordSummary {
    /// Computes the summary of a record sequence (which may be empty)
    pub fn from_records(records: &[Record]) -> Self {
        let mut rating_distribution: BTreeMap<u8, u64> = (1..=5).map(|r| (r, 0)).collect();
        let mut in_stock = 0;
        let mut total_price = 0.0;
        let mut min_price = f64::INFINITY;
        let mut max_price = f64::NEG_INFINITY;

        for record in records {
            total_price += record.price();
            min_price = min_price.min(record.price());
            max_price = max_price.max(record.price());

            if record.in_stock() {
                in_stock += 1;
            }

            *rating_distribution.entry(record.rating()).or_insert(0) += 1;
        }

        let total_records = records.len() as u64;
        let (average_price, min_price, max_price) = if total_records == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (total_price / total_records as f64, min_price, max_price)
        };

        Self {
            total_records,
            total_price,
            average_price,
            min_price,
            max_price,
            in_stock,
            out_of_stock: total_records - in_stock,
            rating_distribution,
        }
    }

    /// Returns the summary as labelled rows, in export order
    pub fn metrics(&self) -> Vec<(String, MetricValue)> {
        let mut rows = vec![
            (
                "Total records".to_string(),
                MetricValue::Count(self.total_records),
            ),
            (
                "Average price".to_string(),
                MetricValue::Amount(self.average_price),
            ),
            (
                "Minimum price".to_string(),
                MetricValue::Amount(self.min_price),
            ),
            (
                "Maximum price".to_string(),
                MetricValue::Amount(self.max_price),
            ),
            (
                "Total price".to_string(),
                MetricValue::Amount(self.total_price),
            ),
            ("In stock".to_string(), MetricValue::Count(self.in_stock)),
            (
                "Out of stock".to_string(),
                MetricValue::Count(self.out_of_stock),
            ),
        ];

        for (rating, count) in &self.rating_distribution {
            rows.push((format!("Rating {}", rating), MetricValue::Count(*count)));
        }

        rows
    }
}

/// Prints the end-of-scrape report to stdout
///
/// # Arguments
///
/// * `outcome` - Result of the pagination loop
/// * `summary` - Aggregates over the scraped records
/// * `output_path` - Where the workbook was written, if it was
pub fn print_scrape_summary(
    outcome: &ScrapeOutcome,
    summary: &RecordSummary,
    output_path: Option<&Path>,
) {
    println!("=== Scrape Summary ===\n");

    println!("Run:");
    println!("  Started: {}", outcome.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Duration: {:.2}s", outcome.elapsed.as_secs_f64());
    println!("  Pages fetched: {}", outcome.pages_fetched);
    println!("  Pages failed: {}", outcome.failed_page_count());
    if !outcome.failed_pages.is_empty() {
        let pages: Vec<String> = outcome.failed_pages.iter().map(u32::to_string).collect();
        println!("    ({})", pages.join(", "));
    }
    println!("  Entries skipped: {}", outcome.rejected_entries);
    println!();

    println!("Records:");
    println!("  Total: {}", summary.total_records);
    println!("  Average price: {:.2}", summary.average_price);
    println!(
        "  Price range: {:.2} - {:.2}",
        summary.min_price, summary.max_price
    );
    println!(
        "  In stock: {} / Out of stock: {}",
        summary.in_stock, summary.out_of_stock
    );
    println!();

    println!("Ratings:");
    for (rating, count) in &summary.rating_distribution {
        let percentage = if summary.total_records > 0 {
            (*count as f64 / summary.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {} star: {} ({:.1}%)", rating, count, percentage);
    }
    println!();

    match output_path {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: not written"),
    }

    if outcome.is_partial() {
        println!("Status: partial success");
    } else {
        println!("Status: complete");
    }
}
