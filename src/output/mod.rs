//! Output module for scrape results
//!
//! This module handles:
//! - Computing summary statistics over the scraped records
//! - Exporting the raw records and the summary to an `.xlsx` workbook
//! - Printing the end-of-run report

mod spreadsheet;
pub mod stats;

pub use spreadsheet::{
    build_workbook, ensure_writable, export_and_report, export_workbook, RAW_DATA_HEADERS, RAW_DATA_SHEET,
    SUMMARY_HEADERS, SUMMARY_SHEET,
};
pub use stats::{print_scrape_summary, MetricValue, RecordSummary};
