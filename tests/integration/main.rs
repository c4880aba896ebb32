//! End-to-end tests for both commands

mod organize_tests;
mod scrape_tests;
