//! Workbook export
//!
//! This module writes the scraped records and their summary to an `.xlsx`
//! workbook with two sheets. The workbook is built in memory and only
//! moved into place once it is complete.

use crate::catalogue::{Record, ScrapeOutcome};
use crate::output::stats::{print_scrape_summary, MetricValue, RecordSummary};
use crate::WriteError;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Name of the sheet holding one row per record
pub const RAW_DATA_SHEET: &str = "Raw Data";

/// Name of the sheet holding one row per aggregate
pub const SUMMARY_SHEET: &str = "Summary";

/// Column headers of the raw data sheet
pub const RAW_DATA_HEADERS: [&str; 4] = ["Title", "Price", "Rating", "In Stock"];

/// Column headers of the summary sheet
pub const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];

/// Exports records and their summary to a workbook at `output_path`
///
/// Missing parent directories are created. Either the complete workbook is
/// written or nothing is: the bytes go to a temporary file in the target
/// directory that is renamed over `output_path` on success.
///
/// # Returns
///
/// * `Ok(RecordSummary)` - The aggregates that were written
/// * `Err(WriteError)` - Nothing was written at `output_path`
pub fn export_workbook(records: &[Record], output_path: &Path) -> Result<RecordSummary, WriteError> {
    let summary = RecordSummary::from_records(records);

    let mut workbook = build_workbook(records, &summary)?;
    let bytes = workbook.save_to_buffer()?;
    write_atomically(output_path, &bytes)?;

    tracing::info!(
        "Wrote {} records to {}",
        summary.total_records,
        output_path.display()
    );

    Ok(summary)
}

/// Exports the scraped records and prints the end-of-run report
///
/// The report is printed whether or not the export succeeded; on failure it
/// shows the output as not written.
pub fn export_and_report(
    outcome: &ScrapeOutcome,
    output_path: &Path,
) -> Result<RecordSummary, WriteError> {
    match export_workbook(&outcome.records, output_path) {
        Ok(summary) => {
            print_scrape_summary(outcome, &summary, Some(output_path));
            Ok(summary)
        }
        Err(e) => {
            tracing::error!("Export to {} failed: {}", output_path.display(), e);
            let summary = RecordSummary::from_records(&outcome.records);
            print_scrape_summary(outcome, &summary, None);
            Err(e)
        }
    }
}

/// Checks that a workbook could be written at `output_path`
///
/// Creates the parent directory and checks it with a temporary file, so an
/// unwritable destination is reported before any scraping starts.
pub fn ensure_writable(output_path: &Path) -> Result<(), WriteError> {
    let dir = parent_dir(output_path);
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    if output_path.is_dir() {
        return Err(WriteError::Unwritable {
            path: output_path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::Other, "path is a directory"),
        });
    }

    NamedTempFile::new_in(dir).map_err(|source| WriteError::Unwritable {
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(())
}

/// Builds the two-sheet workbook in memory
pub fn build_workbook(records: &[Record], summary: &RecordSummary) -> Result<Workbook, XlsxError> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xD7E4BC))
        .set_border(FormatBorder::Thin);
    let price = Format::new().set_num_format("0.00");

    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name(RAW_DATA_SHEET)?;
    write_headers(sheet, &RAW_DATA_HEADERS, &header)?;
    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, record.title())?;
        sheet.write_number_with_format(row, 1, record.price(), &price)?;
        sheet.write_number(row, 2, record.rating())?;
        sheet.write_boolean(row, 3, record.in_stock())?;
    }
    sheet.set_freeze_panes(1, 0)?;
    sheet.autofit();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SUMMARY_SHEET)?;
    write_headers(sheet, &SUMMARY_HEADERS, &header)?;
    for (i, (label, value)) in summary.metrics().into_iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, label)?;
        match value {
            MetricValue::Count(count) => sheet.write_number(row, 1, count as f64)?,
            MetricValue::Amount(amount) => sheet.write_number_with_format(row, 1, amount, &price)?,
        };
    }
    sheet.autofit();

    Ok(workbook)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<(), XlsxError> {
    for (col, title) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, format)?;
    }
    Ok(())
}

fn write_atomically(output_path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let dir = parent_dir(output_path);
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let unwritable = |source: io::Error| WriteError::Unwritable {
        path: output_path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(unwritable)?;
    temp.write_all(bytes).map_err(unwritable)?;
    temp.as_file().sync_all().map_err(unwritable)?;
    temp.persist(output_path).map_err(|e| unwritable(e.error))?;

    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
