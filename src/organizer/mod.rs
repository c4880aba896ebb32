//! Directory organizer
//!
//! This module sorts the files of a directory into category folders:
//! - Collects the regular files of the target (optionally recursing)
//! - Resolves each file's category from its extension
//! - Plans a collision-free destination
//! - Moves the file, or only reports the move in a dry run

mod categories;
mod mover;
mod planner;
mod report;

pub use categories::{CategoryTable, OTHER_CATEGORY};
pub use mover::move_file;
pub use planner::{DestinationPlanner, PlannedDestination};
pub use report::{print_organize_summary, MoveOutcome, MoveStatus, OrganizeReport};

use crate::SweepError;
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Options for one organizer run
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    /// Compute and log every decision without touching the filesystem
    pub dry_run: bool,

    /// Also collect files from non-category subdirectories
    pub recursive: bool,

    /// File names that are never moved
    pub ignore: Vec<String>,
}

/// Organizes the files of `target` into category folders
///
/// A failure on one file is recorded in its [`MoveOutcome`] and the run
/// continues.
///
/// # Returns
///
/// * `Ok(OrganizeReport)` - One outcome per collected file
/// * `Err(SweepError)` - `target` is not a readable directory
pub fn organize(
    target: &Path,
    table: &CategoryTable,
    options: &OrganizeOptions,
) -> Result<OrganizeReport, SweepError> {
    if !target.is_dir() {
        return Err(SweepError::InvalidDirectory {
            path: target.to_path_buf(),
        });
    }

    let start_time = Instant::now();
    let mut report = OrganizeReport::new(target.to_path_buf(), options.dry_run);
    let mut planner = DestinationPlanner::new();

    if options.dry_run {
        tracing::info!("Organizing {} (dry run)", target.display());
    } else {
        tracing::info!("Organizing {}", target.display());
    }

    for source in collect_files(target, table, options.recursive)? {
        let outcome = organize_file(target, &source, table, options, &mut planner);
        report.push(outcome);
    }

    report.elapsed = start_time.elapsed();
    tracing::debug!("{} destinations claimed", planner.claimed_count());

    tracing::info!(
        "Organize finished: {} files, {} placed, {} renamed, {} skipped, {} failed in {:?}",
        report.total(),
        report.placed(),
        report.renamed(),
        report.skipped(),
        report.failed(),
        report.elapsed
    );

    Ok(report)
}

fn organize_file(
    target: &Path,
    source: &Path,
    table: &CategoryTable,
    options: &OrganizeOptions,
    planner: &mut DestinationPlanner,
) -> MoveOutcome {
    let file_name = match source.file_name() {
        Some(name) => Path::new(name),
        None => {
            return MoveOutcome {
                source: source.to_path_buf(),
                destination: None,
                category: None,
                status: MoveStatus::Skipped,
                reason: Some("path has no file name".to_string()),
            }
        }
    };

    let name = file_name.to_string_lossy();
    if options.ignore.iter().any(|ignored| *ignored == name) {
        tracing::info!("Skipped: {} (ignored)", source.display());
        return MoveOutcome {
            source: source.to_path_buf(),
            destination: None,
            category: None,
            status: MoveStatus::Skipped,
            reason: Some("ignored".to_string()),
        };
    }

    if file_name.extension().is_none() {
        tracing::warn!("No extension on {}, using {}", source.display(), OTHER_CATEGORY);
    }

    let category = table.category_for(file_name).to_string();
    let planned = planner.claim(&target.join(&category), file_name);

    if options.dry_run {
        let status = if planned.renamed {
            MoveStatus::WouldRename
        } else {
            MoveStatus::WouldMove
        };
        tracing::info!(
            "[DRY RUN] Would move: {} -> {} ({})",
            source.display(),
            planned.path.display(),
            status
        );
        return MoveOutcome {
            source: source.to_path_buf(),
            destination: Some(planned.path),
            category: Some(category),
            status,
            reason: None,
        };
    }

    match move_file(source, &planned.path) {
        Ok(()) => {
            let status = if planned.renamed {
                MoveStatus::RenamedDuplicate
            } else {
                MoveStatus::Moved
            };
            tracing::info!(
                "Moved: {} -> {} ({})",
                source.display(),
                planned.path.display(),
                status
            );
            MoveOutcome {
                source: source.to_path_buf(),
                destination: Some(planned.path),
                category: Some(category),
                status,
                reason: None,
            }
        }
        Err(e) => {
            tracing::error!("Failed to move {}: {}", source.display(), e);
            MoveOutcome {
                source: source.to_path_buf(),
                destination: Some(planned.path),
                category: Some(category),
                status: MoveStatus::Failed,
                reason: Some(e.to_string()),
            }
        }
    }
}

/// Collects the regular files to organize, depth-first and name-sorted
///
/// Category folders directly below `target` are never entered. Unreadable
/// subdirectories are logged and skipped.
fn collect_files(
    target: &Path,
    table: &CategoryTable,
    recursive: bool,
) -> Result<Vec<PathBuf>, SweepError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let walker = WalkDir::new(target)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() == 1
                && entry.file_type().is_dir()
                && table.is_category_dir(&entry.file_name().to_string_lossy()))
        });

    let mut files = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() == 0 => return Err(SweepError::Io(e.into())),
            Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
        }
    }

    tracing::debug!("Collected {} files under {}", files.len(), target.display());
    Ok(files)
}
