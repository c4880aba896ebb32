//! Per-file outcomes and the run report

use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What happened to one source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveStatus {
    /// Moved under its original name
    Moved,

    /// Moved under a suffixed name to avoid a collision
    RenamedDuplicate,

    /// Dry run: would be moved under its original name
    WouldMove,

    /// Dry run: would be moved under a suffixed name
    WouldRename,

    /// Left in place on purpose
    Skipped,

    /// The move was attempted and failed
    Failed,
}

impl MoveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveStatus::Moved => "moved",
            MoveStatus::RenamedDuplicate => "renamed-duplicate",
            MoveStatus::WouldMove => "would-move",
            MoveStatus::WouldRename => "would-rename",
            MoveStatus::Skipped => "skipped",
            MoveStatus::Failed => "failed",
        }
    }

    /// Returns true if the file was placed (or would be, in a dry run)
    pub fn is_placed(&self) -> bool {
        !matches!(self, MoveStatus::Skipped | MoveStatus::Failed)
    }

    /// Returns true if a numeric suffix was needed
    pub fn is_renamed(&self) -> bool {
        matches!(self, MoveStatus::RenamedDuplicate | MoveStatus::WouldRename)
    }
}

impl fmt::Display for MoveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of handling one source file
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub source: PathBuf,

    /// Planned destination; `None` for skipped files
    pub destination: Option<PathBuf>,

    /// Resolved category; `None` for skipped files
    pub category: Option<String>,

    pub status: MoveStatus,

    /// Why the file was skipped or failed
    pub reason: Option<String>,
}

/// Summary of one organizer run
#[derive(Debug, Clone)]
pub struct OrganizeReport {
    /// Directory that was organized
    pub target: PathBuf,

    /// Whether the run only simulated the moves
    pub dry_run: bool,

    /// One entry per source file, in processing order
    pub outcomes: Vec<MoveOutcome>,

    /// Category -> files placed there
    pub per_category: BTreeMap<String, usize>,

    /// Wall-clock start of the run
    pub started_at: DateTime<Local>,

    /// Time spent organizing
    pub elapsed: Duration,
}

impl OrganizeReport {
    pub(crate) fn new(target: PathBuf, dry_run: bool) -> Self {
        Self {
            target,
            dry_run,
            outcomes: Vec::new(),
            per_category: BTreeMap::new(),
            started_at: Local::now(),
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn push(&mut self, outcome: MoveOutcome) {
        if outcome.status.is_placed() {
            if let Some(category) = &outcome.category {
                *self.per_category.entry(category.clone()).or_insert(0) += 1;
            }
        }
        self.outcomes.push(outcome);
    }

    /// Number of files processed
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Files placed (or that would be placed), renamed ones included
    pub fn placed(&self) -> usize {
        self.count(|s| s.is_placed())
    }

    /// Files that needed a numeric suffix
    pub fn renamed(&self) -> usize {
        self.count(|s| s.is_renamed())
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| s == MoveStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| s == MoveStatus::Failed)
    }

    /// Outcome for a given source path
    pub fn outcome_for(&self, source: &Path) -> Option<&MoveOutcome> {
        self.outcomes.iter().find(|o| o.source == source)
    }

    fn count(&self, predicate: impl Fn(MoveStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(o.status)).count()
    }
}

/// Prints the end-of-run report to stdout
pub fn print_organize_summary(report: &OrganizeReport) {
    if report.dry_run {
        println!("=== Organize Summary (dry run) ===\n");
    } else {
        println!("=== Organize Summary ===\n");
    }

    println!("Run:");
    println!("  Directory: {}", report.target.display());
    println!("  Started: {}", report.started_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Duration: {:.2}s", report.elapsed.as_secs_f64());
    println!();

    let verb = if report.dry_run { "Would move" } else { "Moved" };
    println!("Files:");
    println!("  Processed: {}", report.total());
    println!("  {}: {}", verb, report.placed());
    println!("  Renamed duplicates: {}", report.renamed());
    println!("  Skipped: {}", report.skipped());
    println!("  Failed: {}", report.failed());
    println!();

    if !report.per_category.is_empty() {
        println!("Categories:");
        for (category, count) in &report.per_category {
            println!("  {}: {}", category, count);
        }
        println!();
    }

    let failures: Vec<&MoveOutcome> = report
        .outcomes
        .iter()
        .filter(|o| o.status == MoveStatus::Failed)
        .collect();
    if !failures.is_empty() {
        println!("Failures:");
        for outcome in failures {
            println!(
                "  {}: {}",
                outcome.source.display(),
                outcome.reason.as_deref().unwrap_or("unknown error")
            );
        }
    }
}
