//! Collision-free destination planning
//!
//! A destination is taken when a file already exists there or when an
//! earlier file of the same run claimed it. The second check keeps dry runs
//! honest, where nothing is ever written to disk.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// A planned destination for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDestination {
    /// Full destination path
    pub path: PathBuf,

    /// True when a numeric suffix was added to avoid a collision
    pub renamed: bool,
}

/// Hands out unique destinations for the duration of one run
#[derive(Debug, Default)]
pub struct DestinationPlanner {
    claimed: HashSet<PathBuf>,
}

impl DestinationPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a destination for `file_name` inside `folder`
    ///
    /// The original name is used when free. Otherwise `stem_1.ext`,
    /// `stem_2.ext`, ... are tried in order and the first free one is taken.
    pub fn claim(&mut self, folder: &Path, file_name: &Path) -> PlannedDestination {
        let first = folder.join(file_name);
        if self.is_free(&first) {
            self.claimed.insert(first.clone());
            return PlannedDestination {
                path: first,
                renamed: false,
            };
        }

        let stem = file_name.file_stem().unwrap_or(file_name.as_os_str());
        let extension = file_name.extension();

        let mut counter: u64 = 1;
        loop {
            let candidate = folder.join(suffixed_name(stem, extension, counter));
            if self.is_free(&candidate) {
                self.claimed.insert(candidate.clone());
                return PlannedDestination {
                    path: candidate,
                    renamed: true,
                };
            }
            counter += 1;
        }
    }

    /// Number of destinations claimed so far
    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    // Dangling symlinks count as taken
    fn is_free(&self, path: &Path) -> bool {
        !self.claimed.contains(path) && fs::symlink_metadata(path).is_err()
    }
}

fn suffixed_name(stem: &OsStr, extension: Option<&OsStr>, counter: u64) -> OsString {
    let mut name = stem.to_os_string();
    name.push(format!("_{}", counter));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}
