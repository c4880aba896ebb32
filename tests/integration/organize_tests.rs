//! Integration tests for the organizer
//!
//! Every test works on a scratch directory and checks both the report and
//! what ended up on disk.

use catalog_sweep::config::{CategoryEntry, OrganizerConfig};
use catalog_sweep::organizer::{organize, CategoryTable, MoveStatus, OrganizeOptions, OTHER_CATEGORY};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

fn touch(dir: &Path, relative: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, relative.as_bytes()).unwrap();
}

/// Every file below `dir`, relative and sorted
fn snapshot(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}

fn recursive() -> OrganizeOptions {
    OrganizeOptions {
        recursive: true,
        ..OrganizeOptions::default()
    }
}

#[test]
fn test_recursive_duplicate_is_renamed() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a.jpg");
    touch(dir.path(), "b.txt");
    touch(dir.path(), "sub/a.jpg");

    let report = organize(dir.path(), &CategoryTable::builtin(), &recursive()).unwrap();

    let images = dir.path().join("Images");
    let first = report.outcome_for(&dir.path().join("a.jpg")).unwrap();
    assert_eq!(first.status, MoveStatus::Moved);
    assert_eq!(first.destination.as_deref(), Some(images.join("a.jpg").as_path()));

    let text = report.outcome_for(&dir.path().join("b.txt")).unwrap();
    assert_eq!(text.status, MoveStatus::Moved);
    assert_eq!(text.category.as_deref(), Some("Documents"));

    let nested = report
        .outcome_for(&dir.path().join("sub").join("a.jpg"))
        .unwrap();
    assert_eq!(nested.status, MoveStatus::RenamedDuplicate);
    assert_eq!(nested.destination.as_deref(), Some(images.join("a_1.jpg").as_path()));

    assert_eq!(fs::read(images.join("a.jpg")).unwrap(), b"a.jpg");
    assert_eq!(fs::read(images.join("a_1.jpg")).unwrap(), b"sub/a.jpg");
    assert!(dir.path().join("Documents").join("b.txt").is_file());
    assert_eq!(report.per_category.get("Images"), Some(&2));
    assert_eq!(report.renamed(), 1);
}

#[test]
fn test_dry_run_matches_live_run() {
    let dir = TempDir::new().unwrap();
    for name in ["a.jpg", "b.txt", "sub/a.jpg", "song.mp3", "README", "Images/a.jpg"] {
        touch(dir.path(), name);
    }

    let before = snapshot(dir.path());
    let dry = organize(
        dir.path(),
        &CategoryTable::builtin(),
        &OrganizeOptions {
            dry_run: true,
            ..recursive()
        },
    )
    .unwrap();

    // Nothing changed on disk
    assert_eq!(snapshot(dir.path()), before);
    assert!(dry
        .outcomes
        .iter()
        .all(|o| matches!(o.status, MoveStatus::WouldMove | MoveStatus::WouldRename)));

    let live = organize(dir.path(), &CategoryTable::builtin(), &recursive()).unwrap();

    assert_eq!(dry.outcomes.len(), live.outcomes.len());
    for (planned, actual) in dry.outcomes.iter().zip(&live.outcomes) {
        assert_eq!(planned.source, actual.source);
        assert_eq!(planned.category, actual.category);
        assert_eq!(planned.destination, actual.destination);
        assert_eq!(planned.status.is_renamed(), actual.status.is_renamed());
    }
    assert_eq!(dry.per_category, live.per_category);
}

#[test]
fn test_destinations_are_unique() {
    let dir = TempDir::new().unwrap();
    for name in ["x.png", "one/x.png", "two/x.png", "three/x.PNG", "Images/x.png"] {
        touch(dir.path(), name);
    }

    let report = organize(dir.path(), &CategoryTable::builtin(), &recursive()).unwrap();

    let destinations: HashSet<_> = report
        .outcomes
        .iter()
        .filter_map(|o| o.destination.clone())
        .collect();
    assert_eq!(destinations.len(), report.outcomes.len());
    assert_eq!(report.failed(), 0);

    // The file already in place was never touched
    assert_eq!(
        fs::read(dir.path().join("Images").join("x.png")).unwrap(),
        b"Images/x.png"
    );
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_in_category_folder_is_kept() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a.jpg");
    let images = dir.path().join("Images");
    fs::create_dir(&images).unwrap();
    let link = images.join("a.jpg");
    std::os::unix::fs::symlink(dir.path().join("nowhere.jpg"), &link).unwrap();

    let report = organize(
        dir.path(),
        &CategoryTable::builtin(),
        &OrganizeOptions::default(),
    )
    .unwrap();

    let outcome = report.outcome_for(&dir.path().join("a.jpg")).unwrap();
    assert_eq!(outcome.status, MoveStatus::RenamedDuplicate);
    assert_eq!(outcome.destination.as_deref(), Some(images.join("a_1.jpg").as_path()));
    assert_eq!(fs::read(images.join("a_1.jpg")).unwrap(), b"a.jpg");
    assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
}

#[test]
fn test_unknown_extension_goes_to_other() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "data.xyz");
    touch(dir.path(), "LICENSE");

    let report = organize(
        dir.path(),
        &CategoryTable::builtin(),
        &OrganizeOptions::default(),
    )
    .unwrap();

    let other = dir.path().join(OTHER_CATEGORY);
    assert!(other.join("data.xyz").is_file());
    assert!(other.join("LICENSE").is_file());
    assert_eq!(report.per_category.get(OTHER_CATEGORY), Some(&2));
}

#[test]
fn test_ignore_list_from_config() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "file_organizer.log");
    touch(dir.path(), "keep.txt");
    touch(dir.path(), "a.jpg");

    let config = OrganizerConfig {
        ignore: vec!["file_organizer.log".to_string(), "keep.txt".to_string()],
        ..OrganizerConfig::default()
    };
    let options = OrganizeOptions {
        ignore: config.ignore.clone(),
        ..OrganizeOptions::default()
    };
    let report = organize(dir.path(), &CategoryTable::from_config(&config), &options).unwrap();

    assert_eq!(report.skipped(), 2);
    assert!(dir.path().join("file_organizer.log").is_file());
    assert!(dir.path().join("keep.txt").is_file());
    assert!(dir.path().join("Images").join("a.jpg").is_file());
}

#[test]
fn test_configured_category_is_used() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "novel.epub");
    touch(dir.path(), "Ebooks/old.mobi");

    let config = OrganizerConfig {
        categories: vec![CategoryEntry {
            name: "Ebooks".to_string(),
            extensions: vec!["epub".to_string(), "mobi".to_string()],
        }],
        ..OrganizerConfig::default()
    };
    let report = organize(
        dir.path(),
        &CategoryTable::from_config(&config),
        &recursive(),
    )
    .unwrap();

    // The configured folder is a category folder, so it is not re-scanned
    assert_eq!(report.total(), 1);
    assert!(dir.path().join("Ebooks").join("novel.epub").is_file());
    assert!(dir.path().join("Ebooks").join("old.mobi").is_file());
}

#[test]
fn test_failed_move_does_not_stop_the_run() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "a.jpg");
    touch(dir.path(), "b.txt");

    // A plain file where the Images folder should go
    fs::write(dir.path().join("Images"), b"blocker").unwrap();

    let options = OrganizeOptions {
        ignore: vec!["Images".to_string()],
        ..OrganizeOptions::default()
    };
    let report = organize(dir.path(), &CategoryTable::builtin(), &options).unwrap();

    let failed = report.outcome_for(&dir.path().join("a.jpg")).unwrap();
    assert_eq!(failed.status, MoveStatus::Failed);
    assert!(failed.reason.is_some());
    assert!(dir.path().join("a.jpg").is_file());

    let moved = report.outcome_for(&dir.path().join("b.txt")).unwrap();
    assert_eq!(moved.status, MoveStatus::Moved);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.skipped(), 1);
}
