//! Extension to category lookup
//!
//! The table is built once at start-up and never changes during a run.

use crate::config::OrganizerConfig;
use std::collections::HashMap;
use std::path::Path;

/// Category of files whose extension is unknown or missing
pub const OTHER_CATEGORY: &str = "Other";

/// Built-in categories, in lookup order
const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Images",
        &["jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "tiff"],
    ),
    (
        "Documents",
        &[
            "pdf", "docx", "doc", "txt", "xlsx", "pptx", "md", "rtf", "odt", "csv",
        ],
    ),
    ("Audio", &["mp3", "wav", "flac", "aac", "ogg", "wma", "m4a"]),
    (
        "Video",
        &["mp4", "mov", "avi", "mkv", "flv", "wmv", "mpeg", "webm"],
    ),
    ("Archives", &["zip", "rar", "tar", "gz", "7z", "iso", "dmg"]),
    (
        "Code",
        &[
            "py", "js", "html", "css", "java", "c", "cpp", "json", "xml", "php", "rb", "swift",
        ],
    ),
    ("Executables", &["exe", "msi", "bat", "sh", "app", "apk", "jar"]),
    ("Design", &["psd", "ai", "xd", "fig", "sketch", "eps"]),
    ("Data", &["db", "sqlite", "sql", "tsv"]),
];

/// Immutable mapping from lower-cased extension to category name
#[derive(Debug, Clone)]
pub struct CategoryTable {
    by_extension: HashMap<String, String>,
    names: Vec<String>,
}

impl CategoryTable {
    /// The built-in table
    pub fn builtin() -> Self {
        Self::from_config(&OrganizerConfig {
            categories: Vec::new(),
            ..OrganizerConfig::default()
        })
    }

    /// Builds the table from configured categories followed by the built-in ones
    ///
    /// When an extension appears in several categories the first one wins, so
    /// configured categories take precedence.
    pub fn from_config(config: &OrganizerConfig) -> Self {
        let configured = config.categories.iter().map(|entry| {
            (
                entry.name.trim().to_string(),
                entry.extensions.iter().map(|e| normalize_extension(e)).collect(),
            )
        });
        let builtin = DEFAULT_CATEGORIES.iter().map(|(name, extensions)| {
            (
                name.to_string(),
                extensions.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            )
        });

        let mut by_extension = HashMap::new();
        let mut names: Vec<String> = Vec::new();

        for (name, extensions) in configured.chain(builtin) {
            for ext in extensions {
                by_extension.entry(ext).or_insert_with(|| name.clone());
            }
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names.push(OTHER_CATEGORY.to_string());

        Self {
            by_extension,
            names,
        }
    }

    /// Category for an extension given without the leading dot
    pub fn category_for_extension(&self, extension: &str) -> &str {
        self.by_extension
            .get(&normalize_extension(extension))
            .map(String::as_str)
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Category for a file, based on its final extension
    ///
    /// Files without an extension belong to [`OTHER_CATEGORY`].
    pub fn category_for(&self, path: &Path) -> &str {
        match path.extension() {
            Some(ext) => self.category_for_extension(&ext.to_string_lossy()),
            None => OTHER_CATEGORY,
        }
    }

    /// All category names, `Other` last
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if `name` is the folder of one of the categories
    pub fn is_category_dir(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
