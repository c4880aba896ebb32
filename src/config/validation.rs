use crate::catalogue::page_url;
use crate::config::types::{CategoryEntry, Config, OrganizerConfig, ScraperConfig, SelectorConfig};
use crate::organizer::OTHER_CATEGORY;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_selectors(&config.scraper.selectors)?;
    validate_organizer_config(&config.organizer)?;
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    validate_base_url(&config.base_url)?;

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be between 1 and 300, got {}",
            config.timeout_secs
        )));
    }

    if config.delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "delay_ms must be <= 60000, got {}ms",
            config.delay_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.output_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the listing URL template
///
/// The template must carry a page placeholder and produce an HTTP(S) URL.
pub(crate) fn validate_base_url(template: &str) -> Result<(), ConfigError> {
    let first_page = page_url(template, 1).ok_or_else(|| {
        ConfigError::InvalidUrl(format!(
            "base_url '{}' has no '{{}}' or '{{page}}' placeholder",
            template
        ))
    })?;

    let url = Url::parse(&first_page)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url '{}': {}", template, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            template
        )));
    }

    Ok(())
}

/// Validates that every selector parses
fn validate_selectors(selectors: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("entry", &selectors.entry),
        ("title", &selectors.title),
        ("price", &selectors.price),
        ("rating", &selectors.rating),
        ("availability", &selectors.availability),
        ("next-page", &selectors.next_page),
    ] {
        if ::scraper::Selector::parse(selector).is_err() {
            return Err(ConfigError::InvalidSelector(format!(
                "{} selector '{}' does not parse",
                name, selector
            )));
        }
    }
    Ok(())
}

/// Validates organizer configuration
fn validate_organizer_config(config: &OrganizerConfig) -> Result<(), ConfigError> {
    for entry in &config.categories {
        validate_category(entry)?;
    }

    if config.ignore.iter().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "ignore entries cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a user-defined category
///
/// The name becomes a folder directly under the target directory, so it
/// must be a single path component.
fn validate_category(entry: &CategoryEntry) -> Result<(), ConfigError> {
    let name = entry.name.trim();

    if name.is_empty() {
        return Err(ConfigError::Validation(
            "category name cannot be empty".to_string(),
        ));
    }

    if name.eq_ignore_ascii_case(OTHER_CATEGORY) {
        return Err(ConfigError::Validation(format!(
            "'{}' is reserved for unrecognized extensions",
            OTHER_CATEGORY
        )));
    }

    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(ConfigError::Validation(format!(
            "category name '{}' must be a plain folder name",
            entry.name
        )));
    }

    if entry.extensions.is_empty() {
        return Err(ConfigError::Validation(format!(
            "category '{}' must list at least one extension",
            entry.name
        )));
    }

    for ext in &entry.extensions {
        if ext.trim_start_matches('.').trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty extension",
                entry.name
            )));
        }
    }

    Ok(())
}
