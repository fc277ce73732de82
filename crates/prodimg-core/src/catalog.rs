use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One catalog entry to fetch an image for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Vendor item number; also the output file stem.
    #[serde(alias = "item_number", alias = "itemNumber")]
    pub identifier: String,
    #[serde(alias = "name", alias = "displayName")]
    pub display_name: String,
}

impl CatalogItem {
    pub fn new(identifier: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_name: display_name.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ItemsFile {
    pub items: Vec<CatalogItem>,
}

/// The item list used when no items file is configured.
#[must_use]
pub fn default_items() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("2212", "JHN PREMIUM DOT 3 BRAKE FLUID"),
        CatalogItem::new("2224", "JHN PREMIUM DOT 3 BRAKE FLUID"),
        CatalogItem::new("2232", "JHN PREMIUM DOT 3 BRAKE FLUID"),
        CatalogItem::new("5012", "JHN PREMIUM DOT 4 BRAKE FLUID"),
        CatalogItem::new("4641", "JHN CARB CLEANER"),
    ]
}

/// Load and validate catalog items from a YAML file, preserving file order.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_items(path: &Path) -> Result<Vec<CatalogItem>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ItemsFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
        path: path.display().to_string(),
        source: e,
    })?;

    validate_items(&file.items)?;
    Ok(file.items)
}

/// Check that every identifier can be used as a file stem.
///
/// Duplicate identifiers are allowed (their output files overwrite each
/// other) but are reported with a warning.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] for a blank identifier or one that
/// contains a path separator.
pub fn validate_items(items: &[CatalogItem]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        validate_identifier(&item.identifier).map_err(|reason| {
            ConfigError::Validation(format!("item #{} ({:?}): {reason}", index + 1, item.identifier))
        })?;
        if !seen.insert(item.identifier.as_str()) {
            tracing::warn!(
                item = %item.identifier,
                "duplicate item identifier; later output will overwrite earlier output"
            );
        }
    }
    Ok(())
}

/// Returns the reason an identifier is unusable as a file stem, if any.
///
/// # Errors
///
/// Returns a human-readable reason when the identifier is rejected.
pub fn validate_identifier(identifier: &str) -> Result<(), &'static str> {
    if identifier.trim().is_empty() {
        return Err("identifier must be non-empty");
    }
    if identifier.contains(['/', '\\']) || identifier == "." || identifier == ".." {
        return Err("identifier must not contain path separators");
    }
    Ok(())
}
