use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Placeholder replaced by the item identifier in `product_path`.
pub const ITEM_PLACEHOLDER: &str = "{item}";

/// Characters escaped when an identifier is spliced into a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const JOHNSENS_CDN_PATTERN: &str =
    r#"https://cdn11\.bigcommerce\.com/s-fg8rw4u4uq/images/stencil/1280x1280/[^"\s()<>]+\.png\?c=2"#;

/// First absolute image URL in the page body.
const GENERIC_IMAGE_PATTERN: &str = r#"(?i)https://[^"\s()<>]+\.(?:jpe?g|png|webp)"#;

/// `(key, base_url, product_path, image_pattern)` for the vendors supported
/// out of the box.
const BUILTIN_BRANDS: &[(&str, &str, &str, &str)] = &[
    (
        "johnsens",
        "https://www.johnsens.com",
        "/all/{item}",
        JOHNSENS_CDN_PATTERN,
    ),
    (
        "bluemagic",
        "https://www.bluemagicusa.com",
        "/products/{item}",
        GENERIC_IMAGE_PATTERN,
    ),
    (
        "quiksteel",
        "https://www.quiksteel.com",
        "/products/{item}",
        GENERIC_IMAGE_PATTERN,
    ),
    (
        "purecitrus",
        "https://www.purecitrus.com",
        "/products/{item}",
        GENERIC_IMAGE_PATTERN,
    ),
    (
        "turbo108",
        "https://www.turbo108.com",
        "/products/{item}",
        GENERIC_IMAGE_PATTERN,
    ),
    (
        "sprayx",
        "https://www.spray-x.com",
        "/products/{item}",
        GENERIC_IMAGE_PATTERN,
    ),
];

pub const DEFAULT_BRAND: &str = "johnsens";

/// Brand entry as written in `config/brands.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub key: String,
    pub base_url: String,
    /// Path appended to `base_url`; must contain `{item}`.
    pub product_path: String,
    /// Regex whose first match in the page markdown is the image candidate.
    pub image_pattern: String,
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    #[serde(default)]
    pub default_brand: Option<String>,
    pub brands: Vec<BrandConfig>,
}

/// Validated, ready-to-use description of one vendor website.
#[derive(Debug, Clone)]
pub struct BrandProfile {
    key: String,
    base_url: String,
    product_path: String,
    image_pattern: Regex,
}

impl BrandProfile {
    /// Compile a [`BrandConfig`] into a profile.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a blank key, a non-http(s) base
    /// URL, or a `product_path` without `{item}`, and
    /// [`ConfigError::InvalidPattern`] if `image_pattern` does not compile.
    pub fn from_config(config: &BrandConfig) -> Result<Self, ConfigError> {
        let key = config.key.trim();
        if key.is_empty() {
            return Err(ConfigError::Validation(
                "brand key must be non-empty".to_string(),
            ));
        }

        let base_url = config.base_url.trim().trim_end_matches('/');
        if !base_url.starts_with("https://") && !base_url.starts_with("http://") {
            return Err(ConfigError::Validation(format!(
                "brand '{key}' has base_url \"{}\"; expected an http(s) URL",
                config.base_url
            )));
        }

        if !config.product_path.contains(ITEM_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "brand '{key}' product_path \"{}\" must contain {ITEM_PLACEHOLDER}",
                config.product_path
            )));
        }

        let image_pattern =
            Regex::new(&config.image_pattern).map_err(|e| ConfigError::InvalidPattern {
                brand: key.to_string(),
                source: e,
            })?;

        let product_path = if config.product_path.starts_with('/') {
            config.product_path.clone()
        } else {
            format!("/{}", config.product_path)
        };

        Ok(Self {
            key: key.to_lowercase(),
            base_url: base_url.to_string(),
            product_path,
            image_pattern,
        })
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Candidate product page URL for an item.
    ///
    /// The identifier is percent-encoded as a single path segment so that
    /// it can never introduce extra path components or a query string.
    #[must_use]
    pub fn product_url(&self, identifier: &str) -> String {
        let segment = utf8_percent_encode(identifier, PATH_SEGMENT).to_string();
        format!(
            "{}{}",
            self.base_url,
            self.product_path.replace(ITEM_PLACEHOLDER, &segment)
        )
    }

    /// Apply the brand-specific image rule to a page body.
    #[must_use]
    pub fn extract_image(&self, markdown: &str) -> Option<String> {
        self.image_pattern
            .find(markdown)
            .map(|m| m.as_str().to_string())
    }
}

/// Brand profiles keyed by brand key, plus the brand used when a caller does
/// not name one.
#[derive(Debug, Clone)]
pub struct BrandRegistry {
    profiles: BTreeMap<String, BrandProfile>,
    default_brand: String,
}

impl BrandRegistry {
    /// Registry of the vendors supported without any configuration file.
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in brand table is invalid, which is a
    /// programming error caught by the unit tests.
    #[must_use]
    pub fn builtin() -> Self {
        let file = BrandsFile {
            default_brand: Some(DEFAULT_BRAND.to_string()),
            brands: BUILTIN_BRANDS
                .iter()
                .map(|(key, base_url, product_path, image_pattern)| BrandConfig {
                    key: (*key).to_string(),
                    base_url: (*base_url).to_string(),
                    product_path: (*product_path).to_string(),
                    image_pattern: (*image_pattern).to_string(),
                })
                .collect(),
        };
        Self::from_file(&file).expect("built-in brand table is valid")
    }

    /// Build a registry from a parsed brands file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any brand fails validation, keys collide, or
    /// the default brand is not among the configured brands.
    pub fn from_file(file: &BrandsFile) -> Result<Self, ConfigError> {
        if file.brands.is_empty() {
            return Err(ConfigError::Validation(
                "brands file must define at least one brand".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut profiles = BTreeMap::new();
        for config in &file.brands {
            let profile = BrandProfile::from_config(config)?;
            if !seen.insert(profile.key.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate brand key: '{}'",
                    profile.key
                )));
            }
            profiles.insert(profile.key.clone(), profile);
        }

        let default_brand = file
            .default_brand
            .as_deref()
            .map_or_else(
                || {
                    if profiles.contains_key(DEFAULT_BRAND) {
                        DEFAULT_BRAND.to_string()
                    } else {
                        file.brands[0].key.trim().to_lowercase()
                    }
                },
                |b| b.trim().to_lowercase(),
            );

        Self {
            profiles,
            default_brand: String::new(),
        }
        .with_default_brand(&default_brand)
    }

    /// Replace the default brand.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `key` is not a known brand.
    pub fn with_default_brand(mut self, key: &str) -> Result<Self, ConfigError> {
        let key = key.trim().to_lowercase();
        if !self.profiles.contains_key(&key) {
            return Err(ConfigError::Validation(format!(
                "default brand '{key}' is not defined"
            )));
        }
        self.default_brand = key;
        Ok(self)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BrandProfile> {
        self.profiles.get(&key.trim().to_lowercase())
    }

    /// Look up `key`, or the default brand when `key` is `None`.
    #[must_use]
    pub fn resolve(&self, key: Option<&str>) -> Option<&BrandProfile> {
        self.get(key.unwrap_or(self.default_brand.as_str()))
    }

    #[must_use]
    pub fn default_brand(&self) -> &str {
        &self.default_brand
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &BrandProfile> {
        self.profiles.values()
    }
}

/// Load and validate brand profiles.
///
/// With `path = None` the built-in registry is used. When `default_brand` is
/// set it overrides whatever default the file or built-in table declares.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brand_registry(
    path: Option<&Path>,
    default_brand: Option<&str>,
) -> Result<BrandRegistry, ConfigError> {
    let registry = match path {
        None => BrandRegistry::builtin(),
        Some(path) => {
            let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
                path: path.display().to_string(),
                source: e,
            })?;
            let file: BrandsFile =
                serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
                    path: path.display().to_string(),
                    source: e,
                })?;
            BrandRegistry::from_file(&file)?
        }
    };

    match default_brand {
        Some(key) => registry.with_default_brand(key),
        None => Ok(registry),
    }
}

#[cfg(test)]
#[path = "brands_test.rs"]
mod tests;
