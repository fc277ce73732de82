//! Shared domain types and configuration for the product image pipeline.

pub mod app_config;
pub mod brands;
pub mod catalog;
pub mod config;
pub mod outcome;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use brands::{load_brand_registry, BrandConfig, BrandProfile, BrandRegistry, BrandsFile};
pub use catalog::{default_items, load_items, CatalogItem};
pub use config::{load_app_config, load_app_config_from_env};
pub use outcome::{BatchSummary, ErrorKind, ItemOutcome, Stage};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid image pattern for brand '{brand}': {source}")]
    InvalidPattern {
        brand: String,
        #[source]
        source: regex::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}
