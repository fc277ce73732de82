//! Product page location and image URL extraction.

pub mod client;
pub mod error;
pub mod extract;
pub mod locator;
pub mod types;

pub use client::ScrapeClient;
pub use error::ScraperError;
pub use extract::extract_image_url;
pub use locator::locate;
pub use types::{LocatedPage, PageContent};
