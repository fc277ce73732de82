use prodimg_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("product page not found: {url}")]
    NotFound { url: String },

    #[error("scrape backend could not render {url}: {reason}")]
    ScrapeFailed { url: String, reason: String },

    #[error("unexpected HTTP status {status} from scrape backend for {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid scrape API URL \"{api_url}\": {reason}")]
    InvalidApiUrl { api_url: String, reason: String },

    #[error("no product image found on {url}")]
    ImageNotFound { url: String },
}

impl ScraperError {
    /// Pipeline error kind this failure is reported as.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScraperError::NotFound { .. } | ScraperError::ScrapeFailed { .. } => {
                ErrorKind::NotFoundError
            }
            ScraperError::ImageNotFound { .. } => ErrorKind::ImageNotFoundError,
            ScraperError::Http(_)
            | ScraperError::Deserialize { .. }
            | ScraperError::UnexpectedStatus { .. }
            | ScraperError::InvalidApiUrl { .. } => ErrorKind::UpstreamError,
        }
    }
}
