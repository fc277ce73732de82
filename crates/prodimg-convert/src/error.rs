use prodimg_core::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("quality must be between 1 and 100, got {0}")]
    InvalidQuality(i64),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("image host returned HTTP {status} for {url}")]
    DownloadStatus { status: u16, url: String },

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("WebP encoding failed: {0}")]
    Encode(String),

    #[error("conversion service unreachable at {endpoint}: {source}")]
    RemoteTransport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// `kind` is the classification the service reported, if any.
    #[error("conversion service returned HTTP {status}: {message}")]
    Remote {
        status: u16,
        message: String,
        kind: Option<ErrorKind>,
    },

    #[error("conversion service returned an unusable payload: {0}")]
    RemotePayload(String),
}

impl ConvertError {
    /// Pipeline error kind this failure is reported as.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Client(_)
            | ConvertError::Download { .. }
            | ConvertError::DownloadStatus { .. }
            | ConvertError::RemoteTransport { .. } => ErrorKind::DownloadError,
            ConvertError::Remote { kind, .. } => kind.unwrap_or(ErrorKind::EncodeError),
            ConvertError::InvalidQuality(_)
            | ConvertError::Decode(_)
            | ConvertError::Encode(_)
            | ConvertError::RemotePayload(_) => ErrorKind::EncodeError,
        }
    }
}
