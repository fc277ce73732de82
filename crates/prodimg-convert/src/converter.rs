//! Download-and-encode entry point used by the pipeline and the HTTP service.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;

use crate::encode::{encode_webp, validate_quality, EncodedImage};
use crate::error::ConvertError;
use crate::types::{ConvertErrorBody, ConvertRequest, ConvertResponse};

/// Where encoding happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterBackend {
    /// Download in-process and encode with libwebp on a blocking thread.
    Local,
    /// Delegate to a service speaking the `POST /convert` protocol.
    Remote { endpoint: String },
}

pub struct ImageConverter {
    client: Client,
    backend: ConverterBackend,
    timeout: Duration,
}

impl ImageConverter {
    /// Local converter whose downloads are bounded by `download_timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::Client`] if the HTTP client cannot be built.
    pub fn new(download_timeout_secs: u64, user_agent: &str) -> Result<Self, ConvertError> {
        let timeout = Duration::from_secs(download_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(ConvertError::Client)?;
        Ok(Self {
            client,
            backend: ConverterBackend::Local,
            timeout,
        })
    }

    #[must_use]
    pub fn with_remote_backend(mut self, endpoint: &str) -> Self {
        self.backend = ConverterBackend::Remote {
            endpoint: endpoint.trim().to_string(),
        };
        self
    }

    /// # Errors
    ///
    /// See [`ImageConverter::new`].
    pub fn from_config(config: &prodimg_core::AppConfig) -> Result<Self, ConvertError> {
        let converter = Self::new(config.download_timeout_secs, &config.user_agent)?;
        Ok(match config.converter_url.as_deref() {
            Some(endpoint) => {
                tracing::info!(endpoint, "using remote conversion service");
                converter.with_remote_backend(endpoint)
            }
            None => converter,
        })
    }

    #[must_use]
    pub fn backend(&self) -> &ConverterBackend {
        &self.backend
    }

    /// Fetch `image_url` and return it as lossy WebP.
    ///
    /// Quality is checked before any network call.
    ///
    /// # Errors
    ///
    /// Every variant of [`ConvertError`]; use [`ConvertError::kind`] to
    /// classify.
    pub async fn convert(&self, image_url: &str, quality: u8) -> Result<EncodedImage, ConvertError> {
        let quality = validate_quality(i64::from(quality))?;
        match &self.backend {
            ConverterBackend::Local => {
                let raw = self.download(image_url).await?;
                tracing::debug!(url = image_url, bytes = raw.len(), "image downloaded");
                tokio::task::spawn_blocking(move || encode_webp(&raw, quality))
                    .await
                    .map_err(|e| ConvertError::Encode(format!("encoder task failed: {e}")))?
            }
            ConverterBackend::Remote { endpoint } => {
                self.convert_remote(endpoint, image_url, quality).await
            }
        }
    }

    /// Raw bytes at `url`.
    ///
    /// # Errors
    ///
    /// [`ConvertError::Download`] on transport failure or timeout,
    /// [`ConvertError::DownloadStatus`] on a non-success status.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ConvertError> {
        let download_err = |source: reqwest::Error| ConvertError::Download {
            url: url.to_owned(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(download_err)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConvertError::DownloadStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let bytes = response.bytes().await.map_err(download_err)?;
        Ok(bytes.to_vec())
    }

    async fn convert_remote(
        &self,
        endpoint: &str,
        image_url: &str,
        quality: u8,
    ) -> Result<EncodedImage, ConvertError> {
        let transport_err = |source: reqwest::Error| ConvertError::RemoteTransport {
            endpoint: endpoint.to_owned(),
            source,
        };

        // Remote side downloads as well.
        let response = self
            .client
            .post(endpoint)
            .timeout(self.timeout * 2)
            .json(&ConvertRequest {
                image_url: Some(image_url.to_owned()),
                quality: i64::from(quality),
            })
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_err)?;

        if !status.is_success() {
            let (message, kind) = match serde_json::from_str::<ConvertErrorBody>(&body) {
                Ok(b) => (b.message.unwrap_or(b.error), b.kind),
                Err(_) => (body, None),
            };
            return Err(ConvertError::Remote {
                status: status.as_u16(),
                message,
                kind,
            });
        }

        let parsed: ConvertResponse = serde_json::from_str(&body)
            .map_err(|e| ConvertError::RemotePayload(e.to_string()))?;
        if !parsed.success {
            return Err(ConvertError::RemotePayload(
                "response reported success: false".to_string(),
            ));
        }
        let bytes = STANDARD
            .decode(parsed.base64.as_bytes())
            .map_err(|e| ConvertError::RemotePayload(format!("invalid base64: {e}")))?;
        if bytes.is_empty() {
            return Err(ConvertError::RemotePayload("empty image".to_string()));
        }

        tracing::debug!(
            endpoint,
            url = image_url,
            bytes = bytes.len(),
            "remote conversion complete"
        );
        Ok(EncodedImage::new(bytes))
    }
}
