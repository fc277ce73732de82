//! HTTP client for the page-scraping backend.
//!
//! Speaks the Firecrawl-compatible `POST {api}/scrape` protocol: the backend
//! fetches and renders a page and returns its markdown and links.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::types::{PageContent, ScrapeRequest, ScrapeResponse};

/// Formats requested from the backend for every page.
const SCRAPE_FORMATS: [&str; 2] = ["markdown", "links"];

/// Client for the scraping backend.
///
/// Every call is a single request: no retries happen here, so one
/// [`ScrapeClient::scrape`] is exactly one outbound call.
pub struct ScrapeClient {
    client: Client,
    scrape_url: Url,
    api_key: Option<String>,
}

impl ScrapeClient {
    /// Creates a client for the backend rooted at `api_url`.
    ///
    /// `api_key`, when present, is sent as a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidApiUrl`] if `api_url` is not a valid URL
    /// base, or [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        api_url: &str,
        api_key: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let scrape_url = Self::scrape_endpoint(api_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            scrape_url,
            api_key: api_key.map(str::to_owned),
        })
    }

    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`ScrapeClient::new`].
    pub fn from_config(config: &prodimg_core::AppConfig) -> Result<Self, ScraperError> {
        if config.scrape_api_key.is_none() {
            tracing::warn!(
                api_url = %config.scrape_api_url,
                "FIRECRAWL_API_KEY is not set; scrape requests will be unauthenticated"
            );
        }
        Self::new(
            &config.scrape_api_url,
            config.scrape_api_key.as_deref(),
            config.scrape_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches structured content for `url` through the backend.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`]: backend returned 404, or the target
    ///   page itself answered 404/410.
    /// - [`ScraperError::ScrapeFailed`]: backend reported `success: false`,
    ///   returned no page data, or the target page answered another error status.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-2xx backend status.
    /// - [`ScraperError::Http`]: network failure or timeout.
    /// - [`ScraperError::Deserialize`]: backend body is not the expected JSON.
    pub async fn scrape(&self, url: &str) -> Result<PageContent, ScraperError> {
        let mut request = self.client.post(self.scrape_url.clone()).json(&ScrapeRequest {
            url,
            formats: SCRAPE_FORMATS,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<ScrapeResponse>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("scrape response for {url}"),
                source: e,
            }
        })?;

        page_content_from_response(url, parsed)
    }

    fn scrape_endpoint(api_url: &str) -> Result<Url, ScraperError> {
        let base = format!("{}/scrape", api_url.trim_end_matches('/'));
        Url::parse(&base).map_err(|e| ScraperError::InvalidApiUrl {
            api_url: api_url.to_owned(),
            reason: e.to_string(),
        })
    }
}

/// Interpret a successfully decoded backend envelope.
fn page_content_from_response(
    url: &str,
    response: ScrapeResponse,
) -> Result<PageContent, ScraperError> {
    if !response.success {
        return Err(ScraperError::ScrapeFailed {
            url: url.to_owned(),
            reason: response
                .error
                .unwrap_or_else(|| "backend reported failure".to_string()),
        });
    }

    let Some(data) = response.data else {
        return Err(ScraperError::ScrapeFailed {
            url: url.to_owned(),
            reason: "response contained no page data".to_string(),
        });
    };

    let metadata = data.metadata.unwrap_or_default();
    match metadata.status_code {
        Some(404 | 410) => {
            return Err(ScraperError::NotFound {
                url: url.to_owned(),
            })
        }
        Some(code) if code >= 400 => {
            return Err(ScraperError::ScrapeFailed {
                url: url.to_owned(),
                reason: metadata
                    .error
                    .unwrap_or_else(|| format!("target page answered HTTP {code}")),
            })
        }
        _ => {}
    }

    Ok(PageContent {
        source_url: metadata.source_url.unwrap_or_else(|| url.to_owned()),
        links: data.links,
        markdown: data.markdown.unwrap_or_default(),
        status_code: metadata.status_code,
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
