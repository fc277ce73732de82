use serde::{Deserialize, Serialize};

/// Body of `POST {api}/scrape`.
#[derive(Debug, Serialize)]
pub(crate) struct ScrapeRequest<'a> {
    pub url: &'a str,
    pub formats: [&'a str; 2],
}

/// Envelope returned by the scrape backend.
#[derive(Debug, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeData {
    pub markdown: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
    pub metadata: Option<ScrapeMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeMetadata {
    /// HTTP status the backend saw when it fetched the target page.
    pub status_code: Option<u16>,
    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub error: Option<String>,
}

/// Structured content of one product page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    pub source_url: String,
    /// Hyperlinks found on the page, in document order.
    pub links: Vec<String>,
    /// Markdown rendering of the page body.
    pub markdown: String,
    pub status_code: Option<u16>,
}

/// A located product page: the URL that was scraped and what it contained.
#[derive(Debug, Clone)]
pub struct LocatedPage {
    pub product_url: String,
    pub content: PageContent,
}
