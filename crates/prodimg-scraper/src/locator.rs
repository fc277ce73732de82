//! Product page lookup for one catalog item.

use prodimg_core::BrandProfile;

use crate::client::ScrapeClient;
use crate::error::ScraperError;
use crate::types::LocatedPage;

/// Build the brand's candidate product URL for `identifier` and fetch its
/// structured content.
///
/// # Errors
///
/// Propagates [`ScrapeClient::scrape`] failures unchanged; no retry is
/// attempted.
pub async fn locate(
    client: &ScrapeClient,
    identifier: &str,
    profile: &BrandProfile,
) -> Result<LocatedPage, ScraperError> {
    let product_url = profile.product_url(identifier);
    tracing::debug!(
        item = identifier,
        brand = profile.key(),
        url = %product_url,
        "locating product page"
    );

    let content = client.scrape(&product_url).await?;
    tracing::debug!(
        item = identifier,
        links = content.links.len(),
        markdown_len = content.markdown.len(),
        "product page scraped"
    );

    Ok(LocatedPage {
        product_url,
        content,
    })
}
