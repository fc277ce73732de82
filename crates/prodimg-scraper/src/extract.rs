//! Image URL selection from scraped page content.
//!
//! Links are checked first against the storefront CDN's full-resolution
//! shape; the brand's markdown rule is only consulted when no link matches.

use prodimg_core::BrandProfile;

use crate::error::ScraperError;
use crate::types::PageContent;

/// URL shape of full-resolution product images on the storefront CDN.
#[derive(Debug, Clone, Copy)]
pub struct CdnShape {
    pub host: &'static str,
    pub size_folder: &'static str,
    pub suffix: &'static str,
}

pub const FULL_RESOLUTION_CDN: CdnShape = CdnShape {
    host: "cdn11.bigcommerce.com",
    size_folder: "1280x1280",
    suffix: ".png?c=2",
};

impl CdnShape {
    #[must_use]
    pub fn matches(&self, link: &str) -> bool {
        link.contains(self.host) && link.contains(self.size_folder) && link.ends_with(self.suffix)
    }
}

/// Pick the best image URL on a page.
///
/// # Errors
///
/// Returns [`ScraperError::ImageNotFound`] when neither the CDN link rule
/// nor the brand rule yields a candidate.
pub fn extract_image_url(
    content: &PageContent,
    profile: &BrandProfile,
) -> Result<String, ScraperError> {
    if let Some(link) = content
        .links
        .iter()
        .find(|link| FULL_RESOLUTION_CDN.matches(link))
    {
        tracing::debug!(brand = profile.key(), url = %link, "image found in page links");
        return Ok(link.clone());
    }

    if let Some(url) = profile.extract_image(&content.markdown) {
        tracing::debug!(brand = profile.key(), url = %url, "image found in page body");
        return Ok(url);
    }

    Err(ScraperError::ImageNotFound {
        url: content.source_url.clone(),
    })
}

#[cfg(test)]
mod tests {
    use prodimg_core::BrandRegistry;

    use super::*;

    const CDN_LINK: &str = "https://cdn11.bigcommerce.com/s-fg8rw4u4uq/images/stencil/1280x1280/products/32/189/2212__05798.1515075711.png?c=2";

    fn page(links: &[&str], markdown: &str) -> PageContent {
        PageContent {
            source_url: "https://www.johnsens.com/all/2212".to_string(),
            links: links.iter().map(|l| (*l).to_string()).collect(),
            markdown: markdown.to_string(),
            status_code: Some(200),
        }
    }

    #[test]
    fn cdn_link_is_preferred_over_markdown() {
        let registry = BrandRegistry::builtin();
        let profile = registry.get("bluemagic").unwrap();
        let content = page(
            &["https://www.bluemagicusa.com/about", CDN_LINK],
            "![x](https://cdn.bluemagicusa.com/hero.jpg)",
        );
        assert_eq!(extract_image_url(&content, profile).unwrap(), CDN_LINK);
    }

    #[test]
    fn first_matching_cdn_link_wins() {
        let registry = BrandRegistry::builtin();
        let profile = registry.get("johnsens").unwrap();
        let second = CDN_LINK.replace("2212__05798", "2224__11111");
        let content = page(&[CDN_LINK, second.as_str()], "");
        assert_eq!(extract_image_url(&content, profile).unwrap(), CDN_LINK);
    }

    #[test]
    fn thumbnail_links_fall_through_to_markdown_rule() {
        let registry = BrandRegistry::builtin();
        let profile = registry.get("purecitrus").unwrap();
        let thumb = CDN_LINK.replace("1280x1280", "160x160");
        let content = page(&[thumb.as_str()], "see https://cdn.purecitrus.com/bottle.png here");
        assert_eq!(
            extract_image_url(&content, profile).unwrap(),
            "https://cdn.purecitrus.com/bottle.png"
        );
    }

    #[test]
    fn cdn_link_without_query_marker_is_ignored() {
        assert!(!FULL_RESOLUTION_CDN.matches(&CDN_LINK.replace("?c=2", "")));
        assert!(FULL_RESOLUTION_CDN.matches(CDN_LINK));
    }

    #[test]
    fn no_candidate_is_image_not_found() {
        let registry = BrandRegistry::builtin();
        let profile = registry.get("johnsens").unwrap();
        let content = page(&["https://www.johnsens.com/contact"], "No images on this page.");
        let err = extract_image_url(&content, profile).unwrap_err();
        assert!(matches!(err, ScraperError::ImageNotFound { .. }));
        assert_eq!(err.kind(), prodimg_core::ErrorKind::ImageNotFoundError);
    }
}
