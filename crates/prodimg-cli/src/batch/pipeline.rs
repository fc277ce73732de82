//! Per-item pipeline: locate → extract → convert → persist.
//!
//! The first failing stage ends the item. Stage errors are folded into the
//! returned [`ItemOutcome`] and never propagate to the caller.

use std::fmt::Display;
use std::path::Path;

use prodimg_convert::ImageConverter;
use prodimg_core::{BrandProfile, CatalogItem, ErrorKind, ItemOutcome, Stage};
use prodimg_scraper::{extract_image_url, locate, ScrapeClient};

use super::persist::persist;

/// Collaborators and settings shared by every item in a run.
pub(crate) struct PipelineContext<'a> {
    pub scraper: &'a ScrapeClient,
    pub converter: &'a ImageConverter,
    pub profile: &'a BrandProfile,
    pub output_dir: &'a Path,
    pub quality: u8,
}

pub(crate) async fn process_item(ctx: &PipelineContext<'_>, item: &CatalogItem) -> ItemOutcome {
    let id = item.identifier.as_str();

    let page = match locate(ctx.scraper, id, ctx.profile).await {
        Ok(page) => page,
        Err(e) => return failed(id, Stage::Locate, e.kind(), &e),
    };
    tracing::debug!(item = id, stage = %Stage::Locate, url = %page.product_url, "stage complete");

    let image_url = match extract_image_url(&page.content, ctx.profile) {
        Ok(url) => url,
        Err(e) => return failed(id, Stage::Extract, e.kind(), &e),
    };
    tracing::debug!(item = id, stage = %Stage::Extract, url = %image_url, "stage complete");

    let encoded = match ctx.converter.convert(&image_url, ctx.quality).await {
        Ok(encoded) => encoded,
        Err(e) => return failed(id, Stage::Convert, e.kind(), &e),
    };
    tracing::debug!(
        item = id,
        stage = %Stage::Convert,
        size_bytes = encoded.size_bytes(),
        "stage complete"
    );

    let path = match persist(&encoded, id, ctx.output_dir).await {
        Ok(path) => path,
        Err(e) => return failed(id, Stage::Persist, ErrorKind::IoError, &e),
    };

    tracing::info!(
        item = id,
        name = %item.display_name,
        path = %path,
        size_bytes = encoded.size_bytes(),
        "item converted"
    );
    ItemOutcome::succeeded(id, path, encoded.size_bytes())
}

fn failed(identifier: &str, stage: Stage, kind: ErrorKind, error: &impl Display) -> ItemOutcome {
    tracing::warn!(
        item = identifier,
        stage = %stage,
        error_kind = %kind,
        error = %error,
        "item failed"
    );
    ItemOutcome::failed(identifier, stage, kind, error.to_string())
}
