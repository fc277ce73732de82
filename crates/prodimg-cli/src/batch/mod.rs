//! `batch` command handler.
//!
//! Loads the item list and brand profile, runs every item through the
//! pipeline, and writes the results document. Only a failure to write that
//! document makes the command fail.

mod persist;
mod pipeline;
mod runner;

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use prodimg_convert::ImageConverter;
use prodimg_core::{load_brand_registry, AppConfig, CatalogItem};
use prodimg_scraper::ScrapeClient;

pub(crate) use pipeline::PipelineContext;
pub(crate) use runner::{run_items, write_summary};

#[derive(Debug, Default, Args)]
pub(crate) struct BatchArgs {
    /// YAML items file; defaults to `PRODIMG_ITEMS_PATH` or the built-in list.
    #[arg(long)]
    pub items: Option<PathBuf>,
    /// Brand profile used for every item.
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// WebP quality, 1-100.
    #[arg(long, value_parser = prodimg_core::config::parse_quality)]
    pub quality: Option<u8>,
    /// Pause between consecutive items, in milliseconds.
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

pub(crate) fn load_catalog(
    config: &AppConfig,
    items_override: Option<&std::path::Path>,
) -> anyhow::Result<Vec<CatalogItem>> {
    match items_override.or(config.items_path.as_deref()) {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading items file");
            Ok(prodimg_core::load_items(path)?)
        }
        None => Ok(prodimg_core::default_items()),
    }
}

pub(crate) async fn run_batch(config: &AppConfig, args: BatchArgs) -> anyhow::Result<()> {
    let items = load_catalog(config, args.items.as_deref())?;
    let registry = load_brand_registry(
        config.brands_path.as_deref(),
        config.default_brand.as_deref(),
    )?;
    let profile = registry
        .resolve(args.brand.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "unknown brand '{}'; known brands: {}",
                args.brand.as_deref().unwrap_or_default(),
                registry.keys().collect::<Vec<_>>().join(", ")
            )
        })?;

    let scraper = ScrapeClient::from_config(config)?;
    let converter = ImageConverter::from_config(config)?;
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
    let quality = args.quality.unwrap_or(config.quality);
    let delay_ms = args.delay_ms.unwrap_or(config.inter_item_delay_ms);

    tracing::info!(
        items = items.len(),
        brand = profile.key(),
        output_dir = %output_dir.display(),
        quality,
        delay_ms,
        "starting batch"
    );

    let ctx = PipelineContext {
        scraper: &scraper,
        converter: &converter,
        profile,
        output_dir: &output_dir,
        quality,
    };
    let summary = run_items(&ctx, &items, Duration::from_millis(delay_ms)).await;
    let summary_path = write_summary(&summary, &output_dir).await?;

    println!("\n=== Conversion summary ===");
    println!("Total:      {}", summary.total_count());
    println!("Successful: {}", summary.success_count());
    println!("Failed:     {}", summary.failure_count());
    for outcome in summary.outcomes() {
        match (&outcome.storage_path, &outcome.error) {
            (Some(path), _) => println!("  ok    {:<8} {path}", outcome.identifier),
            (None, error) => println!(
                "  fail  {:<8} {}",
                outcome.identifier,
                error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
    println!("Results written to {}", summary_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
