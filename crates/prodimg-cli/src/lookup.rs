//! Single-item commands: `search`, `convert`, and `brands`.

use std::path::Path;

use anyhow::Context as _;
use prodimg_convert::ImageConverter;
use prodimg_core::{load_brand_registry, AppConfig};
use prodimg_scraper::{extract_image_url, locate, ScrapeClient};

/// Locate the product page for `item_number` and print its image URL as JSON.
pub(crate) async fn run_search(
    config: &AppConfig,
    item_number: &str,
    brand: Option<&str>,
) -> anyhow::Result<()> {
    prodimg_core::catalog::validate_identifier(item_number.trim())
        .map_err(|reason| anyhow::anyhow!("invalid item number '{item_number}': {reason}"))?;

    let registry = load_brand_registry(
        config.brands_path.as_deref(),
        config.default_brand.as_deref(),
    )?;
    let profile = registry
        .resolve(brand)
        .ok_or_else(|| anyhow::anyhow!("unsupported brand: {}", brand.unwrap_or_default()))?;

    let scraper = ScrapeClient::from_config(config)?;
    let page = locate(&scraper, item_number.trim(), profile).await?;
    let image_url = extract_image_url(&page.content, profile)?;

    let result = serde_json::json!({
        "itemNumber": item_number.trim(),
        "brand": profile.key(),
        "productUrl": page.product_url,
        "imageUrl": image_url,
    });
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Convert one image; write it to `output` or print its data URL.
pub(crate) async fn run_convert(
    config: &AppConfig,
    image_url: &str,
    quality: Option<u8>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let converter = ImageConverter::from_config(config)?;
    let encoded = converter
        .convert(image_url, quality.unwrap_or(config.quality))
        .await
        .with_context(|| format!("failed to convert {image_url}"))?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(path, encoded.bytes())
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("{} ({} bytes)", path.display(), encoded.size_bytes());
        }
        None => println!("{}", encoded.data_url()),
    }
    Ok(())
}

pub(crate) fn run_brands(config: &AppConfig) -> anyhow::Result<()> {
    let registry = load_brand_registry(
        config.brands_path.as_deref(),
        config.default_brand.as_deref(),
    )?;
    for profile in registry.profiles() {
        let marker = if profile.key() == registry.default_brand() {
            "*"
        } else {
            " "
        };
        println!("{marker} {:<12} {}", profile.key(), profile.base_url());
    }
    Ok(())
}
