mod batch;
mod lookup;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::batch::BatchArgs;

#[derive(Debug, Parser)]
#[command(name = "prodimg-cli")]
#[command(about = "Fetch product images from vendor sites and convert them to WebP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run every catalog item through locate, extract, convert and persist.
    Batch(BatchArgs),
    /// Find the product page and image URL for one item.
    Search {
        item_number: String,
        #[arg(long)]
        brand: Option<String>,
    },
    /// Convert a single image URL to WebP.
    Convert {
        image_url: String,
        #[arg(long, value_parser = prodimg_core::config::parse_quality)]
        quality: Option<u8>,
        /// Write the WebP here instead of printing a data URL.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List the configured brand profiles.
    Brands,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = prodimg_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Batch(args)) => batch::run_batch(&config, args).await?,
        None => batch::run_batch(&config, BatchArgs::default()).await?,
        Some(Commands::Search { item_number, brand }) => {
            lookup::run_search(&config, &item_number, brand.as_deref()).await?;
        }
        Some(Commands::Convert {
            image_url,
            quality,
            output,
        }) => {
            lookup::run_convert(&config, &image_url, quality, output.as_deref()).await?;
        }
        Some(Commands::Brands) => lookup::run_brands(&config)?,
    }

    Ok(())
}
