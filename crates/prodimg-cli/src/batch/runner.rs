//! Sequential batch orchestration and the results document.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use prodimg_core::{BatchSummary, CatalogItem};

use super::pipeline::{process_item, PipelineContext};

pub(crate) const SUMMARY_FILE_NAME: &str = "conversion-results.json";

/// Run every item in order, sleeping `pacing` between consecutive items.
///
/// Item failures are recorded, never returned.
pub(crate) async fn run_items(
    ctx: &PipelineContext<'_>,
    items: &[CatalogItem],
    pacing: Duration,
) -> BatchSummary {
    let mut summary = BatchSummary::new();
    let total = items.len();

    for (index, item) in items.iter().enumerate() {
        tracing::info!(
            item = %item.identifier,
            name = %item.display_name,
            position = index + 1,
            total,
            "processing item"
        );
        summary.record(process_item(ctx, item).await);

        if index + 1 < total && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }

    summary.finish();
    tracing::info!(
        total = summary.total_count(),
        successful = summary.success_count(),
        failed = summary.failure_count(),
        "batch complete"
    );
    summary
}

/// Write `summary` as pretty JSON to `{output_dir}/conversion-results.json`.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file written.
pub(crate) async fn write_summary(
    summary: &BatchSummary,
    output_dir: &Path,
) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let path = output_dir.join(SUMMARY_FILE_NAME);
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
