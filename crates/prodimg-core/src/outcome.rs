//! Per-item outcomes and the batch summary written at the end of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Failure taxonomy shared by every pipeline stage.
///
/// Serialized with the exact names operators see in `conversion-results.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// The product page could not be resolved or rendered.
    NotFoundError,
    /// Transport or service failure talking to the scraping backend.
    UpstreamError,
    /// The page was fetched but no image URL could be extracted.
    ImageNotFoundError,
    /// The source image could not be downloaded.
    DownloadError,
    /// The downloaded bytes could not be decoded or re-encoded.
    EncodeError,
    /// Writing the encoded image failed.
    #[serde(rename = "IOError")]
    IoError,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFoundError => "NotFoundError",
            ErrorKind::UpstreamError => "UpstreamError",
            ErrorKind::ImageNotFoundError => "ImageNotFoundError",
            ErrorKind::DownloadError => "DownloadError",
            ErrorKind::EncodeError => "EncodeError",
            ErrorKind::IoError => "IOError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Locate,
    Extract,
    Convert,
    Persist,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Locate => write!(f, "locate"),
            Stage::Extract => write!(f, "extract"),
            Stage::Convert => write!(f, "convert"),
            Stage::Persist => write!(f, "persist"),
        }
    }
}

/// Terminal record of one item's pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    #[serde(rename = "itemNumber")]
    pub identifier: String,
    pub success: bool,
    #[serde(rename = "path", default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<String>,
    #[serde(rename = "size", default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemOutcome {
    #[must_use]
    pub fn succeeded(identifier: &str, storage_path: String, size_bytes: u64) -> Self {
        Self {
            identifier: identifier.to_string(),
            success: true,
            storage_path: Some(storage_path),
            size_bytes: Some(size_bytes),
            error_kind: None,
            failed_stage: None,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(identifier: &str, stage: Stage, kind: ErrorKind, message: String) -> Self {
        Self {
            identifier: identifier.to_string(),
            success: false,
            storage_path: None,
            size_bytes: None,
            error_kind: Some(kind),
            failed_stage: Some(stage),
            error: Some(message),
        }
    }
}

/// Aggregate counts plus the ordered outcomes of one batch run.
///
/// Counters only move through [`BatchSummary::record`], which keeps
/// `total == successful + failed == items.len()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    total: usize,
    successful: usize,
    failed: usize,
    items: Vec<ItemOutcome>,
    started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
}

impl Default for BatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchSummary {
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: 0,
            successful: 0,
            failed: 0,
            items: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        if outcome.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.total += 1;
        self.items.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successful
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed
    }

    #[must_use]
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.items
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }
}
