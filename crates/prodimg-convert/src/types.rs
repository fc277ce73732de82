//! JSON bodies of the `POST /convert` protocol.
//!
//! Shared by the HTTP service and the remote converter backend so both ends
//! agree on field names.

use prodimg_core::ErrorKind;
use serde::{Deserialize, Deserializer, Serialize};

use crate::encode::{EncodedImage, WEBP_FORMAT};

pub const DEFAULT_QUALITY: i64 = 80;

fn default_quality() -> i64 {
    DEFAULT_QUALITY
}

/// Quality as sent by form-driven clients: a bare number or a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum QualityValue {
    Number(i64),
    Text(String),
}

fn deserialize_quality<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match QualityValue::deserialize(deserializer)? {
        QualityValue::Number(n) => Ok(n),
        QualityValue::Text(s) => s.trim().parse::<i64>().map_err(|_| {
            serde::de::Error::custom(format!("quality must be an integer, got \"{s}\""))
        }),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    /// Accepted as a wide integer so out-of-range values can be reported as
    /// a validation error instead of a body rejection.
    #[serde(default = "default_quality", deserialize_with = "deserialize_quality")]
    pub quality: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub success: bool,
    pub format: String,
    pub size: u64,
    pub base64: String,
    pub data_url: String,
}

impl From<&EncodedImage> for ConvertResponse {
    fn from(image: &EncodedImage) -> Self {
        Self {
            success: true,
            format: WEBP_FORMAT.to_string(),
            size: image.size_bytes(),
            base64: image.to_base64(),
            data_url: image.data_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Pipeline error kind of the failure, so remote callers classify it
    /// the same way a local conversion would.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}
