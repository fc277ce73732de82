//! Local WebP encoding.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::ConvertError;

pub const WEBP_FORMAT: &str = "webp";

/// Lossy WebP bytes produced by the converter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
}

impl EncodedImage {
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    #[must_use]
    pub fn format(&self) -> &'static str {
        WEBP_FORMAT
    }

    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// `data:image/webp;base64,...` form for direct embedding.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:image/{WEBP_FORMAT};base64,{}", self.to_base64())
    }
}

/// # Errors
///
/// Returns [`ConvertError::InvalidQuality`] unless `1 <= quality <= 100`.
pub fn validate_quality(quality: i64) -> Result<u8, ConvertError> {
    match u8::try_from(quality) {
        Ok(q @ 1..=100) => Ok(q),
        _ => Err(ConvertError::InvalidQuality(quality)),
    }
}

/// Decode `raw` (any format the `image` crate reads) and re-encode it as
/// lossy WebP at `quality`.
///
/// CPU-bound; async callers should run it on a blocking thread.
///
/// # Errors
///
/// - [`ConvertError::InvalidQuality`] for quality outside `1..=100`.
/// - [`ConvertError::Decode`] when `raw` is not a readable image.
/// - [`ConvertError::Encode`] when libwebp rejects the frame.
pub fn encode_webp(raw: &[u8], quality: u8) -> Result<EncodedImage, ConvertError> {
    let quality = validate_quality(i64::from(quality))?;
    let decoded = image::load_from_memory(raw)?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let memory = webp::Encoder::from_rgba(rgba.as_raw(), width, height)
        .encode_simple(false, f32::from(quality))
        .map_err(|e| ConvertError::Encode(format!("{e:?}")))?;

    tracing::debug!(
        width,
        height,
        quality,
        input_bytes = raw.len(),
        output_bytes = memory.len(),
        "encoded webp"
    );
    Ok(EncodedImage::new(memory.to_vec()))
}
