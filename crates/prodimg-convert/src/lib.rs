//! Image download and WebP re-encoding.

pub mod converter;
pub mod encode;
pub mod error;
pub mod types;

pub use converter::{ConverterBackend, ImageConverter};
pub use encode::{encode_webp, validate_quality, EncodedImage, WEBP_FORMAT};
pub use error::ConvertError;
pub use types::{ConvertErrorBody, ConvertRequest, ConvertResponse};
