//! Photo and document capture: every upload is scaled to a fixed width and
//! re-encoded as JPEG before it is stored in the draft as a data URL.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{
    DynamicImage, ImageFormat,
    codecs::jpeg::JpegEncoder,
    error::{LimitError, LimitErrorKind},
    imageops::FilterType,
};
use std::path::Path;
use tracing::{debug, info};

use crate::error::ImageError;

pub const MAX_WIDTH: u32 = 800;
pub const JPEG_QUALITY: u8 = 60;

/// Decodes, scales to [`MAX_WIDTH`] and re-encodes an uploaded image
pub fn compress(bytes: &[u8], media_type: &str) -> Result<String, ImageError> {
    if !media_type.starts_with("image/") {
        return Err(ImageError::UnsupportedMediaType(media_type.to_string()));
    }

    let decoded = image::load_from_memory(bytes)?;
    let resized = scale_to_width(&decoded, MAX_WIDTH)?;

    let mut jpeg = Vec::new();
    resized
        .to_rgb8()
        .write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))?;

    info!(
        original_bytes = bytes.len(),
        compressed_bytes = jpeg.len(),
        width = resized.width(),
        height = resized.height(),
        "image compressed"
    );
    Ok(data_url("image/jpeg", &jpeg))
}

/// Reads a file from disk and compresses it, guessing the media type from
/// its extension
pub async fn compress_file(path: impl AsRef<Path>) -> Result<String, ImageError> {
    let path = path.as_ref();
    let media_type = media_type_for(path);
    debug!(path = %path.display(), media_type = %media_type, "reading upload");
    let bytes = tokio::fs::read(path).await?;
    compress(&bytes, &media_type)
}

pub fn media_type_for(path: &Path) -> String {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| "application/octet-stream".to_string())
}

/// Tallest output the JPEG encoder accepts
const MAX_HEIGHT: u32 = u16::MAX as u32;

/// Width is always [`MAX_WIDTH`]; height keeps the aspect ratio. Images that
/// would end up taller than [`MAX_HEIGHT`] are refused before resizing.
fn scale_to_width(image: &DynamicImage, width: u32) -> Result<DynamicImage, ImageError> {
    let scale = f64::from(width) / f64::from(image.width().max(1));
    let height = (f64::from(image.height()) * scale).round().max(1.0);
    if height > f64::from(MAX_HEIGHT) {
        return Err(ImageError::Processing(image::ImageError::Limits(
            LimitError::from_kind(LimitErrorKind::DimensionError),
        )));
    }
    Ok(image.resize_exact(width, height as u32, FilterType::Triangle))
}

pub fn data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Splits a data URL back into media type and raw bytes
pub fn decode_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (media_type, payload) = rest.split_once(";base64,")?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((media_type.to_string(), bytes))
}
