//! Convenience helpers for decoding assets via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Every decode is
//! expanded to RGBA8 so opaque-only sources still carry an alpha channel of
//! 255 everywhere.

use crate::image::PixelBuffer;
use crate::util::{TileMatchError, TileMatchResult};
use std::path::Path;

/// Creates a buffer from an RGBA image, taking ownership of its bytes.
pub fn buffer_from_rgba_image(img: image::RgbaImage) -> TileMatchResult<PixelBuffer> {
    let width = img.width();
    let height = img.height();
    PixelBuffer::from_rgba8(img.into_raw(), width, height)
}

/// Creates a buffer from any decoded image, converting to RGBA8.
pub fn buffer_from_dynamic_image(img: &image::DynamicImage) -> TileMatchResult<PixelBuffer> {
    buffer_from_rgba_image(img.to_rgba8())
}

/// Loads an image from disk and converts it to an RGBA8 buffer.
pub fn load_rgba_image<P: AsRef<Path>>(path: P) -> TileMatchResult<PixelBuffer> {
    let img = image::open(path).map_err(|err| TileMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    buffer_from_dynamic_image(&img)
}
