//! Pixel buffers and regions.
//!
//! `PixelBuffer` is an owned, immutable RGBA8 raster in row-major order with
//! 4 bytes per pixel. Matching treats buffers as read-only for the lifetime
//! of a run, so they are shared across workers behind `Arc` without locking.
//! `Region` is an axis-aligned rectangle interpreted relative to a specific
//! buffer; it carries no ownership of its own.

use crate::util::{TileMatchError, TileMatchResult};
use std::fmt;

#[cfg(feature = "image-io")]
pub mod io;

/// Number of channels per pixel (RGB + alpha).
pub const CHANNELS: usize = 4;

/// Alpha value marking a pixel as fully opaque and part of the mask.
pub const ALPHA_OPAQUE: u8 = 255;

/// Axis-aligned pixel rectangle with a strictly positive area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels, greater than zero.
    pub width: u32,
    /// Height in pixels, greater than zero.
    pub height: u32,
}

impl Region {
    /// Creates a region; width and height must be positive.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> TileMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(TileMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            x,
            y,
            width,
            height,
        })
    }

    /// Returns the exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Returns the exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// Returns true if both regions have the same width and height.
    pub fn same_shape(&self, other: &Region) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // X geometry notation: WxH+X+Y.
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Owned RGBA8 image buffer, immutable after creation.
#[derive(Debug)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Creates a buffer from interleaved RGBA8 bytes.
    ///
    /// `data` must hold exactly `width * height * 4` bytes. Sources without
    /// an alpha channel are expected to be expanded to alpha 255 before
    /// reaching this constructor.
    pub fn from_rgba8(data: Vec<u8>, width: u32, height: u32) -> TileMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(TileMatchError::InvalidDimensions { width, height });
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or(TileMatchError::InvalidDimensions { width, height })?;
        if data.len() != expected {
            return Err(TileMatchError::BufferSizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a buffer filled with one RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> TileMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(TileMatchError::InvalidDimensions { width, height });
        }
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .ok_or(TileMatchError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self::from_rgba8(data, width, height)
    }

    /// Returns the buffer width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the buffer height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the backing RGBA bytes in row-major order.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.data
    }

    /// Returns the 4-byte RGBA slice at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data.get(idx..idx + CHANNELS)
    }

    /// Returns the contiguous RGBA bytes of row `dy` of `region`.
    ///
    /// `None` when the row lies outside the buffer; callers that have
    /// validated the region up front may `expect` the result.
    pub fn region_row(&self, region: Region, dy: u32) -> Option<&[u8]> {
        if dy >= region.height {
            return None;
        }
        let y = u64::from(region.y) + u64::from(dy);
        if y >= u64::from(self.height) || region.right() > u64::from(self.width) {
            return None;
        }
        let start = (y as usize * self.width as usize + region.x as usize) * CHANNELS;
        let len = region.width as usize * CHANNELS;
        self.data.get(start..start + len)
    }

    /// Counts the fully opaque pixels over the whole buffer.
    ///
    /// This is the scoring denominator for a single image: it always covers
    /// the full extent, never a clipped window.
    pub fn opaque_pixels(&self) -> u32 {
        self.data
            .chunks_exact(CHANNELS)
            .filter(|px| px[3] == ALPHA_OPAQUE)
            .count() as u32
    }

    /// Verifies that `region` lies entirely within this buffer.
    pub fn check_region(&self, region: Region) -> TileMatchResult<()> {
        if region.right() > u64::from(self.width) || region.bottom() > u64::from(self.height) {
            return Err(TileMatchError::RegionOutOfBounds {
                region,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}
