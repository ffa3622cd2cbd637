//! Match search over one (tileset, single) pair.
//!
//! The search walks every candidate alignment produced by the window grid,
//! scores it, and keeps the windows whose raw agreement strictly exceeds
//! the threshold. Accepted windows are reported in enumeration order and may
//! overlap; no de-duplication of adjacent matches is performed.

pub mod grid;

use crate::image::{PixelBuffer, Region};
use crate::score::masked_agreement;
use crate::util::{TileMatchError, TileMatchResult};
use grid::WindowGrid;

/// Default acceptance threshold on the raw agreement score.
pub const DEFAULT_THRESHOLD: f32 = 0.9;

/// Default grid stride, the nominal tile size of the target asset format.
pub const DEFAULT_STRIDE: u32 = 16;

/// One accepted match: an aligned region pair plus a normalized confidence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    /// Matched window in tileset coordinates.
    pub tileset_region: Region,
    /// The same window in single coordinates; always the same shape.
    pub single_region: Region,
    /// Normalized score in `(0, 1]`: 0 corresponds exactly to the
    /// acceptance threshold, 1 to a perfect raw score. Comparable across
    /// runs with different thresholds.
    pub confidence: f32,
}

/// Parameters for a matching pass.
#[derive(Clone, Copy, Debug)]
pub struct SearchConfig {
    /// Minimum raw agreement a window must strictly exceed to be accepted.
    pub threshold: f32,
    /// Grid step for candidate window origins.
    pub stride: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            stride: DEFAULT_STRIDE,
        }
    }
}

impl SearchConfig {
    /// Checks that the parameters are usable.
    ///
    /// The threshold must lie in `[0, 1)`: a negative threshold would let
    /// zero-score windows through, and 1 or more would make the confidence
    /// rescaling divide by zero.
    pub fn validate(&self) -> TileMatchResult<()> {
        if !self.threshold.is_finite() || !(0.0..1.0).contains(&self.threshold) {
            return Err(TileMatchError::InvalidConfig {
                reason: "threshold must lie in [0, 1)",
            });
        }
        if self.stride == 0 {
            return Err(TileMatchError::InvalidConfig {
                reason: "stride must be at least 1",
            });
        }
        Ok(())
    }
}

/// Finds every window of `tileset` that matches `single` above threshold.
///
/// The scoring denominator is the single's full-extent opaque pixel count,
/// computed once per call. Results carry `confidence =
/// (raw - threshold) / (1 - threshold)` so values span `(0, 1]` regardless
/// of the configured threshold; a raw score exactly at the threshold is
/// excluded.
pub fn find_tiles(
    tileset: &PixelBuffer,
    single: &PixelBuffer,
    cfg: &SearchConfig,
) -> TileMatchResult<Vec<Tile>> {
    cfg.validate()?;

    let opaque_total = single.opaque_pixels();
    if opaque_total == 0 {
        // Every window of an entirely transparent single scores 0.0, which
        // can never strictly exceed a threshold in [0, 1).
        return Ok(Vec::new());
    }

    let grid = WindowGrid::new(
        tileset.width(),
        tileset.height(),
        single.width(),
        single.height(),
        cfg.stride,
    )?;

    let mut tiles = Vec::new();
    for (tileset_region, single_region) in grid {
        let raw = masked_agreement(tileset, tileset_region, single, single_region, opaque_total)?;
        if raw > cfg.threshold {
            tiles.push(Tile {
                tileset_region,
                single_region,
                confidence: (raw - cfg.threshold) / (1.0 - cfg.threshold),
            });
        }
    }
    Ok(tiles)
}
