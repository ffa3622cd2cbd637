//! Masked pixel-agreement scoring.
//!
//! Sprite atlases are expected to contain byte-identical copies of their
//! singles, so the score counts exact RGBA equality under the single's
//! opacity mask rather than a distance metric; any tolerance would only
//! admit false positives.

use crate::image::{PixelBuffer, Region, ALPHA_OPAQUE, CHANNELS};
use crate::util::{TileMatchError, TileMatchResult};

/// Scores how well a tileset window matches a single window.
///
/// Both regions must have the same shape and lie within their buffers. The
/// mask is the set of fully opaque pixels of the single window; a position
/// agrees when all four channels are equal. `opaque_total` is the opaque
/// pixel count of the *entire* single image, not the window: windows clipped
/// at the tileset's edges can therefore never reach a full score, which
/// penalizes boundary candidates instead of boosting them.
///
/// Returns a value in `[0, 1]`; `0.0` when `opaque_total` is zero (an
/// entirely transparent single matches nothing).
pub fn masked_agreement(
    tileset: &PixelBuffer,
    tileset_region: Region,
    single: &PixelBuffer,
    single_region: Region,
    opaque_total: u32,
) -> TileMatchResult<f32> {
    if !tileset_region.same_shape(&single_region) {
        return Err(TileMatchError::ShapeMismatch {
            tileset_region,
            single_region,
        });
    }
    tileset.check_region(tileset_region)?;
    single.check_region(single_region)?;

    if opaque_total == 0 {
        return Ok(0.0);
    }

    let mut agree = 0u32;
    for dy in 0..single_region.height {
        let t_row = tileset
            .region_row(tileset_region, dy)
            .expect("tileset row within bounds after region check");
        let s_row = single
            .region_row(single_region, dy)
            .expect("single row within bounds after region check");
        for (t_px, s_px) in t_row
            .chunks_exact(CHANNELS)
            .zip(s_row.chunks_exact(CHANNELS))
        {
            // Equality over all four channels; the mask test already pins
            // the single's alpha to 255, so agreement implies the tileset
            // pixel is fully opaque as well.
            if s_px[3] == ALPHA_OPAQUE && t_px == s_px {
                agree += 1;
            }
        }
    }

    Ok(agree as f32 / opaque_total as f32)
}
