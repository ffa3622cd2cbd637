//! Candidate window enumeration on a fixed grid.
//!
//! Window origins are quantized to the stride and deliberately allowed to
//! start before the tileset's top-left corner and to extend past its
//! bottom-right corner: a single whose true position straddles the grid is
//! still reachable through a clipped candidate. Both sides of each pair are
//! clipped identically, so the produced regions always have equal shape.

use crate::image::Region;
use crate::util::{TileMatchError, TileMatchResult};

/// Clips a window of `extent` starting at `origin` against `[0, bound)`.
///
/// Returns the clipped start on the bounded axis, the matching start inside
/// the window, and the shared length; `None` when the intersection is empty.
fn clip_axis(origin: i64, extent: i64, bound: i64) -> Option<(u32, u32, u32)> {
    let clipped_start = origin.max(0);
    let clipped_end = (origin + extent).min(bound);
    if clipped_end <= clipped_start {
        return None;
    }
    let window_start = (-origin).max(0);
    let len = clipped_end - clipped_start;
    Some((clipped_start as u32, window_start as u32, len as u32))
}

/// Finite, restartable sequence of aligned `(tileset, single)` region pairs.
///
/// Iteration is row-major over grid origins `stride - single_dim,
/// stride - single_dim + stride, ...` up to (excluding) the tileset extent
/// on each axis. Construct (or clone) a grid to enumerate from the start.
#[derive(Clone, Debug)]
pub struct WindowGrid {
    tileset_w: i64,
    tileset_h: i64,
    single_w: i64,
    single_h: i64,
    stride: i64,
    row: i64,
    col: i64,
}

impl WindowGrid {
    /// Creates a grid over the given tileset and single shapes.
    pub fn new(
        tileset_w: u32,
        tileset_h: u32,
        single_w: u32,
        single_h: u32,
        stride: u32,
    ) -> TileMatchResult<Self> {
        if tileset_w == 0 || tileset_h == 0 {
            return Err(TileMatchError::InvalidDimensions {
                width: tileset_w,
                height: tileset_h,
            });
        }
        if single_w == 0 || single_h == 0 {
            return Err(TileMatchError::InvalidDimensions {
                width: single_w,
                height: single_h,
            });
        }
        if stride == 0 {
            return Err(TileMatchError::InvalidConfig {
                reason: "stride must be at least 1",
            });
        }
        let stride = i64::from(stride);
        let single_w = i64::from(single_w);
        let single_h = i64::from(single_h);
        Ok(Self {
            tileset_w: i64::from(tileset_w),
            tileset_h: i64::from(tileset_h),
            single_w,
            single_h,
            stride,
            row: stride - single_h,
            col: stride - single_w,
        })
    }

    fn advance(&mut self) {
        self.col += self.stride;
        if self.col >= self.tileset_w {
            self.col = self.stride - self.single_w;
            self.row += self.stride;
        }
    }
}

impl Iterator for WindowGrid {
    type Item = (Region, Region);

    fn next(&mut self) -> Option<Self::Item> {
        while self.row < self.tileset_h {
            let (origin_y, origin_x) = (self.row, self.col);
            self.advance();

            let clipped_y = clip_axis(origin_y, self.single_h, self.tileset_h);
            let clipped_x = clip_axis(origin_x, self.single_w, self.tileset_w);
            if let (Some((ty, sy, height)), Some((tx, sx, width))) = (clipped_y, clipped_x) {
                let tileset_region = Region {
                    x: tx,
                    y: ty,
                    width,
                    height,
                };
                let single_region = Region {
                    x: sx,
                    y: sy,
                    width,
                    height,
                };
                return Some((tileset_region, single_region));
            }
        }
        None
    }
}
