//! Error types for tilematch.

use crate::catalog::AssetId;
use crate::image::Region;
use thiserror::Error;

/// Result alias for tilematch operations.
pub type TileMatchResult<T> = std::result::Result<T, TileMatchError>;

/// Errors that can occur when building buffers, loading assets, or running
/// a matching pass.
#[derive(Debug, Error, PartialEq)]
pub enum TileMatchError {
    /// A buffer was created with a zero width or height.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },
    /// The pixel data length does not match the declared dimensions.
    #[error("buffer size mismatch: expected {expected} bytes, got {got}")]
    BufferSizeMismatch {
        /// Byte length implied by width, height, and 4 channels.
        expected: usize,
        /// Byte length actually supplied.
        got: usize,
    },
    /// A region does not lie within the buffer it is read from.
    #[error("region {region} out of bounds for {width}x{height} buffer")]
    RegionOutOfBounds {
        /// The offending region.
        region: Region,
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
    },
    /// A window pair reached the scorer with unequal shapes.
    #[error("window shape mismatch: tileset {tileset_region} vs single {single_region}")]
    ShapeMismatch {
        /// Tileset-side window.
        tileset_region: Region,
        /// Single-side window.
        single_region: Region,
    },
    /// A search or dispatcher parameter is outside its valid range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Which parameter was rejected and why.
        reason: &'static str,
    },
    /// A candidate pair referenced an identifier the catalog does not hold.
    #[error("unknown asset id {id}")]
    UnknownAsset {
        /// The identifier that failed to resolve.
        id: AssetId,
    },
    /// One pair's search failed; identifies the pair for diagnosis.
    #[error("search failed for tileset {tileset} / single {single}: {source}")]
    PairSearch {
        /// Tileset side of the failed pair.
        tileset: AssetId,
        /// Single side of the failed pair.
        single: AssetId,
        /// The underlying failure.
        #[source]
        source: Box<TileMatchError>,
    },
    /// The worker pool could not be constructed.
    #[error("worker pool: {reason}")]
    WorkerPool {
        /// Message from the pool builder.
        reason: String,
    },
    /// An asset file could not be read or decoded.
    #[cfg(feature = "image-io")]
    #[error("image io: {reason}")]
    ImageIo {
        /// Message from the decoder or filesystem.
        reason: String,
    },
}
