//! TileMatch locates sprite images inside composite tileset atlases by
//! exact masked pixel agreement on a fixed grid.
//!
//! Scoring and window enumeration are exhaustive and deterministic; a
//! dispatcher fans candidate pairs out over a fixed-size worker pool and
//! folds every result back into the catalog on the calling thread. Asset
//! decoding and directory loading are optional via the `image-io` feature,
//! instrumentation via the `tracing` feature.

pub mod catalog;
pub mod collections;
pub mod dispatch;
pub mod image;
#[cfg(feature = "image-io")]
pub mod loader;
pub mod pairing;
pub mod score;
pub mod search;
mod trace;
pub mod util;

pub use catalog::{AssetId, AssetKind, Catalog, IdAllocator, PlainAsset, Single, Tileset};
pub use collections::{
    classify, parse_tags, CollectionRules, GenericCollection, ModernExteriors, ModernInteriors,
};
pub use dispatch::{Dispatcher, RunSummary, DEFAULT_CHUNK, DEFAULT_WORKERS};
pub use image::{PixelBuffer, Region, ALPHA_OPAQUE, CHANNELS};
pub use pairing::{candidate_pairs, CandidatePair, PairFilter, TestAllPairs};
pub use score::masked_agreement;
pub use search::{find_tiles, SearchConfig, Tile, DEFAULT_STRIDE, DEFAULT_THRESHOLD};
pub use util::{TileMatchError, TileMatchResult};

#[cfg(feature = "image-io")]
pub use loader::load_catalog;
