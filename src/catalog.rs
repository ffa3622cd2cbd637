//! Tagged assets and the catalog that owns them.
//!
//! A catalog is built once by a loading collaborator and then handed to the
//! dispatcher: pixel buffers stay read-only for the whole run (shared with
//! workers behind `Arc`), while the association state — which tilesets a
//! single was found in, and which tiles a tileset holds per single — is
//! mutated only by the dispatcher's aggregation step.

use crate::image::PixelBuffer;
use crate::search::Tile;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Stable process-lifetime identifier for one loaded asset.
///
/// Displayed as `#<n>`, the key format of the serialized output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId(u32);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic identifier allocator owned by the loading collaborator.
///
/// The engine never allocates identifiers and never consults process-wide
/// state; a run's identifiers are unique exactly when all of its assets were
/// numbered by the same allocator.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Creates an allocator starting at `#0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh identifier.
    pub fn allocate(&mut self) -> AssetId {
        let id = AssetId(self.next);
        self.next += 1;
        id
    }
}

/// Classification of a loaded asset file.
///
/// Only `Single` and `Tileset` carry pixel data into the matching engine;
/// character sheets and animations are catalogued for reporting and never
/// reach a worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// An individually tagged sprite expected to appear inside tilesets.
    Single,
    /// A composite atlas potentially containing many singles.
    Tileset,
    /// A character sheet; recognized but not matched.
    Character,
    /// An animation strip; recognized but not matched.
    Animation,
}

impl AssetKind {
    /// Returns the lowercase kind name used in tags and serialized output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Single => "single",
            AssetKind::Tileset => "tileset",
            AssetKind::Character => "character",
            AssetKind::Animation => "animation",
        }
    }
}

/// A sprite image with the tilesets it has been matched into.
#[derive(Debug)]
pub struct Single {
    id: AssetId,
    path: PathBuf,
    tags: Vec<String>,
    pixels: Arc<PixelBuffer>,
    tilesets: BTreeSet<AssetId>,
}

impl Single {
    /// Creates a single from a decoded buffer.
    pub fn new(
        id: AssetId,
        path: impl Into<PathBuf>,
        tags: Vec<String>,
        pixels: PixelBuffer,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            tags,
            pixels: Arc::new(pixels),
            tilesets: BTreeSet::new(),
        }
    }

    /// Returns the identifier assigned at load time.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the descriptive tags (unused by the engine).
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the pixel buffer.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Returns the identifiers of the tilesets this single was found in.
    pub fn tilesets(&self) -> &BTreeSet<AssetId> {
        &self.tilesets
    }

    pub(crate) fn share_pixels(&self) -> Arc<PixelBuffer> {
        Arc::clone(&self.pixels)
    }

    pub(crate) fn add_tileset(&mut self, tileset: AssetId) {
        self.tilesets.insert(tileset);
    }
}

/// An atlas image with the tiles found in it, grouped per single.
#[derive(Debug)]
pub struct Tileset {
    id: AssetId,
    path: PathBuf,
    tags: Vec<String>,
    pixels: Arc<PixelBuffer>,
    tiles: BTreeMap<AssetId, Vec<Tile>>,
}

impl Tileset {
    /// Creates a tileset from a decoded buffer.
    pub fn new(
        id: AssetId,
        path: impl Into<PathBuf>,
        tags: Vec<String>,
        pixels: PixelBuffer,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            tags,
            pixels: Arc::new(pixels),
            tiles: BTreeMap::new(),
        }
    }

    /// Returns the identifier assigned at load time.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the descriptive tags (unused by the engine).
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns the pixel buffer.
    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    /// Returns the accepted tiles per single, in enumeration order.
    pub fn tiles(&self) -> &BTreeMap<AssetId, Vec<Tile>> {
        &self.tiles
    }

    pub(crate) fn share_pixels(&self) -> Arc<PixelBuffer> {
        Arc::clone(&self.pixels)
    }

    pub(crate) fn add_tiles(&mut self, single: AssetId, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.entry(single).or_default().extend(tiles);
    }
}

/// An asset recognized by classification but never matched: character
/// sheets and animation strips, carried for reporting only.
#[derive(Debug)]
pub struct PlainAsset {
    id: AssetId,
    kind: AssetKind,
    path: PathBuf,
    tags: Vec<String>,
}

impl PlainAsset {
    /// Creates a pixel-less catalog entry.
    pub fn new(id: AssetId, kind: AssetKind, path: impl Into<PathBuf>, tags: Vec<String>) -> Self {
        debug_assert!(
            matches!(kind, AssetKind::Character | AssetKind::Animation),
            "pixel-backed kinds belong in Single or Tileset"
        );
        Self {
            id,
            kind,
            path: path.into(),
            tags,
        }
    }

    /// Returns the identifier assigned at load time.
    pub fn id(&self) -> AssetId {
        self.id
    }

    /// Returns the classified kind.
    pub fn kind(&self) -> AssetKind {
        self.kind
    }

    /// Returns the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the descriptive tags.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Owns every loaded asset of one run, keyed by identifier.
///
/// `BTreeMap` keys keep iteration (and therefore serialized output)
/// deterministic.
#[derive(Debug, Default)]
pub struct Catalog {
    singles: BTreeMap<AssetId, Single>,
    tilesets: BTreeMap<AssetId, Tileset>,
    plain: BTreeMap<AssetId, PlainAsset>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single; an existing asset under the same id is replaced.
    pub fn insert_single(&mut self, single: Single) {
        self.singles.insert(single.id(), single);
    }

    /// Adds a tileset; an existing asset under the same id is replaced.
    pub fn insert_tileset(&mut self, tileset: Tileset) {
        self.tilesets.insert(tileset.id(), tileset);
    }

    /// Adds a character or animation entry.
    pub fn insert_plain(&mut self, asset: PlainAsset) {
        self.plain.insert(asset.id(), asset);
    }

    /// Looks up a single by id.
    pub fn single(&self, id: AssetId) -> Option<&Single> {
        self.singles.get(&id)
    }

    /// Looks up a tileset by id.
    pub fn tileset(&self, id: AssetId) -> Option<&Tileset> {
        self.tilesets.get(&id)
    }

    pub(crate) fn single_mut(&mut self, id: AssetId) -> Option<&mut Single> {
        self.singles.get_mut(&id)
    }

    pub(crate) fn tileset_mut(&mut self, id: AssetId) -> Option<&mut Tileset> {
        self.tilesets.get_mut(&id)
    }

    /// Iterates singles in id order.
    pub fn singles(&self) -> impl Iterator<Item = &Single> {
        self.singles.values()
    }

    /// Iterates tilesets in id order.
    pub fn tilesets(&self) -> impl Iterator<Item = &Tileset> {
        self.tilesets.values()
    }

    /// Iterates character/animation entries in id order.
    pub fn plain_assets(&self) -> impl Iterator<Item = &PlainAsset> {
        self.plain.values()
    }

    /// Returns the number of singles.
    pub fn num_singles(&self) -> usize {
        self.singles.len()
    }

    /// Returns the number of tilesets.
    pub fn num_tilesets(&self) -> usize {
        self.tilesets.len()
    }
}
