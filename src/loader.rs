//! Filesystem loading: asset directory scan to [`Catalog`].
//!
//! Available with the `image-io` feature. Files are visited in sorted order
//! so identifier assignment, and with it every downstream artifact, is
//! reproducible for a given tree.

use crate::catalog::{AssetKind, Catalog, IdAllocator, PlainAsset, Single, Tileset};
use crate::collections::{parse_tags, CollectionRules};
use crate::image::io::load_rgba_image;
use crate::trace::trace_event;
use crate::util::{TileMatchError, TileMatchResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Scans `root` recursively and builds a catalog.
///
/// Each file is classified by `rules`; skipped files consume no identifier.
/// Singles and tilesets are decoded to RGBA8 on the spot, characters and
/// animations enter as pixel-less records. An unreadable directory or a
/// failing decode aborts the load with
/// [`ImageIo`](TileMatchError::ImageIo).
pub fn load_catalog(
    root: &Path,
    rules: &dyn CollectionRules,
    ids: &mut IdAllocator,
) -> TileMatchResult<Catalog> {
    let mut files = Vec::new();
    collect_files(root, &mut files)?;

    let mut catalog = Catalog::new();
    for path in files {
        let kind = match rules.classify(&path) {
            Some(kind) => kind,
            None => continue,
        };
        let tags = parse_tags(&path, kind);
        let id = ids.allocate();
        match kind {
            AssetKind::Single => {
                let pixels = load_rgba_image(&path)?;
                catalog.insert_single(Single::new(id, path, tags, pixels));
            }
            AssetKind::Tileset => {
                let pixels = load_rgba_image(&path)?;
                catalog.insert_tileset(Tileset::new(id, path, tags, pixels));
            }
            AssetKind::Character | AssetKind::Animation => {
                catalog.insert_plain(PlainAsset::new(id, kind, path, tags));
            }
        }
    }
    trace_event!(
        "catalog_loaded",
        singles = catalog.num_singles(),
        tilesets = catalog.num_tilesets(),
    );
    Ok(catalog)
}

/// Depth-first walk with each directory's entries sorted by path.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> TileMatchResult<()> {
    let read = fs::read_dir(dir).map_err(|err| TileMatchError::ImageIo {
        reason: format!("{}: {err}", dir.display()),
    })?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|err| TileMatchError::ImageIo {
            reason: format!("{}: {err}", dir.display()),
        })?;
        entries.push(entry.path());
    }
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
