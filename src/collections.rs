//! Asset-collection profiles: path classification, tag extraction, and
//! pair pruning.
//!
//! Everything here is pure string logic over file paths. A
//! [`CollectionRules`] object decides which files enter the catalog and what
//! kind they are; the same profile implements [`PairFilter`] to skip
//! tileset/single pairs whose names prove they belong to different themes.
//! Filters are strictly an optimization: a profile that admits every pair
//! produces the same matches, just slower.

use crate::catalog::{AssetKind, Single, Tileset};
use crate::pairing::PairFilter;
use std::ffi::OsStr;
use std::path::Path;

/// Extensions (lowercase, without dot) accepted as image assets.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// Words too generic to be useful as tags.
const EXCLUDED_TAGS: &[&str] = &[
    "modernexteriors",
    "moderninteriors",
    "modern",
    "sorter",
    "complete",
    "animated",
    "animation",
    "single",
    "tileset",
    "character",
    "gifs",
    "16x16",
    "32x32",
    "48x48",
    "and",
    "the",
    "win",
];

/// Classifies a path by its extension and name keywords.
///
/// Returns `None` for non-image files and for known duplicate scales
/// (`32x32`/`48x48` re-exports of the 16x16 art) and palette swatches.
/// Keyword checks run on the lowercased path, most specific first:
/// `animated`/`animation` names are kept only as `.gif` (sheet exports of
/// the same frames are skipped), then `character`, then `single`; anything
/// left is a tileset.
pub fn classify(path: &Path) -> Option<AssetKind> {
    let ext = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)?;
    if !IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    let lower = path.to_string_lossy().to_lowercase();
    if lower.contains("palette") {
        return None;
    }
    if lower.contains("32x32") || lower.contains("48x48") {
        return None;
    }
    if lower.contains("animated") || lower.contains("animation") {
        if ext != "gif" {
            return None;
        }
        return Some(AssetKind::Animation);
    }
    if lower.contains("character") {
        return Some(AssetKind::Character);
    }
    if lower.contains("single") {
        return Some(AssetKind::Single);
    }
    Some(AssetKind::Tileset)
}

/// Derives descriptive tags from a path.
///
/// The extension-stripped path is lowercased and split on non-alphanumeric
/// runs; words survive if they are longer than two characters, not pure
/// digits, not already collected, and not in the stop list. The plural kind
/// name seeds the list, and the result is reversed so the most specific
/// words (the file name's own) come first.
pub fn parse_tags(path: &Path, kind: AssetKind) -> Vec<String> {
    let stem = path.with_extension("");
    let stem = stem.to_string_lossy().to_lowercase();
    let mut tags = vec![format!("{}s", kind.as_str())];
    for word in stem.split(|c: char| !c.is_ascii_alphanumeric()) {
        if word.len() > 2
            && !word.bytes().all(|b| b.is_ascii_digit())
            && !tags.iter().any(|t| t == word)
            && !EXCLUDED_TAGS.contains(&word)
        {
            tags.push(word.to_string());
        }
    }
    tags.reverse();
    tags
}

/// Per-collection knowledge about which files and pairs are worth the time.
///
/// Profiles override [`admits`](CollectionRules::admits) to drop paths the
/// collection is known to duplicate elsewhere; classification itself is the
/// shared [`classify`] logic.
pub trait CollectionRules {
    /// Returns `false` for paths the collection excludes outright.
    fn admits(&self, path: &Path) -> bool {
        let _ = path;
        true
    }

    /// Classifies one file, or `None` to skip it.
    fn classify(&self, path: &Path) -> Option<AssetKind> {
        if self.admits(path) {
            classify(path)
        } else {
            None
        }
    }
}

/// Default profile: generic classification, every pair searched.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericCollection;

impl CollectionRules for GenericCollection {}

impl PairFilter for GenericCollection {
    fn should_test(&self, _tileset: &Tileset, _single: &Single) -> bool {
        true
    }
}

/// Profile for the Modern Exteriors asset pack.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModernExteriors;

impl CollectionRules for ModernExteriors {
    fn admits(&self, path: &Path) -> bool {
        let lower = path.to_string_lossy().to_lowercase();
        // old_sorting holds superseded tilesets; complete_singles duplicates
        // the theme-sorter singles.
        !lower.contains("old_sorting") && !lower.contains("complete_singles")
    }
}

impl PairFilter for ModernExteriors {
    fn should_test(&self, tileset: &Tileset, single: &Single) -> bool {
        let tileset_lower = tileset.path().to_string_lossy().to_lowercase();
        let single_lower = single.path().to_string_lossy().to_lowercase();
        if !(tileset_lower.contains("theme_sorter") && single_lower.contains("singles")) {
            return true;
        }
        // Singles directories carry one extra trailing word next to the
        // tileset file name, e.g. 5_Beach_Theme_Singles_16x16 next to
        // 5_Beach_Theme_16x16.png.
        let mut single_theme = theme_words(parent_name(single.path()));
        single_theme.pop();
        single_theme == theme_words(file_name(tileset.path()))
    }
}

/// Profile for the Modern Interiors asset pack.
#[derive(Clone, Copy, Debug, Default)]
pub struct ModernInteriors;

impl CollectionRules for ModernInteriors {
    fn admits(&self, path: &Path) -> bool {
        let lower = path.to_string_lossy().to_lowercase();
        // old stuff holds superseded tilesets; black_shadow and shadowless
        // duplicate the normal tiles; user_interface and home_designs are
        // not tile art; room_builder_subfiles are not singles.
        !(lower.contains("old stuff")
            || lower.contains("black_shadow")
            || lower.contains("shadowless")
            || lower.contains("user_interface")
            || lower.contains("home_designs")
            || lower.contains("room_builder_subfiles"))
    }
}

impl PairFilter for ModernInteriors {
    fn should_test(&self, tileset: &Tileset, single: &Single) -> bool {
        let tileset_lower = tileset.path().to_string_lossy().to_lowercase();
        let single_lower = single.path().to_string_lossy().to_lowercase();
        if !(tileset_lower.contains("theme_sorter")
            && single_lower.contains("theme_sorter_singles"))
        {
            return true;
        }
        theme_words(parent_name(single.path())) == theme_words(file_name(tileset.path()))
    }
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(OsStr::to_str).unwrap_or("")
}

fn parent_name(path: &Path) -> &str {
    path.parent()
        .and_then(Path::file_name)
        .and_then(OsStr::to_str)
        .unwrap_or("")
}

/// Splits `name` on underscores and returns everything between the leading
/// ordinal and the trailing scale suffix. Names with fewer than two parts
/// have no theme.
fn theme_words(name: &str) -> Vec<&str> {
    let parts: Vec<&str> = name.split('_').collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1].to_vec()
}
