//! Candidate pair selection.
//!
//! The dispatcher searches whatever pair list it is given; which pairs are
//! worth searching is a policy question answered here. Collection profiles
//! implement [`PairFilter`] to prune pairs that cannot match (for example a
//! themed single against a tileset of a different theme).

use crate::catalog::{AssetId, Catalog, Single, Tileset};

/// Policy deciding whether a tileset/single pair is worth searching.
pub trait PairFilter {
    /// Returns `true` if the pair should be enqueued for matching.
    fn should_test(&self, tileset: &Tileset, single: &Single) -> bool;
}

/// Admits every pair; the cross product of the whole catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestAllPairs;

impl PairFilter for TestAllPairs {
    fn should_test(&self, _tileset: &Tileset, _single: &Single) -> bool {
        true
    }
}

/// One unit of dispatcher work, referencing catalog assets by id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidatePair {
    pub tileset: AssetId,
    pub single: AssetId,
}

/// Enumerates the filtered cross product of tilesets and singles.
///
/// Pairs are produced tileset-major in id order, so the work list (and with
/// it the aggregated output) is deterministic for a given catalog.
pub fn candidate_pairs(catalog: &Catalog, filter: &dyn PairFilter) -> Vec<CandidatePair> {
    let mut pairs = Vec::new();
    for tileset in catalog.tilesets() {
        for single in catalog.singles() {
            if filter.should_test(tileset, single) {
                pairs.push(CandidatePair {
                    tileset: tileset.id(),
                    single: single.id(),
                });
            }
        }
    }
    pairs
}
