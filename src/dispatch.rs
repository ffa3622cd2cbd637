//! Parallel search dispatch and result aggregation.
//!
//! A [`Dispatcher`] runs [`find_tiles`] over a list of candidate pairs on a
//! dedicated thread pool. Workers only read pixel buffers (shared behind
//! `Arc`) and send per-pair outcomes over a channel; the calling thread is
//! the single consumer and performs all catalog mutation. Outcomes arrive in
//! nondeterministic order, which is safe because aggregation only touches
//! the two assets named by the pair and is commutative across pairs.

use crate::catalog::Catalog;
use crate::image::PixelBuffer;
use crate::pairing::CandidatePair;
use crate::search::{find_tiles, SearchConfig, Tile};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{TileMatchError, TileMatchResult};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

/// Default worker thread count.
pub const DEFAULT_WORKERS: usize = 12;

/// Default number of pairs handed to a worker at a time.
pub const DEFAULT_CHUNK: usize = 32;

/// Configuration for one parallel matching run.
#[derive(Clone, Copy, Debug)]
pub struct Dispatcher {
    /// Worker thread count (at least 1).
    pub workers: usize,
    /// Pairs per worker task (at least 1). Larger chunks amortize scheduling
    /// overhead; the result is identical for any chunk size.
    pub chunk: usize,
    /// Search parameters applied to every pair.
    pub config: SearchConfig,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            chunk: DEFAULT_CHUNK,
            config: SearchConfig::default(),
        }
    }
}

/// Counters describing a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Pairs searched to completion.
    pub pairs_searched: usize,
    /// Pairs that produced at least one tile.
    pub pairs_matched: usize,
    /// Total accepted tiles across all pairs.
    pub tiles_found: usize,
}

/// A resolved unit of work: pair identifiers plus shared buffers.
struct PairTask {
    pair: CandidatePair,
    tileset: Arc<PixelBuffer>,
    single: Arc<PixelBuffer>,
}

impl Dispatcher {
    /// Checks worker count, chunk size and the embedded search config.
    pub fn validate(&self) -> TileMatchResult<()> {
        if self.workers == 0 {
            return Err(TileMatchError::InvalidConfig {
                reason: "worker count must be at least 1",
            });
        }
        if self.chunk == 0 {
            return Err(TileMatchError::InvalidConfig {
                reason: "chunk size must be at least 1",
            });
        }
        self.config.validate()
    }

    /// Searches every candidate pair and folds the results into `catalog`.
    ///
    /// Buffers are resolved up front, so a pair naming an id the catalog
    /// does not hold fails with [`TileMatchError::UnknownAsset`] before any
    /// search starts. A worker failure poisons the run: remaining queued
    /// pairs drain as no-ops, the result channel is drained fully, and the
    /// first received error is returned wrapped as
    /// [`TileMatchError::PairSearch`]. Aggregation applied before the
    /// failure surfaced is left in place, so a catalog from a failed run
    /// must be discarded.
    pub fn run(
        &self,
        catalog: &mut Catalog,
        pairs: &[CandidatePair],
    ) -> TileMatchResult<RunSummary> {
        self.validate()?;
        if pairs.is_empty() {
            return Ok(RunSummary::default());
        }

        let _span =
            trace_span!("dispatch_run", pairs = pairs.len(), workers = self.workers).entered();

        let mut tasks = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let tileset = catalog
                .tileset(pair.tileset)
                .ok_or(TileMatchError::UnknownAsset { id: pair.tileset })?;
            let single = catalog
                .single(pair.single)
                .ok_or(TileMatchError::UnknownAsset { id: pair.single })?;
            tasks.push(PairTask {
                pair: *pair,
                tileset: tileset.share_pixels(),
                single: single.share_pixels(),
            });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|err| TileMatchError::WorkerPool {
                reason: err.to_string(),
            })?;

        let (tx, rx) = mpsc::channel::<(CandidatePair, TileMatchResult<Vec<Tile>>)>();
        let poisoned = Arc::new(AtomicBool::new(false));

        let config = self.config;
        let chunk = self.chunk;
        let flag = Arc::clone(&poisoned);
        pool.spawn(move || {
            tasks.par_chunks(chunk).for_each_with(tx, |tx, chunk_tasks| {
                for task in chunk_tasks {
                    if flag.load(Ordering::Relaxed) {
                        return;
                    }
                    let outcome = find_tiles(&task.tileset, &task.single, &config).map_err(
                        |source| TileMatchError::PairSearch {
                            tileset: task.pair.tileset,
                            single: task.pair.single,
                            source: Box::new(source),
                        },
                    );
                    if outcome.is_err() {
                        flag.store(true, Ordering::Relaxed);
                    }
                    if tx.send((task.pair, outcome)).is_err() {
                        return;
                    }
                }
            });
        });

        // Receiving until the channel closes drains every outcome, so the
        // pool is idle before this function returns even on failure.
        let mut summary = RunSummary::default();
        let mut first_error = None;
        for (pair, outcome) in rx {
            match outcome {
                Ok(tiles) => {
                    summary.pairs_searched += 1;
                    if !tiles.is_empty() {
                        summary.pairs_matched += 1;
                        summary.tiles_found += tiles.len();
                        trace_debug!("pair_matched", tiles = tiles.len());
                        record_match(catalog, pair, tiles);
                    }
                }
                Err(err) => {
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }
        trace_event!(
            "dispatch_done",
            pairs_searched = summary.pairs_searched,
            pairs_matched = summary.pairs_matched,
            tiles_found = summary.tiles_found,
        );
        Ok(summary)
    }
}

fn record_match(catalog: &mut Catalog, pair: CandidatePair, tiles: Vec<Tile>) {
    catalog
        .single_mut(pair.single)
        .expect("pair ids resolved before dispatch")
        .add_tileset(pair.tileset);
    catalog
        .tileset_mut(pair.tileset)
        .expect("pair ids resolved before dispatch")
        .add_tiles(pair.single, tiles);
}
