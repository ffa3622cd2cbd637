use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tilematch::{
    candidate_pairs, load_catalog, AssetKind, Catalog, CollectionRules, Dispatcher,
    GenericCollection, IdAllocator, ModernExteriors, ModernInteriors, PairFilter, Region,
    SearchConfig, Tile, DEFAULT_CHUNK, DEFAULT_STRIDE, DEFAULT_THRESHOLD, DEFAULT_WORKERS,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find sprite singles inside tileset atlases")]
struct Cli {
    /// Asset pack directories to scan, one report per directory.
    #[arg(value_name = "DIR", required = true)]
    roots: Vec<PathBuf>,
    /// Collection profile applied to every root.
    #[arg(long, value_enum, default_value_t = Profile::Generic)]
    collection: Profile,
    /// Raw agreement a window must exceed to count as a match.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,
    /// Grid step between candidate window origins, in pixels.
    #[arg(long, default_value_t = DEFAULT_STRIDE)]
    stride: u32,
    /// Worker threads for the pair search.
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    workers: usize,
    /// Pairs handed to a worker at a time.
    #[arg(long, default_value_t = DEFAULT_CHUNK)]
    chunk: usize,
    /// Directory the JSON reports are written to.
    #[arg(long, value_name = "DIR", default_value = ".")]
    output: PathBuf,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Profile {
    /// Keyword classification only, every pair searched.
    Generic,
    /// Modern Exteriors pack layout.
    ModernExteriors,
    /// Modern Interiors pack layout.
    ModernInteriors,
}

#[derive(Debug, Serialize)]
struct RegionRecord(u32, u32, u32, u32);

impl From<Region> for RegionRecord {
    fn from(region: Region) -> Self {
        Self(region.x, region.y, region.width, region.height)
    }
}

/// One accepted match, serialized as `[[x,y,w,h],[x,y,w,h],confidence]`.
#[derive(Debug, Serialize)]
struct TileRecord(RegionRecord, RegionRecord, f32);

impl From<Tile> for TileRecord {
    fn from(tile: Tile) -> Self {
        Self(
            tile.tileset_region.into(),
            tile.single_region.into(),
            tile.confidence,
        )
    }
}

#[derive(Debug, Serialize)]
struct AssetRecord {
    kind: &'static str,
    path: String,
    tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shape: Option<(u32, u32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tilesets: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tiles: Option<BTreeMap<String, Vec<TileRecord>>>,
}

fn asset_records(catalog: &Catalog) -> BTreeMap<String, AssetRecord> {
    let mut records = BTreeMap::new();
    for single in catalog.singles() {
        let pixels = single.pixels();
        records.insert(
            single.id().to_string(),
            AssetRecord {
                kind: AssetKind::Single.as_str(),
                path: single.path().display().to_string(),
                tags: single.tags().to_vec(),
                shape: Some((pixels.width(), pixels.height())),
                tilesets: Some(single.tilesets().iter().map(|id| id.to_string()).collect()),
                tiles: None,
            },
        );
    }
    for tileset in catalog.tilesets() {
        let pixels = tileset.pixels();
        let tiles = tileset
            .tiles()
            .iter()
            .map(|(single_id, tiles)| {
                (
                    single_id.to_string(),
                    tiles.iter().copied().map(TileRecord::from).collect(),
                )
            })
            .collect();
        records.insert(
            tileset.id().to_string(),
            AssetRecord {
                kind: AssetKind::Tileset.as_str(),
                path: tileset.path().display().to_string(),
                tags: tileset.tags().to_vec(),
                shape: Some((pixels.width(), pixels.height())),
                tilesets: None,
                tiles: Some(tiles),
            },
        );
    }
    for plain in catalog.plain_assets() {
        records.insert(
            plain.id().to_string(),
            AssetRecord {
                kind: plain.kind().as_str(),
                path: plain.path().display().to_string(),
                tags: plain.tags().to_vec(),
                shape: None,
                tilesets: None,
                tiles: None,
            },
        );
    }
    records
}

fn process_root<P: CollectionRules + PairFilter>(
    profile: &P,
    root: &Path,
    dispatcher: &Dispatcher,
    ids: &mut IdAllocator,
) -> Result<BTreeMap<String, AssetRecord>, Box<dyn std::error::Error>> {
    let mut catalog = load_catalog(root, profile, ids)?;
    println!(
        "Loaded {} singles and {} tilesets from {}.",
        catalog.num_singles(),
        catalog.num_tilesets(),
        root.display()
    );

    let pairs = candidate_pairs(&catalog, profile);
    println!("Searching {} pairs...", pairs.len());
    let summary = dispatcher.run(&mut catalog, &pairs)?;
    println!("Found {} matches.", summary.tiles_found);
    tracing::info!(
        pairs = summary.pairs_searched,
        matched = summary.pairs_matched,
        tiles = summary.tiles_found,
        "run complete"
    );

    Ok(asset_records(&catalog))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("tilematch=info".parse()?))
            .with_target(false)
            .init();
    }

    let dispatcher = Dispatcher {
        workers: cli.workers,
        chunk: cli.chunk,
        config: SearchConfig {
            threshold: cli.threshold,
            stride: cli.stride,
        },
    };
    dispatcher.validate()?;

    fs::create_dir_all(&cli.output)?;
    let mut combined = BTreeMap::new();
    let mut ids = IdAllocator::new();
    for root in &cli.roots {
        let records = match cli.collection {
            Profile::Generic => process_root(&GenericCollection, root, &dispatcher, &mut ids)?,
            Profile::ModernExteriors => {
                process_root(&ModernExteriors, root, &dispatcher, &mut ids)?
            }
            Profile::ModernInteriors => {
                process_root(&ModernInteriors, root, &dispatcher, &mut ids)?
            }
        };
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("collection");
        fs::write(
            cli.output.join(format!("{name}.json")),
            serde_json::to_string(&records)?,
        )?;
        combined.extend(records);
    }

    fs::write(
        cli.output.join("data.json"),
        serde_json::to_string(&combined)?,
    )?;
    println!("Saved data.json.");
    Ok(())
}
