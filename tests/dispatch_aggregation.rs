use tilematch::{
    candidate_pairs, find_tiles, CandidatePair, Catalog, Dispatcher, IdAllocator, PixelBuffer,
    Region, RunSummary, SearchConfig, Single, TestAllPairs, TileMatchError, Tileset,
};

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
    PixelBuffer::filled(width, height, rgba).unwrap()
}

/// A tileset whose left half is red and right half blue, plus a red single
/// and a blue single that each match exactly one half.
fn two_singles_catalog() -> (Catalog, CandidatePair, CandidatePair) {
    let red = [200, 30, 30, 255];
    let blue = [30, 30, 200, 255];
    let mut data = Vec::new();
    for _y in 0..16 {
        for x in 0..32 {
            data.extend_from_slice(if x < 16 { &red } else { &blue });
        }
    }

    let mut ids = IdAllocator::new();
    let mut catalog = Catalog::new();
    let tileset = ids.allocate();
    let red_single = ids.allocate();
    let blue_single = ids.allocate();
    catalog.insert_tileset(Tileset::new(
        tileset,
        "pack/atlas.png",
        vec![],
        PixelBuffer::from_rgba8(data, 32, 16).unwrap(),
    ));
    catalog.insert_single(Single::new(
        red_single,
        "pack/red_single.png",
        vec![],
        solid(16, 16, red),
    ));
    catalog.insert_single(Single::new(
        blue_single,
        "pack/blue_single.png",
        vec![],
        solid(16, 16, blue),
    ));
    (
        catalog,
        CandidatePair {
            tileset,
            single: red_single,
        },
        CandidatePair {
            tileset,
            single: blue_single,
        },
    )
}

#[test]
fn two_singles_fold_into_independent_entries() {
    let (mut catalog, red_pair, blue_pair) = two_singles_catalog();
    let summary = Dispatcher::default()
        .run(&mut catalog, &[red_pair, blue_pair])
        .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            pairs_searched: 2,
            pairs_matched: 2,
            tiles_found: 2,
        }
    );

    let tileset = catalog.tileset(red_pair.tileset).unwrap();
    let red_tiles = &tileset.tiles()[&red_pair.single];
    assert_eq!(red_tiles.len(), 1);
    assert_eq!(red_tiles[0].tileset_region, Region::new(0, 0, 16, 16).unwrap());
    assert_eq!(red_tiles[0].confidence, 1.0);

    let blue_tiles = &tileset.tiles()[&blue_pair.single];
    assert_eq!(blue_tiles.len(), 1);
    assert_eq!(
        blue_tiles[0].tileset_region,
        Region::new(16, 0, 16, 16).unwrap()
    );

    let red = catalog.single(red_pair.single).unwrap();
    let blue = catalog.single(blue_pair.single).unwrap();
    assert!(red.tilesets().contains(&red_pair.tileset));
    assert!(blue.tilesets().contains(&blue_pair.tileset));
}

#[test]
fn pair_order_does_not_change_the_outcome() {
    let (mut forward, red_pair, blue_pair) = two_singles_catalog();
    let (mut reverse, _, _) = two_singles_catalog();

    let a = Dispatcher::default()
        .run(&mut forward, &[red_pair, blue_pair])
        .unwrap();
    let b = Dispatcher::default()
        .run(&mut reverse, &[blue_pair, red_pair])
        .unwrap();

    assert_eq!(a, b);
    assert_eq!(
        forward.tileset(red_pair.tileset).unwrap().tiles(),
        reverse.tileset(red_pair.tileset).unwrap().tiles()
    );
    assert_eq!(
        forward.single(red_pair.single).unwrap().tilesets(),
        reverse.single(red_pair.single).unwrap().tilesets()
    );
}

#[test]
fn worker_and_chunk_counts_do_not_change_the_outcome() {
    let (mut serial, red_pair, blue_pair) = two_singles_catalog();
    let (mut parallel, _, _) = two_singles_catalog();
    let pairs = [red_pair, blue_pair];

    let a = Dispatcher {
        workers: 1,
        chunk: 1,
        ..Dispatcher::default()
    }
    .run(&mut serial, &pairs)
    .unwrap();
    let b = Dispatcher {
        workers: 4,
        chunk: 2,
        ..Dispatcher::default()
    }
    .run(&mut parallel, &pairs)
    .unwrap();

    assert_eq!(a, b);
    assert_eq!(
        serial.tileset(red_pair.tileset).unwrap().tiles(),
        parallel.tileset(red_pair.tileset).unwrap().tiles()
    );
}

#[test]
fn matching_agrees_with_a_direct_search() {
    let (mut catalog, red_pair, _) = two_singles_catalog();
    let direct = find_tiles(
        catalog.tileset(red_pair.tileset).unwrap().pixels(),
        catalog.single(red_pair.single).unwrap().pixels(),
        &SearchConfig::default(),
    )
    .unwrap();

    Dispatcher::default().run(&mut catalog, &[red_pair]).unwrap();
    assert_eq!(
        catalog.tileset(red_pair.tileset).unwrap().tiles()[&red_pair.single],
        direct
    );
}

#[test]
fn a_single_collects_every_tileset_it_appears_in() {
    let color = [77, 10, 10, 255];
    let mut ids = IdAllocator::new();
    let mut catalog = Catalog::new();
    let first = ids.allocate();
    let second = ids.allocate();
    let single = ids.allocate();
    catalog.insert_tileset(Tileset::new(first, "a.png", vec![], solid(16, 16, color)));
    catalog.insert_tileset(Tileset::new(second, "b.png", vec![], solid(16, 16, color)));
    catalog.insert_single(Single::new(
        single,
        "c_single.png",
        vec![],
        solid(16, 16, color),
    ));

    let pairs = [
        CandidatePair {
            tileset: first,
            single,
        },
        CandidatePair {
            tileset: second,
            single,
        },
    ];
    Dispatcher::default().run(&mut catalog, &pairs).unwrap();

    let found = catalog.single(single).unwrap();
    assert_eq!(found.tilesets().len(), 2);
    assert!(found.tilesets().contains(&first));
    assert!(found.tilesets().contains(&second));
}

#[test]
fn unmatched_pairs_leave_no_associations() {
    let mut ids = IdAllocator::new();
    let mut catalog = Catalog::new();
    let tileset = ids.allocate();
    let single = ids.allocate();
    catalog.insert_tileset(Tileset::new(
        tileset,
        "t.png",
        vec![],
        solid(32, 16, [5, 5, 5, 255]),
    ));
    catalog.insert_single(Single::new(
        single,
        "s_single.png",
        vec![],
        solid(16, 16, [9, 9, 9, 255]),
    ));

    let summary = Dispatcher::default()
        .run(&mut catalog, &[CandidatePair { tileset, single }])
        .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            pairs_searched: 1,
            pairs_matched: 0,
            tiles_found: 0,
        }
    );
    assert!(catalog.tileset(tileset).unwrap().tiles().is_empty());
    assert!(catalog.single(single).unwrap().tilesets().is_empty());
}

#[test]
fn empty_pair_lists_are_a_no_op() {
    let (mut catalog, _, _) = two_singles_catalog();
    let summary = Dispatcher::default().run(&mut catalog, &[]).unwrap();
    assert_eq!(summary, RunSummary::default());
}

#[test]
fn stale_identifiers_fail_before_any_search() {
    let (mut catalog, red_pair, _) = two_singles_catalog();
    let mut other = IdAllocator::new();
    for _ in 0..5 {
        other.allocate();
    }
    let stale = other.allocate();

    let err = Dispatcher::default()
        .run(
            &mut catalog,
            &[CandidatePair {
                tileset: red_pair.tileset,
                single: stale,
            }],
        )
        .unwrap_err();

    assert_eq!(err, TileMatchError::UnknownAsset { id: stale });
    assert!(catalog.tileset(red_pair.tileset).unwrap().tiles().is_empty());
}

#[test]
fn invalid_dispatcher_parameters_are_rejected() {
    let (mut catalog, red_pair, blue_pair) = two_singles_catalog();
    let pairs = [red_pair, blue_pair];

    let err = Dispatcher {
        workers: 0,
        ..Dispatcher::default()
    }
    .run(&mut catalog, &pairs)
    .unwrap_err();
    assert!(matches!(err, TileMatchError::InvalidConfig { .. }));

    let err = Dispatcher {
        chunk: 0,
        ..Dispatcher::default()
    }
    .run(&mut catalog, &pairs)
    .unwrap_err();
    assert!(matches!(err, TileMatchError::InvalidConfig { .. }));

    let err = Dispatcher {
        config: SearchConfig {
            threshold: 1.5,
            ..SearchConfig::default()
        },
        ..Dispatcher::default()
    }
    .run(&mut catalog, &pairs)
    .unwrap_err();
    assert!(matches!(err, TileMatchError::InvalidConfig { .. }));
}

#[test]
fn filtered_cross_product_feeds_the_dispatcher() {
    let (mut catalog, red_pair, blue_pair) = two_singles_catalog();
    let pairs = candidate_pairs(&catalog, &TestAllPairs);
    assert_eq!(pairs, vec![red_pair, blue_pair]);

    let summary = Dispatcher::default().run(&mut catalog, &pairs).unwrap();
    assert_eq!(summary.pairs_searched, 2);
}
