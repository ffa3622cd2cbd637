use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tilematch::{find_tiles, PixelBuffer, Region, SearchConfig, TileMatchError};

fn patterned(width: u32, height: u32) -> PixelBuffer {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 13 + y * 7) as u8);
            data.push((x ^ y) as u8);
            data.push((x + 2 * y) as u8);
            data.push(255);
        }
    }
    PixelBuffer::from_rgba8(data, width, height).unwrap()
}

fn canvas(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        data.extend_from_slice(&rgba);
    }
    data
}

fn blit(data: &mut [u8], width: u32, src: &PixelBuffer, x0: u32, y0: u32) {
    for y in 0..src.height() {
        for x in 0..src.width() {
            let at = (((y0 + y) * width + (x0 + x)) * 4) as usize;
            data[at..at + 4].copy_from_slice(src.pixel(x, y).unwrap());
        }
    }
}

/// Flips the red channel of `count` pixels inside the copy at (16, 0).
fn corrupt_copy(data: &mut [u8], count: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for idx in index::sample(&mut rng, 256, count) {
        let x = 16 + (idx as u32 % 16);
        let y = idx as u32 / 16;
        let at = ((y * 32 + x) * 4) as usize;
        data[at] ^= 0x40;
    }
}

#[test]
fn exact_copy_yields_one_perfect_tile() {
    let single = patterned(16, 16);
    let mut data = canvas(32, 16, [1, 2, 3, 254]);
    blit(&mut data, 32, &single, 16, 0);
    let tileset = PixelBuffer::from_rgba8(data, 32, 16).unwrap();

    let tiles = find_tiles(&tileset, &single, &SearchConfig::default()).unwrap();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].tileset_region, Region::new(16, 0, 16, 16).unwrap());
    assert_eq!(tiles[0].single_region, Region::new(0, 0, 16, 16).unwrap());
    assert_eq!(tiles[0].confidence, 1.0);
}

#[test]
fn light_corruption_lowers_confidence_without_moving_the_match() {
    let single = patterned(16, 16);
    let mut data = canvas(32, 16, [1, 2, 3, 254]);
    blit(&mut data, 32, &single, 16, 0);
    // 13 of 256 pixels corrupted; the window still clears the threshold.
    corrupt_copy(&mut data, 13, 1742);
    let tileset = PixelBuffer::from_rgba8(data, 32, 16).unwrap();

    let tiles = find_tiles(&tileset, &single, &SearchConfig::default()).unwrap();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].tileset_region, Region::new(16, 0, 16, 16).unwrap());
    let expected = ((243.0f32 / 256.0) - 0.9) / (1.0 - 0.9);
    assert!((tiles[0].confidence - expected).abs() < 1e-6);
    assert!(tiles[0].confidence > 0.0 && tiles[0].confidence < 1.0);
}

#[test]
fn heavy_corruption_suppresses_the_match() {
    let single = patterned(16, 16);
    let mut data = canvas(32, 16, [1, 2, 3, 254]);
    blit(&mut data, 32, &single, 16, 0);
    // Ten percent corruption: 230/256 falls below the 0.9 threshold.
    corrupt_copy(&mut data, 26, 99);
    let tileset = PixelBuffer::from_rgba8(data, 32, 16).unwrap();

    let tiles = find_tiles(&tileset, &single, &SearchConfig::default()).unwrap();
    assert!(tiles.is_empty());
}

#[test]
fn transparent_single_never_matches() {
    let single = PixelBuffer::filled(16, 16, [9, 9, 9, 0]).unwrap();
    let tileset = patterned(32, 16);
    let tiles = find_tiles(&tileset, &single, &SearchConfig::default()).unwrap();
    assert!(tiles.is_empty());
}

#[test]
fn a_score_exactly_at_the_threshold_is_excluded() {
    let single = patterned(16, 16);
    // The only candidate window agrees on exactly half its pixels.
    let mut data = single.as_rgba8().to_vec();
    for idx in 128..256 {
        data[idx * 4] ^= 0xFF;
    }
    let tileset = PixelBuffer::from_rgba8(data, 16, 16).unwrap();

    let at = SearchConfig {
        threshold: 0.5,
        ..SearchConfig::default()
    };
    assert!(find_tiles(&tileset, &single, &at).unwrap().is_empty());

    let below = SearchConfig {
        threshold: 0.499,
        ..SearchConfig::default()
    };
    let tiles = find_tiles(&tileset, &single, &below).unwrap();
    assert_eq!(tiles.len(), 1);
    assert!(tiles[0].confidence > 0.0);
}

#[test]
fn an_overhanging_single_is_found_with_a_reduced_score() {
    // The tileset equals the right half of a 32-wide single, so the match
    // sits at origin -16 and half the denominator can never agree.
    let single = patterned(32, 16);
    let mut data = canvas(16, 16, [0, 0, 0, 254]);
    for y in 0..16 {
        for x in 0..16 {
            let at = ((y * 16 + x) * 4) as usize;
            data[at..at + 4].copy_from_slice(single.pixel(16 + x, y).unwrap());
        }
    }
    let tileset = PixelBuffer::from_rgba8(data, 16, 16).unwrap();

    let cfg = SearchConfig {
        threshold: 0.4,
        ..SearchConfig::default()
    };
    let tiles = find_tiles(&tileset, &single, &cfg).unwrap();
    assert_eq!(tiles.len(), 1);
    assert_eq!(tiles[0].tileset_region, Region::new(0, 0, 16, 16).unwrap());
    assert_eq!(tiles[0].single_region, Region::new(16, 0, 16, 16).unwrap());
    let expected = (0.5f32 - 0.4) / (1.0 - 0.4);
    assert!((tiles[0].confidence - expected).abs() < 1e-6);
}

#[test]
fn invalid_search_parameters_are_rejected() {
    let single = patterned(8, 8);
    let tileset = patterned(8, 8);
    for bad in [
        SearchConfig {
            threshold: 1.0,
            ..SearchConfig::default()
        },
        SearchConfig {
            threshold: -0.1,
            ..SearchConfig::default()
        },
        SearchConfig {
            threshold: f32::NAN,
            ..SearchConfig::default()
        },
        SearchConfig {
            stride: 0,
            ..SearchConfig::default()
        },
    ] {
        assert!(matches!(
            find_tiles(&tileset, &single, &bad),
            Err(TileMatchError::InvalidConfig { .. })
        ));
    }
}
