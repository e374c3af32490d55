//! # World Generation Tests
//!
//! End-to-end checks across noise, biomes, columns and generators: a world
//! built from configuration must be reproducible, stay inside its height
//! band and line up across chunk borders.

use terrane_procedural::{
    BiomeClassifier, BiomeType, ChunkCoord, ChunkGenerator, ColumnGenerator, GeneratorConfig,
    GeneratorRegistry, PerlinNoise, Voxel, WorldGenerator, WorldSeed, CHUNK_SIZE,
};

/// Test: Configuration text drives the whole pipeline.
#[test]
fn test_config_to_chunk_pipeline() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        seed = 2024
        generator = "terrain3d"

        [features]
        vegetation = false
        "#,
    )
    .unwrap();

    let registry = GeneratorRegistry::with_builtins();
    let generator = registry.create_from_config(&config).unwrap();
    let chunk = generator.generate(ChunkCoord::new(-2, 5)).unwrap();

    for z in 0..CHUNK_SIZE {
        for x in 0..CHUNK_SIZE {
            let wx = -32 + x as i32;
            let wz = 80 + z as i32;
            let h = generator.height_at(wx, wz);
            assert!((40..=80).contains(&h));
            assert!(chunk.get(x, h as usize, z).unwrap().is_solid());
        }
    }
    assert!(chunk
        .voxels()
        .iter()
        .all(|v| !matches!(v, Voxel::Wood | Voxel::Leaves)));
}

/// Test: Independent generators agree bit for bit.
#[test]
fn test_independent_generators_agree() {
    let seed = WorldSeed::new(987_654_321);
    let a = ChunkGenerator::new(seed);
    let b = ChunkGenerator::new(seed);

    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-7, 3), ChunkCoord::new(100, -100)] {
        assert_eq!(
            a.generate(coord).unwrap().voxels(),
            b.generate(coord).unwrap().voxels()
        );
    }

    let na = PerlinNoise::new(seed);
    let nb = PerlinNoise::new(seed);
    for i in 0..100 {
        let x = f64::from(i) * 0.37;
        assert_eq!(na.perlin_2d(x, -x).to_bits(), nb.perlin_2d(x, -x).to_bits());
        assert_eq!(
            na.perlin_3d(x, 1.5, x).to_bits(),
            nb.perlin_3d(x, 1.5, x).to_bits()
        );
    }
}

/// Test: Heights stay in band over a wide area.
#[test]
fn test_heights_stay_in_band() {
    let columns = ColumnGenerator::with_defaults(WorldSeed::new(42));
    let mut lowest = i32::MAX;
    let mut highest = i32::MIN;

    for z in (-2000..2000).step_by(37) {
        for x in (-2000..2000).step_by(37) {
            let h = columns.height_at(x, z);
            assert!((40..=80).contains(&h), "height {h} at ({x}, {z})");
            lowest = lowest.min(h);
            highest = highest.max(h);
        }
    }

    // The field actually varies
    assert!(highest - lowest > 5, "flat world: {lowest}..{highest}");
}

/// Test: Terrain is continuous across chunk borders.
#[test]
fn test_chunk_borders_line_up() {
    let generator = ChunkGenerator::new(WorldSeed::new(42));
    let west = generator.generate(ChunkCoord::new(0, 0)).unwrap();
    let east = generator.generate(ChunkCoord::new(1, 0)).unwrap();

    for z in 0..CHUNK_SIZE {
        let h_west = generator.columns().height_at(15, z as i32);
        let h_east = generator.columns().height_at(16, z as i32);
        assert!((h_west - h_east).abs() <= 4, "cliff at border row {z}");

        assert!(west.get(15, h_west as usize, z).unwrap().is_solid());
        assert!(east.get(0, h_east as usize, z).unwrap().is_solid());
    }
}

/// Test: Classification boundaries are exclusive where documented.
#[test]
fn test_classification_boundaries() {
    assert_eq!(BiomeClassifier::classify(0.5, 0.5, 0.15), BiomeType::Ocean);
    assert_eq!(BiomeClassifier::classify(0.5, 0.5, 0.149), BiomeType::DeepOcean);
    assert_eq!(BiomeClassifier::classify(0.8, 0.9, 0.44), BiomeType::Swamp);
    assert_ne!(BiomeClassifier::classify(0.8, 0.85, 0.5), BiomeType::Swamp);
    assert_ne!(BiomeClassifier::classify(0.8, 0.9, 0.45), BiomeType::Swamp);
}

/// Test: A deep position with strong cave noise is carved.
#[test]
fn test_cave_carving_below_dirt() {
    let columns = ColumnGenerator::with_defaults(WorldSeed::new(7));
    let noise = PerlinNoise::new(WorldSeed::new(7));

    let site = (0..300)
        .flat_map(|z| (0..300).map(move |x| (x, z)))
        .find(|&(x, z)| {
            noise.perlin_3d(f64::from(x) * 0.05, 50.0 * 0.05, f64::from(z) * 0.05) > 0.5
        });
    let (x, z) = site.expect("cave noise should exceed 0.5 somewhere");

    assert_eq!(columns.block_type_at(x, 50, z, 70), Voxel::Air);
}

/// Test: Every generator variant fills chunks deterministically.
#[test]
fn test_all_registered_generators_are_deterministic() {
    let registry = GeneratorRegistry::with_builtins();
    let config = GeneratorConfig::default();

    for id in registry.ids() {
        let a = registry.create(id, &config).unwrap();
        let b = registry.create(id, &config).unwrap();
        let coord = ChunkCoord::new(3, -4);
        assert_eq!(
            a.generate(coord).unwrap().voxels(),
            b.generate(coord).unwrap().voxels(),
            "generator {id} drifted"
        );
    }
}

/// Test: Platformer worlds only use the front layers.
#[test]
fn test_platformer_is_side_on() {
    let registry = GeneratorRegistry::with_builtins();
    let generator = registry
        .create("platformer2d", &GeneratorConfig::default())
        .unwrap();
    assert!(matches!(generator, WorldGenerator::Platformer2D(_)));
    assert!(generator.metadata().is_2d);

    let chunk = generator.generate(ChunkCoord::new(0, 0)).unwrap();
    for x in 0..CHUNK_SIZE {
        assert!(chunk.surface_height(x, 0).is_some());
        assert_eq!(chunk.surface_height(x, 1), None);
    }
}
