//! # Generated Terrain Meshing Tests
//!
//! Meshes real generated terrain and checks the seams between chunks.

use terrane_meshing::{ChunkMesher, ChunkNeighbors};
use terrane_procedural::{ChunkCoord, ChunkGenerator, WorldSeed};

/// Test: Terrain produces a well-formed, non-empty mesh.
#[test]
fn test_generated_chunk_meshes() {
    let generator = ChunkGenerator::new(WorldSeed::new(42));
    let chunk = generator.generate(ChunkCoord::new(0, 0)).unwrap();
    let mesh = ChunkMesher::generate(&chunk);

    assert!(!mesh.is_empty());
    assert_eq!(mesh.vertex_count(), mesh.quad_count() * 4);
    assert_eq!(mesh.indices.len(), mesh.quad_count() * 6);

    let max_index = mesh.indices.iter().copied().max().unwrap();
    assert_eq!(max_index as usize, mesh.vertex_count() - 1);
    for v in &mesh.vertices {
        assert!((0.0..=16.0).contains(&v.position[0]));
        assert!((0.0..=256.0).contains(&v.position[1]));
        assert!((0.0..=16.0).contains(&v.position[2]));
    }
}

/// Test: Neighbors only remove faces, never add them.
#[test]
fn test_neighbors_reduce_border_faces() {
    let generator = ChunkGenerator::new(WorldSeed::new(42));
    let center = generator.generate(ChunkCoord::new(0, 0)).unwrap();
    let west = generator.generate(ChunkCoord::new(-1, 0)).unwrap();
    let east = generator.generate(ChunkCoord::new(1, 0)).unwrap();
    let north = generator.generate(ChunkCoord::new(0, -1)).unwrap();
    let south = generator.generate(ChunkCoord::new(0, 1)).unwrap();

    let alone = ChunkMesher::generate(&center);
    let surrounded = ChunkMesher::generate_with_neighbors(
        &center,
        &ChunkNeighbors {
            left: Some(&west),
            right: Some(&east),
            back: Some(&north),
            front: Some(&south),
        },
    );

    // Solid stone walls along all four borders disappear
    assert!(surrounded.quad_count() < alone.quad_count());
}

/// Test: Generation marks dirty, remeshing clears it.
#[test]
fn test_generate_then_remesh() {
    let generator = ChunkGenerator::new(WorldSeed::new(3));
    let mut chunk = generator.generate(ChunkCoord::new(2, 2)).unwrap();
    assert!(chunk.is_dirty());

    let mesh = ChunkMesher::remesh(&mut chunk, &ChunkNeighbors::NONE).unwrap();
    assert_eq!(mesh, ChunkMesher::generate(&chunk));
    assert!(!chunk.is_dirty());

    generator.populate(&mut chunk).unwrap();
    assert!(ChunkMesher::remesh(&mut chunk, &ChunkNeighbors::NONE).is_some());
}
