//! # Chunk System
//!
//! World data is organized into fixed-size chunks so each can be
//! generated, meshed and discarded independently.
//!
//! ## Chunk Format
//!
//! Chunks are 16x256x16 voxels (width x height x depth), one byte each,
//! stored in a single flat boxed slice. The linear index is
//! `x + z * 16 + y * 16 * 16`, so a horizontal layer is contiguous.

use crate::biome::BiomeType;
use crate::error::{ChunkError, ChunkResult};

/// Chunk width/depth in blocks.
pub const CHUNK_SIZE: usize = 16;

/// Chunk height in blocks.
pub const CHUNK_HEIGHT: usize = 256;

/// Voxels in one horizontal layer.
pub const CHUNK_LAYER: usize = CHUNK_SIZE * CHUNK_SIZE;

/// Total voxels per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_LAYER * CHUNK_HEIGHT;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(CHUNK_SIZE as i32),
            z: block_z.div_euclid(CHUNK_SIZE as i32),
        }
    }

    /// Returns the world block position of the chunk's origin corner, or
    /// `None` when it does not fit in `i32`.
    #[inline]
    #[must_use]
    pub const fn checked_world_origin(self) -> Option<(i32, i32)> {
        match (
            self.x.checked_mul(CHUNK_SIZE as i32),
            self.z.checked_mul(CHUNK_SIZE as i32),
        ) {
            (Some(x), Some(z)) => Some((x, z)),
            _ => None,
        }
    }
}

/// A single voxel type.
///
/// One byte per voxel; the discriminant is stable and may be stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Voxel {
    /// Empty space.
    #[default]
    Air = 0,
    /// Stone.
    Stone = 1,
    /// Dirt.
    Dirt = 2,
    /// Grass-topped dirt.
    Grass = 3,
    /// Sand.
    Sand = 4,
    /// Water.
    Water = 5,
    /// Tree trunk.
    Wood = 6,
    /// Tree foliage.
    Leaves = 7,
    /// Unbreakable floor.
    Bedrock = 8,
    /// Snow.
    Snow = 9,
    /// Ice.
    Ice = 10,
    /// Cobblestone.
    Cobblestone = 11,
    /// Wooden planks.
    Planks = 12,
    /// Glass.
    Glass = 13,
    /// Sandstone.
    SandStone = 14,
    /// Red sand.
    RedSand = 15,
    /// Red sandstone.
    RedSandStone = 16,
    /// Mud.
    Mud = 17,
    /// Coal ore.
    Coal = 18,
    /// Iron ore.
    Iron = 19,
    /// Gold ore.
    Gold = 20,
    /// Diamond ore.
    Diamond = 21,
}

impl Voxel {
    /// Every voxel except air occupies its cell.
    #[inline]
    #[must_use]
    pub const fn is_solid(self) -> bool {
        !matches!(self, Self::Air)
    }

    /// Opaque voxels hide the faces of their neighbors.
    ///
    /// Water and glass are solid but can be seen through.
    #[inline]
    #[must_use]
    pub const fn is_opaque(self) -> bool {
        !matches!(self, Self::Air | Self::Water | Self::Glass)
    }

    /// Voxels rendered with transparency.
    #[inline]
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        matches!(self, Self::Water | Self::Glass | Self::Ice)
    }
}

/// A chunk of world data.
///
/// Contains a 16x256x16 grid of voxels plus a per-column biome map.
#[derive(Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    voxels: Box<[Voxel]>,
    /// Biome data for each column (indexed as `x + z * 16`).
    biomes: [BiomeType; CHUNK_LAYER],
    dirty: bool,
}

impl Chunk {
    /// Creates a new chunk of air at the given coordinates.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            voxels: vec![Voxel::Air; CHUNK_VOLUME].into_boxed_slice(),
            biomes: [BiomeType::Plains; CHUNK_LAYER],
            dirty: false,
        }
    }

    /// Chunk position in the world grid.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Linear index of a local position. Does not check bounds.
    #[inline]
    #[must_use]
    pub const fn index(x: usize, y: usize, z: usize) -> usize {
        x + z * CHUNK_SIZE + y * CHUNK_LAYER
    }

    #[inline]
    const fn in_bounds(x: usize, y: usize, z: usize) -> bool {
        x < CHUNK_SIZE && y < CHUNK_HEIGHT && z < CHUNK_SIZE
    }

    /// Gets the voxel at local coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] outside 0-15 / 0-255 / 0-15.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> ChunkResult<Voxel> {
        if Self::in_bounds(x, y, z) {
            Ok(self.voxels[Self::index(x, y, z)])
        } else {
            Err(ChunkError::OutOfBounds { x, y, z })
        }
    }

    /// Sets the voxel at local coordinates and marks the chunk dirty.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] outside 0-15 / 0-255 / 0-15.
    /// The chunk is left unchanged.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) -> ChunkResult<()> {
        if !Self::in_bounds(x, y, z) {
            return Err(ChunkError::OutOfBounds { x, y, z });
        }
        self.voxels[Self::index(x, y, z)] = voxel;
        self.dirty = true;
        Ok(())
    }

    /// Raw voxel storage in index order.
    #[inline]
    #[must_use]
    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    /// Fills the whole chunk with one voxel type and marks it dirty.
    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
        self.dirty = true;
    }

    /// Whether the chunk changed since its mesh was last built.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flags the chunk for remeshing.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the remesh flag.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Gets the biome of a local column.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] for columns outside 0-15.
    #[inline]
    pub fn biome(&self, x: usize, z: usize) -> ChunkResult<BiomeType> {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            Ok(self.biomes[x + z * CHUNK_SIZE])
        } else {
            Err(ChunkError::OutOfBounds { x, y: 0, z })
        }
    }

    /// Sets the biome of a local column.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] for columns outside 0-15.
    #[inline]
    pub fn set_biome(&mut self, x: usize, z: usize, biome: BiomeType) -> ChunkResult<()> {
        if x < CHUNK_SIZE && z < CHUNK_SIZE {
            self.biomes[x + z * CHUNK_SIZE] = biome;
            Ok(())
        } else {
            Err(ChunkError::OutOfBounds { x, y: 0, z })
        }
    }

    /// Highest solid voxel in a column, or `None` for an empty or
    /// out-of-range column.
    #[must_use]
    pub fn surface_height(&self, x: usize, z: usize) -> Option<usize> {
        if x >= CHUNK_SIZE || z >= CHUNK_SIZE {
            return None;
        }
        (0..CHUNK_HEIGHT)
            .rev()
            .find(|&y| self.voxels[Self::index(x, y, z)].is_solid())
    }

    /// Number of solid voxels.
    #[must_use]
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("solid", &self.solid_count())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_coord_from_block() {
        assert_eq!(ChunkCoord::from_block_pos(0, 0), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(15, 15), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::from_block_pos(16, 16), ChunkCoord::new(1, 1));
        assert_eq!(ChunkCoord::from_block_pos(-1, -1), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-16, -16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::from_block_pos(-17, -17), ChunkCoord::new(-2, -2));
    }

    #[test]
    fn test_world_origin_overflow() {
        assert_eq!(ChunkCoord::new(-2, 3).checked_world_origin(), Some((-32, 48)));
        assert_eq!(ChunkCoord::new(i32::MAX, 0).checked_world_origin(), None);
        assert_eq!(ChunkCoord::new(0, i32::MIN).checked_world_origin(), None);
    }

    #[test]
    fn test_index_layout() {
        assert_eq!(Chunk::index(0, 0, 0), 0);
        assert_eq!(Chunk::index(1, 0, 0), 1);
        assert_eq!(Chunk::index(0, 0, 1), 16);
        assert_eq!(Chunk::index(0, 1, 0), 256);
        assert_eq!(Chunk::index(15, 255, 15), CHUNK_VOLUME - 1);
    }

    #[test]
    fn test_new_chunk_is_air_and_clean() {
        let chunk = Chunk::new(ChunkCoord::new(3, -4));
        assert_eq!(chunk.coord(), ChunkCoord::new(3, -4));
        assert!(!chunk.is_dirty());
        assert_eq!(chunk.solid_count(), 0);
        assert_eq!(chunk.get(8, 100, 8), Ok(Voxel::Air));
        assert_eq!(chunk.surface_height(0, 0), None);
    }

    #[test]
    fn test_set_get_and_dirty() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        chunk.set(1, 2, 3, Voxel::Stone).unwrap();
        assert!(chunk.is_dirty());
        assert_eq!(chunk.get(1, 2, 3), Ok(Voxel::Stone));
        assert_eq!(chunk.voxels()[Chunk::index(1, 2, 3)], Voxel::Stone);
        assert_eq!(chunk.surface_height(1, 3), Some(2));

        chunk.clear_dirty();
        assert!(!chunk.is_dirty());
        chunk.mark_dirty();
        assert!(chunk.is_dirty());
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        assert_eq!(
            chunk.get(16, 0, 0),
            Err(ChunkError::OutOfBounds { x: 16, y: 0, z: 0 })
        );
        assert_eq!(
            chunk.set(0, 256, 0, Voxel::Stone),
            Err(ChunkError::OutOfBounds { x: 0, y: 256, z: 0 })
        );
        assert!(!chunk.is_dirty(), "failed set must not dirty the chunk");
        assert!(chunk.set_biome(0, 16, BiomeType::Ocean).is_err());
    }

    #[test]
    fn test_voxel_properties() {
        assert!(!Voxel::Air.is_solid());
        assert!(!Voxel::Air.is_opaque());
        assert!(Voxel::Water.is_solid());
        assert!(!Voxel::Water.is_opaque());
        assert!(Voxel::Water.is_transparent());
        assert!(!Voxel::Glass.is_opaque());
        assert!(Voxel::Ice.is_opaque());
        assert!(Voxel::Ice.is_transparent());
        assert!(Voxel::Stone.is_opaque());
        assert!(!Voxel::Stone.is_transparent());
    }

    #[test]
    fn test_biome_map() {
        let mut chunk = Chunk::new(ChunkCoord::default());
        assert_eq!(chunk.biome(4, 5), Ok(BiomeType::Plains));
        chunk.set_biome(4, 5, BiomeType::Desert).unwrap();
        assert_eq!(chunk.biome(4, 5), Ok(BiomeType::Desert));
        assert_eq!(chunk.biome(5, 4), Ok(BiomeType::Plains));
    }
}
