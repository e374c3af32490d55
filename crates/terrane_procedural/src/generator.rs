//! # World Generators
//!
//! A world generator populates whole chunks. The 3D terrain generator runs
//! two passes per chunk:
//!
//! 1. Columns: height field, layers, caves, waterways, biome map
//! 2. Vegetation: trees, once every column of the chunk exists
//!
//! Other strategies (side-scrolling platformer, heightmap import, empty
//! canvas) share the same `WorldGenerator` surface.

use tracing::debug;

use crate::biome::{BiomeClassifier, BiomeType};
use crate::chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use crate::column::{ColumnGenerator, Waterway};
use crate::config::{FeatureToggles, GeneratorConfig, TerrainParams};
use crate::error::{GenResult, GenerationError};
use crate::heightmap::HeightmapGenerator;
use crate::noise::WorldSeed;
use crate::platformer::PlatformerGenerator;

/// Descriptive data shown when listing generators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorMetadata {
    /// Human-readable name.
    pub name: &'static str,
    /// Stable registry id.
    pub id: &'static str,
    /// One-line summary.
    pub description: &'static str,
    /// Generator revision.
    pub version: &'static str,
    /// Produces a side-on world a few blocks deep.
    pub is_2d: bool,
    /// Produces a full 3D world.
    pub is_3d: bool,
    /// Search tags.
    pub tags: &'static [&'static str],
}

/// Resolves a chunk's block origin or reports the overflow.
pub(crate) fn chunk_origin(coord: ChunkCoord) -> GenResult<(i32, i32)> {
    coord
        .checked_world_origin()
        .ok_or(GenerationError::CoordinateOverflow {
            x: coord.x,
            z: coord.z,
        })
}

/// 3D terrain generator: noise height field, biomes, caves, waterways and
/// trees.
pub struct ChunkGenerator {
    columns: ColumnGenerator,
    classifier: BiomeClassifier,
    seed: WorldSeed,
}

impl ChunkGenerator {
    /// Registry metadata.
    pub const METADATA: GeneratorMetadata = GeneratorMetadata {
        name: "3D Terrain",
        id: "terrain3d",
        description: "Procedural 3D terrain using Perlin noise with biomes, caves, and natural features",
        version: "1.0.0",
        is_2d: false,
        is_3d: true,
        tags: &["terrain", "3d", "procedural"],
    };

    /// Creates a terrain generator with default constants.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            columns: ColumnGenerator::with_defaults(seed),
            classifier: BiomeClassifier::new(seed),
            seed,
        }
    }

    /// Creates a terrain generator with custom constants.
    ///
    /// # Errors
    ///
    /// Returns an error when `params` fails validation.
    pub fn with_params(
        seed: WorldSeed,
        params: TerrainParams,
        features: FeatureToggles,
    ) -> GenResult<Self> {
        Ok(Self {
            columns: ColumnGenerator::new(seed, params, features)?,
            classifier: BiomeClassifier::new(seed),
            seed,
        })
    }

    /// Creates a terrain generator from a loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the terrain section fails validation.
    pub fn from_config(config: &GeneratorConfig) -> GenResult<Self> {
        Self::with_params(config.world_seed(), config.terrain.clone(), config.features)
    }

    /// Seed this generator was built from.
    #[must_use]
    pub const fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Column generator in use.
    #[must_use]
    pub const fn columns(&self) -> &ColumnGenerator {
        &self.columns
    }

    /// Biome classifier in use.
    #[must_use]
    pub const fn classifier(&self) -> &BiomeClassifier {
        &self.classifier
    }

    /// Generates a fresh chunk at the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CoordinateOverflow`] when the chunk lies
    /// outside representable world space.
    pub fn generate(&self, coord: ChunkCoord) -> GenResult<Chunk> {
        let mut chunk = Chunk::new(coord);
        self.populate(&mut chunk)?;
        Ok(chunk)
    }

    /// Overwrites every voxel of `chunk` with generated terrain.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CoordinateOverflow`] when the chunk lies
    /// outside representable world space.
    pub fn populate(&self, chunk: &mut Chunk) -> GenResult<()> {
        let coord = chunk.coord();
        let (world_x, world_z) = chunk_origin(coord)?;

        // Pass 1: terrain columns
        for local_z in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                let block_x = world_x + local_x as i32;
                let block_z = world_z + local_z as i32;

                let (_, waterway) =
                    self.columns
                        .populate_column(chunk, local_x, local_z, block_x, block_z)?;
                let biome = match waterway {
                    Some(Waterway::River) => BiomeType::River,
                    _ => self.classifier.biome_at(block_x, block_z),
                };
                chunk.set_biome(local_x, local_z, biome)?;
            }
        }

        // Pass 2: vegetation
        let mut trees = 0usize;
        if self.columns.features().vegetation {
            for local_z in 0..CHUNK_SIZE {
                for local_x in 0..CHUNK_SIZE {
                    let block_x = world_x + local_x as i32;
                    let block_z = world_z + local_z as i32;
                    if self
                        .columns
                        .grow_tree(chunk, local_x, local_z, block_x, block_z)?
                    {
                        trees += 1;
                    }
                }
            }
        }

        chunk.mark_dirty();
        debug!(x = coord.x, z = coord.z, trees, "terrain chunk generated");
        Ok(())
    }
}

/// A chunk population strategy.
///
/// Every variant is immutable after construction and can be shared across
/// worker threads.
pub enum WorldGenerator {
    /// Noise terrain with biomes, caves, waterways and trees.
    Terrain3D(ChunkGenerator),
    /// Side-scrolling terrain a few blocks deep.
    Platformer2D(PlatformerGenerator),
    /// Terrain sampled from a height grid.
    Heightmap(HeightmapGenerator),
    /// Leaves chunks untouched.
    Empty,
}

impl WorldGenerator {
    /// Registry metadata for the empty generator.
    pub const EMPTY_METADATA: GeneratorMetadata = GeneratorMetadata {
        name: "Empty",
        id: "empty",
        description: "Empty world with no terrain generation (blank canvas)",
        version: "1.0.0",
        is_2d: false,
        is_3d: true,
        tags: &["empty", "blank"],
    };

    /// Describes this generator.
    #[must_use]
    pub const fn metadata(&self) -> GeneratorMetadata {
        match self {
            Self::Terrain3D(_) => ChunkGenerator::METADATA,
            Self::Platformer2D(_) => PlatformerGenerator::METADATA,
            Self::Heightmap(_) => HeightmapGenerator::METADATA,
            Self::Empty => Self::EMPTY_METADATA,
        }
    }

    /// Populates an existing chunk in place.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CoordinateOverflow`] for chunks outside
    /// representable world space, whatever the variant.
    pub fn populate(&self, chunk: &mut Chunk) -> GenResult<()> {
        match self {
            Self::Terrain3D(gen) => gen.populate(chunk),
            Self::Platformer2D(gen) => gen.populate(chunk),
            Self::Heightmap(gen) => gen.populate(chunk),
            Self::Empty => chunk_origin(chunk.coord()).map(|_| ()),
        }
    }

    /// Generates a fresh chunk.
    ///
    /// # Errors
    ///
    /// See [`Self::populate`].
    pub fn generate(&self, coord: ChunkCoord) -> GenResult<Chunk> {
        let mut chunk = Chunk::new(coord);
        self.populate(&mut chunk)?;
        Ok(chunk)
    }

    /// Surface height at a world column; 0 when the generator has none.
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        match self {
            Self::Terrain3D(gen) => gen.columns().height_at(x, z),
            Self::Platformer2D(gen) => gen.surface_at(x),
            Self::Heightmap(gen) => gen.terrain_height(x, z) as i32,
            Self::Empty => 0,
        }
    }
}

impl From<ChunkGenerator> for WorldGenerator {
    fn from(gen: ChunkGenerator) -> Self {
        Self::Terrain3D(gen)
    }
}

impl From<PlatformerGenerator> for WorldGenerator {
    fn from(gen: PlatformerGenerator) -> Self {
        Self::Platformer2D(gen)
    }
}

impl From<HeightmapGenerator> for WorldGenerator {
    fn from(gen: HeightmapGenerator) -> Self {
        Self::Heightmap(gen)
    }
}
