//! # Terrane Procedural Generation
//!
//! Deterministic voxel world generation: the same seed always produces the
//! same chunk, whichever order or thread it is generated on.
//!
//! ## Core Components
//!
//! - `PerlinNoise`: seeded 2D/3D gradient noise and fractal sums
//! - `BiomeClassifier`: climate sampling and biome selection
//! - `ColumnGenerator`: per-column height, layers, caves, water and trees
//! - `Chunk`: 16x256x16 voxel storage with a biome map and dirty flag
//! - `WorldGenerator`: terrain, platformer, heightmap or empty strategies
//! - `GeneratorRegistry`: id-keyed generator factories
//! - `generate_batch`: multi-threaded generation with cancellation
//!
//! ## Example
//!
//! ```rust,ignore
//! use terrane_procedural::{ChunkCoord, GeneratorConfig, GeneratorRegistry};
//!
//! let config = GeneratorConfig::from_file("world.toml")?;
//! let registry = GeneratorRegistry::with_builtins();
//! let generator = registry.create_from_config(&config)?;
//!
//! let chunk = generator.generate(ChunkCoord::new(0, 0))?;
//! assert!(chunk.solid_count() > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod batch;
pub mod biome;
pub mod chunk;
pub mod column;
pub mod config;
pub mod error;
pub mod generator;
pub mod heightmap;
pub mod noise;
pub mod platformer;
pub mod registry;

pub use batch::{generate_batch, BatchProgress, ChunkOutcome};
pub use biome::{BiomeClassifier, BiomeProperties, BiomeType};
pub use chunk::{Chunk, ChunkCoord, Voxel, CHUNK_HEIGHT, CHUNK_LAYER, CHUNK_SIZE, CHUNK_VOLUME};
pub use column::{ColumnGenerator, Waterway};
pub use config::{FeatureToggles, GeneratorConfig, TerrainParams};
pub use error::{ChunkError, ChunkResult, GenResult, GenerationError};
pub use generator::{ChunkGenerator, GeneratorMetadata, WorldGenerator};
pub use heightmap::{HeightLayer, HeightmapData, HeightmapGenerator, HeightmapParams};
pub use noise::{FractalParams, PerlinNoise, WorldSeed};
pub use platformer::{PlatformerGenerator, PlatformerSettings};
pub use registry::{GeneratorFactory, GeneratorRegistry};
