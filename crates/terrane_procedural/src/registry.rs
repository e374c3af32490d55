//! # Generator Registry
//!
//! Maps generator ids to factories. A registry is an ordinary value: build
//! one with [`GeneratorRegistry::with_builtins`] and pass it to whoever
//! selects a generator from configuration.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::GeneratorConfig;
use crate::error::{GenResult, GenerationError};
use crate::generator::{ChunkGenerator, GeneratorMetadata, WorldGenerator};
use crate::heightmap::{HeightmapData, HeightmapGenerator, HeightmapParams};
use crate::platformer::{PlatformerGenerator, PlatformerSettings};

/// Id of the 3D terrain generator.
pub const TERRAIN_3D: &str = "terrain3d";
/// Id of the side-scrolling generator.
pub const PLATFORMER_2D: &str = "platformer2d";
/// Id of the heightmap generator.
pub const HEIGHTMAP: &str = "heightmap";
/// Id of the empty generator.
pub const EMPTY: &str = "empty";

/// Builds a generator from configuration.
pub type GeneratorFactory =
    Box<dyn Fn(&GeneratorConfig) -> GenResult<WorldGenerator> + Send + Sync>;

struct Entry {
    metadata: GeneratorMetadata,
    factory: GeneratorFactory,
}

/// Id-keyed set of generator factories.
#[derive(Default)]
pub struct GeneratorRegistry {
    entries: HashMap<String, Entry>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the terrain, platformer and empty
    /// generators. Heightmaps need data, see [`Self::register_heightmap`].
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(
            ChunkGenerator::METADATA,
            Box::new(|config: &GeneratorConfig| {
                ChunkGenerator::from_config(config).map(WorldGenerator::from)
            }),
        );
        registry.register(
            PlatformerGenerator::METADATA,
            Box::new(|config: &GeneratorConfig| {
                PlatformerGenerator::new(config.world_seed(), PlatformerSettings::default())
                    .map(WorldGenerator::from)
            }),
        );
        registry.register(
            WorldGenerator::EMPTY_METADATA,
            Box::new(|_: &GeneratorConfig| Ok(WorldGenerator::Empty)),
        );
        info!(generators = registry.len(), "generator registry ready");
        registry
    }

    /// Registers a factory under `metadata.id`, replacing any previous entry.
    pub fn register(&mut self, metadata: GeneratorMetadata, factory: GeneratorFactory) {
        let id = metadata.id;
        if self
            .entries
            .insert(id.to_owned(), Entry { metadata, factory })
            .is_some()
        {
            warn!(id, "replacing registered generator");
        }
    }

    /// Registers the heightmap generator over a fixed grid.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] when `params` are rejected
    /// by [`HeightmapGenerator::new`].
    pub fn register_heightmap(
        &mut self,
        data: HeightmapData,
        params: HeightmapParams,
    ) -> GenResult<()> {
        HeightmapGenerator::new(data.clone(), params.clone())?;
        self.register(
            HeightmapGenerator::METADATA,
            Box::new(move |_: &GeneratorConfig| {
                HeightmapGenerator::new(data.clone(), params.clone()).map(WorldGenerator::from)
            }),
        );
        Ok(())
    }

    /// Builds the generator registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::UnknownGenerator`] for an unregistered id,
    /// or whatever the factory reports for `config`.
    pub fn create(&self, id: &str, config: &GeneratorConfig) -> GenResult<WorldGenerator> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| GenerationError::UnknownGenerator(id.to_owned()))?;
        let generator = (entry.factory)(config)?;
        info!(id, seed = config.seed, "generator created");
        Ok(generator)
    }

    /// Builds the generator named by `config.generator`.
    ///
    /// # Errors
    ///
    /// See [`Self::create`].
    pub fn create_from_config(&self, config: &GeneratorConfig) -> GenResult<WorldGenerator> {
        self.create(&config.generator, config)
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Metadata registered under `id`.
    #[must_use]
    pub fn metadata(&self, id: &str) -> Option<GeneratorMetadata> {
        self.entries.get(id).map(|entry| entry.metadata)
    }

    /// Registered ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered generators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
