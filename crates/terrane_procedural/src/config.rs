//! # Generator Configuration
//!
//! Tunable terrain constants, loaded once from TOML and validated before
//! any generator is built.
//!
//! ```toml
//! seed = 12345
//! generator = "terrain3d"
//!
//! [terrain]
//! sea_level = 62
//! cave_threshold = 0.5
//!
//! [features]
//! vegetation = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::{CHUNK_HEIGHT, CHUNK_SIZE};
use crate::error::{GenResult, GenerationError};
use crate::noise::{FractalParams, WorldSeed};

/// Terrain shaping constants for the 3D terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Lowest possible surface.
    pub base_height: i32,
    /// Surface swing above `base_height`, doubled across the noise range.
    pub height_amplitude: i32,
    /// Horizontal frequency of the height field.
    pub height_scale: f64,
    /// Octaves of the height field.
    pub octaves: u32,
    /// Amplitude decay per octave.
    pub persistence: f64,
    /// Frequency growth per octave.
    pub lacunarity: f64,
    /// Water fills up to this level in rivers and lakes.
    pub sea_level: i32,
    /// Surfaces above this are grass.
    pub grass_line: i32,
    /// Surfaces above this (and not grass) are sand.
    pub sand_line: i32,
    /// Depth of the dirt layer under the surface.
    pub subsurface_depth: i32,
    /// Frequency of cave noise.
    pub cave_scale: f64,
    /// Cave noise above this carves air.
    pub cave_threshold: f64,
    /// Frequency of river noise.
    pub river_scale: f64,
    /// Half-width of river bands in noise units.
    pub river_width: f64,
    /// Rivers only form below this surface height.
    pub river_max_height: i32,
    /// Frequency of lake noise.
    pub lake_scale: f64,
    /// Offset that decorrelates lake noise from river noise.
    pub lake_offset: f64,
    /// Lake noise above this forms a lake.
    pub lake_threshold: f64,
    /// Lakes only form below this surface height.
    pub lake_max_height: i32,
    /// Frequency of tree placement noise.
    pub tree_scale: f64,
    /// Tree noise must be above this.
    pub tree_noise_min: f64,
    /// Tree noise must be below this.
    pub tree_noise_max: f64,
    /// Trees grow on surfaces strictly above this.
    pub tree_min_surface: i32,
    /// Trees grow on surfaces strictly below this.
    pub tree_max_surface: i32,
    /// Foliage sphere radius, at most one chunk width.
    pub crown_radius: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            base_height: 40,
            height_amplitude: 20,
            height_scale: 0.01,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_level: 62,
            grass_line: 62,
            sand_line: 58,
            subsurface_depth: 3,
            cave_scale: 0.05,
            cave_threshold: 0.5,
            river_scale: 0.02,
            river_width: 0.08,
            river_max_height: 65,
            lake_scale: 0.005,
            lake_offset: 1000.0,
            lake_threshold: 0.6,
            lake_max_height: 63,
            tree_scale: 0.1,
            tree_noise_min: 0.3,
            tree_noise_max: 0.8,
            tree_min_surface: 62,
            tree_max_surface: 75,
            crown_radius: 2,
        }
    }
}

impl TerrainParams {
    /// Fractal settings of the height field.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidNoiseParams`] for unusable octave
    /// settings.
    pub fn fractal(&self) -> GenResult<FractalParams> {
        FractalParams::new(self.octaves, self.persistence, self.lacunarity)
    }

    /// Checks that every value produces a well-formed world.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidNoiseParams`] or
    /// [`GenerationError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> GenResult<()> {
        self.fractal()?;

        let top = CHUNK_HEIGHT as i32 - 1;
        if self.base_height < 0 || self.height_amplitude < 0 {
            return Err(invalid("base_height and height_amplitude must be non-negative"));
        }
        // Widened so hostile values cannot overflow
        let peak = i64::from(self.base_height) + 2 * i64::from(self.height_amplitude);
        if peak > i64::from(top) {
            return Err(invalid("surface can rise above the chunk"));
        }
        if !(0..=top).contains(&self.sea_level) {
            return Err(invalid("sea_level must lie inside the chunk"));
        }
        if self.subsurface_depth < 0 {
            return Err(invalid("subsurface_depth must be non-negative"));
        }
        if !(0..=CHUNK_SIZE as i32).contains(&self.crown_radius) {
            return Err(invalid(&format!(
                "crown_radius must lie in 0-{CHUNK_SIZE}, got {}",
                self.crown_radius
            )));
        }
        let finite = [
            ("height_scale", self.height_scale),
            ("cave_scale", self.cave_scale),
            ("river_scale", self.river_scale),
            ("lake_scale", self.lake_scale),
            ("lake_offset", self.lake_offset),
            ("tree_scale", self.tree_scale),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(&format!("{name} must be finite")));
            }
        }
        if self.tree_noise_min > self.tree_noise_max {
            return Err(invalid("tree_noise_min exceeds tree_noise_max"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> GenerationError {
    GenerationError::InvalidConfig(reason.to_owned())
}

/// Optional generation passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureToggles {
    /// Rivers and lakes.
    pub waterways: bool,
    /// Trees.
    pub vegetation: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            waterways: true,
            vegetation: true,
        }
    }
}

/// Top-level generator configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// World seed. TOML integers are signed, so seeds above `i64::MAX`
    /// are rejected by [`Self::validate`].
    pub seed: u64,
    /// Registry id of the generator to build.
    pub generator: String,
    /// Terrain shaping.
    pub terrain: TerrainParams,
    /// Optional passes.
    pub features: FeatureToggles,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: WorldSeed::default().value(),
            generator: crate::registry::TERRAIN_3D.to_owned(),
            terrain: TerrainParams::default(),
            features: FeatureToggles::default(),
        }
    }
}

impl GeneratorConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] for malformed TOML or
    /// out-of-range values.
    pub fn from_toml_str(text: &str) -> GenResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Io`] if the file cannot be read, otherwise
    /// as [`Self::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> GenResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serializes to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> GenResult<String> {
        toml::to_string(self).map_err(|e| GenerationError::InvalidConfig(e.to_string()))
    }

    /// Checks every nested value.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] for an empty generator id
    /// or a seed TOML cannot store, otherwise see [`TerrainParams::validate`].
    pub fn validate(&self) -> GenResult<()> {
        if self.generator.trim().is_empty() {
            return Err(invalid("generator id is empty"));
        }
        if i64::try_from(self.seed).is_err() {
            return Err(invalid(&format!(
                "seed {} does not fit a TOML integer",
                self.seed
            )));
        }
        self.terrain.validate()
    }

    /// Seed as a [`WorldSeed`].
    #[must_use]
    pub const fn world_seed(&self) -> WorldSeed {
        WorldSeed::new(self.seed)
    }
}
