//! Side-scrolling terrain: a noise skyline along X, a few blocks deep in Z,
//! with noise caves, depth-banded ores and trees on the front layer.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::chunk::{Chunk, Voxel, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::error::{GenResult, GenerationError};
use crate::generator::{chunk_origin, GeneratorMetadata};
use crate::noise::{PerlinNoise, WorldSeed};

/// Platformer shaping settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlatformerSettings {
    /// Mean surface as a fraction of chunk height.
    pub surface_level: f64,
    /// Surface swing in blocks.
    pub surface_variation: f64,
    /// Playable layers along Z, 1-3.
    pub depth: usize,
    /// Share of the cave band carved out, 0-1.
    pub cave_frequency: f64,
    /// Share of stone turned to ore, 0-1.
    pub ore_frequency: f64,
    /// Chance of a tree on each grass column, 0-1.
    pub tree_frequency: f64,
}

impl Default for PlatformerSettings {
    fn default() -> Self {
        Self {
            surface_level: 0.5,
            surface_variation: 30.0,
            depth: 1,
            cave_frequency: 0.3,
            ore_frequency: 0.1,
            tree_frequency: 0.05,
        }
    }
}

/// Side-scrolling world generator.
pub struct PlatformerGenerator {
    surface_noise: PerlinNoise,
    cave_noise: PerlinNoise,
    ore_noise: PerlinNoise,
    tree_seed: WorldSeed,
    settings: PlatformerSettings,
}

impl PlatformerGenerator {
    /// Registry metadata.
    pub const METADATA: GeneratorMetadata = GeneratorMetadata {
        name: "2D Platformer",
        id: "platformer2d",
        description: "Side-scrolling 2D terrain with layers, caves and ores",
        version: "1.0.0",
        is_2d: true,
        is_3d: false,
        tags: &["2d", "platformer", "side-scrolling"],
    };

    const CAVE_BAND: std::ops::Range<usize> = 20..200;
    const ORE_BAND: std::ops::Range<usize> = 1..200;
    /// Air needed above the grass before a tree fits.
    const TREE_CLEARANCE: usize = 8;
    const CROWN_RADIUS: i32 = 2;

    /// Creates a platformer generator. `depth` is clamped to 1-3.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] when a frequency lies
    /// outside 0-1 or the surface level outside the chunk.
    pub fn new(seed: WorldSeed, mut settings: PlatformerSettings) -> GenResult<Self> {
        for (name, value) in [
            ("surface_level", settings.surface_level),
            ("cave_frequency", settings.cave_frequency),
            ("ore_frequency", settings.ore_frequency),
            ("tree_frequency", settings.tree_frequency),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name} must lie in 0-1, got {value}"
                )));
            }
        }
        if !settings.surface_variation.is_finite() {
            return Err(GenerationError::InvalidConfig(
                "surface_variation must be finite".into(),
            ));
        }
        settings.depth = settings.depth.clamp(1, 3);

        Ok(Self {
            surface_noise: PerlinNoise::new(seed.derive(10)),
            cave_noise: PerlinNoise::new(seed.derive(11)),
            ore_noise: PerlinNoise::new(seed.derive(12)),
            tree_seed: seed.derive(13),
            settings,
        })
    }

    /// Settings in use, after clamping.
    #[must_use]
    pub const fn settings(&self) -> &PlatformerSettings {
        &self.settings
    }

    /// Number of filled blocks in the column at world `x`, 0-255.
    #[must_use]
    pub fn surface_at(&self, x: i32) -> i32 {
        let base = (CHUNK_HEIGHT as f64 * self.settings.surface_level) as i32;
        let noise = self.surface_noise.perlin_2d(f64::from(x) * 0.01, 0.0);
        (base + (noise * self.settings.surface_variation) as i32).clamp(0, CHUNK_HEIGHT as i32 - 1)
    }

    /// Ore for a stone cell at height `y`.
    #[must_use]
    pub const fn ore_for_height(y: usize) -> Voxel {
        match y {
            0..=29 => Voxel::Diamond,
            30..=59 => Voxel::Gold,
            60..=99 => Voxel::Iron,
            _ => Voxel::Coal,
        }
    }

    /// Populates the first `depth` Z layers of a chunk. The chunk's Z
    /// coordinate is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CoordinateOverflow`] for chunks outside
    /// representable world space.
    pub fn populate(&self, chunk: &mut Chunk) -> GenResult<()> {
        let (origin_x, _) = chunk_origin(chunk.coord())?;
        let depth = self.settings.depth;

        for local_x in 0..CHUNK_SIZE {
            let world_x = origin_x + local_x as i32;
            let fx = f64::from(world_x);
            let height = self.surface_at(world_x) as usize;

            for z in 0..depth {
                for y in 0..CHUNK_HEIGHT {
                    let voxel = if y >= height {
                        Voxel::Air
                    } else {
                        match height - 1 - y {
                            0 => Voxel::Grass,
                            1 | 2 => Voxel::Dirt,
                            _ => Voxel::Stone,
                        }
                    };
                    chunk.set(local_x, y, z, voxel)?;
                }
                chunk.set(local_x, 0, z, Voxel::Bedrock)?;
            }

            if self.settings.cave_frequency > 0.0 {
                let threshold = 1.0 - self.settings.cave_frequency;
                for y in Self::CAVE_BAND {
                    let n = self.cave_noise.perlin_2d(fx * 0.05, y as f64 * 0.05);
                    if n > threshold {
                        for z in 0..depth {
                            chunk.set(local_x, y, z, Voxel::Air)?;
                        }
                    }
                }
            }

            if self.settings.ore_frequency > 0.0 {
                let threshold = 1.0 - self.settings.ore_frequency;
                for y in Self::ORE_BAND {
                    if chunk.get(local_x, y, 0)? != Voxel::Stone {
                        continue;
                    }
                    let n = self.ore_noise.perlin_2d(fx * 0.1, y as f64 * 0.1);
                    if n > threshold {
                        let ore = Self::ore_for_height(y);
                        for z in 0..depth {
                            chunk.set(local_x, y, z, ore)?;
                        }
                    }
                }
            }
        }

        let trees = self.plant_trees(chunk, origin_x)?;

        chunk.mark_dirty();
        debug!(x = chunk.coord().x, depth, trees, "platformer chunk generated");
        Ok(())
    }

    /// Rolls once per column of the front layer and grows a tree where the
    /// roll lands under `tree_frequency` on grass with clear sky. Returns
    /// the number of trees placed.
    fn plant_trees(&self, chunk: &mut Chunk, origin_x: i32) -> GenResult<usize> {
        if self.settings.tree_frequency <= 0.0 {
            return Ok(0);
        }
        // One stream per chunk, independent of generation order
        let chunk_key = (u64::from(origin_x.unsigned_abs()) << 1) | u64::from(origin_x < 0);
        let mut rng = ChaCha8Rng::seed_from_u64(self.tree_seed.derive(chunk_key).value());

        let mut trees = 0;
        for local_x in 0..CHUNK_SIZE {
            let roll: f64 = rng.gen();
            let trunk = rng.gen_range(4..=6);
            if roll >= self.settings.tree_frequency {
                continue;
            }
            let Some(surface) = chunk.surface_height(local_x, 0) else {
                continue;
            };
            if Self::is_tree_site(chunk, local_x, surface)? {
                Self::grow_tree(chunk, local_x, surface + 1, trunk)?;
                trees += 1;
            }
        }
        Ok(trees)
    }

    fn is_tree_site(chunk: &Chunk, x: usize, surface: usize) -> GenResult<bool> {
        let base = surface + 1;
        if base + Self::TREE_CLEARANCE > CHUNK_HEIGHT {
            return Ok(false);
        }
        if chunk.get(x, surface, 0)? != Voxel::Grass {
            return Ok(false);
        }
        for y in base..base + Self::TREE_CLEARANCE {
            if chunk.get(x, y, 0)? != Voxel::Air {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Trunk from `base` plus a flat disc of leaves in the front layer.
    /// Leaves past the chunk edge are dropped.
    fn grow_tree(chunk: &mut Chunk, x: usize, base: usize, trunk: usize) -> GenResult<()> {
        for y in base..(base + trunk).min(CHUNK_HEIGHT) {
            chunk.set(x, y, 0, Voxel::Wood)?;
        }

        let r = Self::CROWN_RADIUS;
        let crown_y = (base + trunk) as i32;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let (Ok(lx), Ok(ly)) = (
                    usize::try_from(x as i32 + dx),
                    usize::try_from(crown_y + dy),
                ) else {
                    continue;
                };
                if lx >= CHUNK_SIZE || ly >= CHUNK_HEIGHT {
                    continue;
                }
                if chunk.get(lx, ly, 0)? == Voxel::Air {
                    chunk.set(lx, ly, 0, Voxel::Leaves)?;
                }
            }
        }
        Ok(())
    }
}
