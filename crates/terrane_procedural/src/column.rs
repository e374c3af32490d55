//! # Column Generation
//!
//! Fills one vertical column of a chunk from the height field: layered
//! surface blocks, noise caves, rivers and lakes, then (as a separate pass
//! once every column exists) trees.

use crate::chunk::{Chunk, Voxel, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::config::{FeatureToggles, TerrainParams};
use crate::error::{ChunkError, GenResult};
use crate::noise::{FractalParams, PerlinNoise, WorldSeed};

/// Water body kind assigned to a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waterway {
    /// Narrow band along the zero contour of river noise.
    River,
    /// Broad low-frequency basin.
    Lake,
}

/// Per-column terrain generator.
///
/// Immutable after construction; one instance can serve many threads.
pub struct ColumnGenerator {
    noise: PerlinNoise,
    params: TerrainParams,
    fractal: FractalParams,
    features: FeatureToggles,
}

impl ColumnGenerator {
    /// Trunk height before the crown is subtracted.
    const TREE_BASE_HEIGHT: i32 = 5;

    /// Creates a column generator.
    ///
    /// # Errors
    ///
    /// Returns an error when `params` fails validation.
    pub fn new(seed: WorldSeed, params: TerrainParams, features: FeatureToggles) -> GenResult<Self> {
        params.validate()?;
        let fractal = params.fractal()?;
        Ok(Self {
            noise: PerlinNoise::new(seed),
            params,
            fractal,
            features,
        })
    }

    /// Creates a column generator with default terrain constants.
    #[must_use]
    pub fn with_defaults(seed: WorldSeed) -> Self {
        Self {
            noise: PerlinNoise::new(seed),
            params: TerrainParams::default(),
            fractal: FractalParams::TERRAIN,
            features: FeatureToggles::default(),
        }
    }

    /// Terrain constants in use.
    #[must_use]
    pub const fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Enabled optional passes.
    #[must_use]
    pub const fn features(&self) -> FeatureToggles {
        self.features
    }

    /// Surface height at a world column, in `[base, base + 2 * amplitude]`.
    #[must_use]
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let p = &self.params;
        let noise = self.noise.fractal_2d(
            f64::from(x) * p.height_scale,
            f64::from(z) * p.height_scale,
            self.fractal,
        );
        p.base_height + ((noise + 1.0) * f64::from(p.height_amplitude)).round() as i32
    }

    /// Block at a world position given its column's surface height.
    #[must_use]
    pub fn block_type_at(&self, x: i32, y: i32, z: i32, surface: i32) -> Voxel {
        let p = &self.params;
        let depth = surface - y;

        if depth < 0 {
            Voxel::Air
        } else if depth == 0 {
            if surface > p.grass_line {
                Voxel::Grass
            } else if surface > p.sand_line {
                Voxel::Sand
            } else {
                Voxel::Stone
            }
        } else if depth <= p.subsurface_depth {
            if surface > p.sand_line {
                Voxel::Dirt
            } else {
                Voxel::Stone
            }
        } else if self.is_cave(x, y, z) {
            Voxel::Air
        } else {
            Voxel::Stone
        }
    }

    /// True where cave noise carves the deep stone layer.
    #[inline]
    #[must_use]
    pub fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        let s = self.params.cave_scale;
        self.noise
            .perlin_3d(f64::from(x) * s, f64::from(y) * s, f64::from(z) * s)
            > self.params.cave_threshold
    }

    /// Water body at a column, if any. Rivers take precedence over lakes.
    #[must_use]
    pub fn waterway_at(&self, x: i32, z: i32, height: i32) -> Option<Waterway> {
        let p = &self.params;
        let fx = f64::from(x);
        let fz = f64::from(z);

        let river = self.noise.perlin_2d(fx * p.river_scale, fz * p.river_scale);
        if river.abs() < p.river_width && height < p.river_max_height {
            return Some(Waterway::River);
        }

        let lake = self.noise.perlin_2d(
            fx * p.lake_scale + p.lake_offset,
            fz * p.lake_scale + p.lake_offset,
        );
        if lake > p.lake_threshold && height < p.lake_max_height {
            return Some(Waterway::Lake);
        }

        None
    }

    /// Writes a full column and returns its surface height and water body.
    ///
    /// A column classified as a waterway whose surface already reaches sea
    /// level holds no water and reports `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] for local coordinates outside 0-15.
    pub fn populate_column(
        &self,
        chunk: &mut Chunk,
        local_x: usize,
        local_z: usize,
        world_x: i32,
        world_z: i32,
    ) -> GenResult<(i32, Option<Waterway>)> {
        if local_x >= CHUNK_SIZE || local_z >= CHUNK_SIZE {
            return Err(ChunkError::OutOfBounds {
                x: local_x,
                y: 0,
                z: local_z,
            }
            .into());
        }

        let height = self.height_at(world_x, world_z);
        for y in 0..CHUNK_HEIGHT {
            let voxel = self.block_type_at(world_x, y as i32, world_z, height);
            chunk.set(local_x, y, local_z, voxel)?;
        }

        let waterway = if self.features.waterways {
            self.waterway_at(world_x, world_z, height)
        } else {
            None
        };

        let mut filled = false;
        if waterway.is_some() {
            let top = self.params.sea_level.min(CHUNK_HEIGHT as i32 - 1);
            for y in (height + 1).max(0)..=top {
                let y = y as usize;
                if chunk.get(local_x, y, local_z)? == Voxel::Air {
                    chunk.set(local_x, y, local_z, Voxel::Water)?;
                    filled = true;
                }
            }
        }

        Ok((height, waterway.filter(|_| filled)))
    }

    /// Grows a tree on a populated column when placement noise allows.
    ///
    /// Leaves only fill air; anything that would cross the chunk edge is
    /// dropped. Returns whether a tree was placed.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkError::OutOfBounds`] for local coordinates outside 0-15.
    pub fn grow_tree(
        &self,
        chunk: &mut Chunk,
        local_x: usize,
        local_z: usize,
        world_x: i32,
        world_z: i32,
    ) -> GenResult<bool> {
        let p = &self.params;
        let height = self.height_at(world_x, world_z);
        if height <= p.tree_min_surface || height >= p.tree_max_surface {
            return Ok(false);
        }
        let Ok(surface_y) = usize::try_from(height) else {
            return Ok(false);
        };
        if chunk.get(local_x, surface_y, local_z)? != Voxel::Grass {
            return Ok(false);
        }

        let n = self.noise.perlin_2d(
            f64::from(world_x) * p.tree_scale,
            f64::from(world_z) * p.tree_scale,
        );
        if n <= p.tree_noise_min || n >= p.tree_noise_max {
            return Ok(false);
        }

        let tree_height = Self::TREE_BASE_HEIGHT + ((n + 1.0) * 2.0).round() as i32;
        let trunk = tree_height - 3;
        let top = height + trunk;

        for y in (height + 1)..=top {
            let Ok(y) = usize::try_from(y) else { continue };
            if y >= CHUNK_HEIGHT {
                break;
            }
            if matches!(chunk.get(local_x, y, local_z)?, Voxel::Air | Voxel::Leaves) {
                chunk.set(local_x, y, local_z, Voxel::Wood)?;
            }
        }

        let r = p.crown_radius;
        for dy in -r..=r {
            for dz in -r..=r {
                for dx in -r..=r {
                    if dx * dx + dy * dy + dz * dz > r * r + 1 {
                        continue;
                    }
                    let (Ok(x), Ok(y), Ok(z)) = (
                        usize::try_from(local_x as i32 + dx),
                        usize::try_from(top + dy),
                        usize::try_from(local_z as i32 + dz),
                    ) else {
                        continue;
                    };
                    if x >= CHUNK_SIZE || y >= CHUNK_HEIGHT || z >= CHUNK_SIZE {
                        continue;
                    }
                    if chunk.get(x, y, z)? == Voxel::Air {
                        chunk.set(x, y, z, Voxel::Leaves)?;
                    }
                }
            }
        }

        Ok(true)
    }
}
