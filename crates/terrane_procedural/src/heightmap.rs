//! # Heightmap Terrain
//!
//! Builds terrain from an imported grid of normalized heights. Samples are
//! bilinearly interpolated, and the surface block comes from a list of
//! height-fraction layers.

use tracing::debug;

use crate::chunk::{Chunk, Voxel, CHUNK_HEIGHT, CHUNK_SIZE};
use crate::error::{GenResult, GenerationError};
use crate::generator::{chunk_origin, GeneratorMetadata};

/// A row-major grid of heights in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapData {
    width: usize,
    depth: usize,
    heights: Vec<f32>,
}

impl HeightmapData {
    /// Wraps a height grid.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] when a dimension is zero,
    /// the sample count does not match, or a sample is not finite.
    pub fn new(width: usize, depth: usize, heights: Vec<f32>) -> GenResult<Self> {
        if width == 0 || depth == 0 {
            return Err(GenerationError::InvalidConfig(
                "heightmap dimensions must be non-zero".into(),
            ));
        }
        if heights.len() != width * depth {
            return Err(GenerationError::InvalidConfig(format!(
                "heightmap expects {} samples, got {}",
                width * depth,
                heights.len()
            )));
        }
        if heights.iter().any(|h| !h.is_finite()) {
            return Err(GenerationError::InvalidConfig(
                "heightmap samples must be finite".into(),
            ));
        }
        Ok(Self {
            width,
            depth,
            heights,
        })
    }

    /// Grid width along X.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Grid depth along Z.
    #[inline]
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Sample at a grid cell; 0 outside the grid.
    #[must_use]
    pub fn get(&self, x: usize, z: usize) -> f32 {
        if x >= self.width || z >= self.depth {
            return 0.0;
        }
        self.heights[z * self.width + x]
    }

    /// Bilinear sample at a fractional grid position, clamped to the grid.
    #[must_use]
    pub fn sample(&self, x: f64, z: f64) -> f64 {
        let max_x = (self.width - 1) as f64;
        let max_z = (self.depth - 1) as f64;
        let x = x.clamp(0.0, max_x);
        let z = z.clamp(0.0, max_z);

        let x0 = x.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(self.width - 1);
        let z1 = (z0 + 1).min(self.depth - 1);
        let fx = x - x0 as f64;
        let fz = z - z0 as f64;

        let h00 = f64::from(self.get(x0, z0));
        let h10 = f64::from(self.get(x1, z0));
        let h01 = f64::from(self.get(x0, z1));
        let h11 = f64::from(self.get(x1, z1));

        let near = h00 + (h10 - h00) * fx;
        let far = h01 + (h11 - h01) * fx;
        near + (far - near) * fz
    }
}

/// Surface block for a band of normalized height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightLayer {
    /// Inclusive lower fraction.
    pub min: f64,
    /// Exclusive upper fraction.
    pub max: f64,
    /// Block placed at the surface.
    pub voxel: Voxel,
}

/// Heightmap generator settings.
#[derive(Clone, Debug, PartialEq)]
pub struct HeightmapParams {
    /// Block height of a 0 sample.
    pub min_height: f64,
    /// Block height of a 1 sample.
    pub max_height: f64,
    /// Multiplier on the mapped height.
    pub vertical_scale: f64,
    /// World blocks per grid cell.
    pub horizontal_scale: f64,
    /// Tile the grid along X.
    pub repeat_x: bool,
    /// Tile the grid along Z.
    pub repeat_z: bool,
    /// Surface layers, first match wins.
    pub layers: Vec<HeightLayer>,
}

impl Default for HeightmapParams {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 128.0,
            vertical_scale: 1.0,
            horizontal_scale: 1.0,
            repeat_x: false,
            repeat_z: false,
            layers: vec![
                HeightLayer { min: 0.0, max: 0.3, voxel: Voxel::Sand },
                HeightLayer { min: 0.3, max: 0.4, voxel: Voxel::Dirt },
                HeightLayer { min: 0.4, max: 0.7, voxel: Voxel::Grass },
                HeightLayer { min: 0.7, max: 0.9, voxel: Voxel::Stone },
                HeightLayer { min: 0.9, max: 1.0, voxel: Voxel::Stone },
            ],
        }
    }
}

/// Terrain generator driven by a [`HeightmapData`] grid.
pub struct HeightmapGenerator {
    data: HeightmapData,
    params: HeightmapParams,
}

impl HeightmapGenerator {
    /// Registry metadata.
    pub const METADATA: GeneratorMetadata = GeneratorMetadata {
        name: "Heightmap",
        id: "heightmap",
        description: "Terrain built from an imported heightmap grid",
        version: "1.0.0",
        is_2d: false,
        is_3d: true,
        tags: &["heightmap", "import", "3d"],
    };

    /// Creates a heightmap generator.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidConfig`] when a scale is not
    /// positive or the height range is inverted.
    pub fn new(data: HeightmapData, params: HeightmapParams) -> GenResult<Self> {
        if !(params.horizontal_scale.is_finite() && params.horizontal_scale > 0.0) {
            return Err(GenerationError::InvalidConfig(
                "horizontal_scale must be positive".into(),
            ));
        }
        if !params.vertical_scale.is_finite() {
            return Err(GenerationError::InvalidConfig(
                "vertical_scale must be finite".into(),
            ));
        }
        if !params.min_height.is_finite()
            || !params.max_height.is_finite()
            || params.min_height > params.max_height
        {
            return Err(GenerationError::InvalidConfig(
                "height range must be finite with min_height <= max_height".into(),
            ));
        }
        Ok(Self { data, params })
    }

    /// Grid in use.
    #[must_use]
    pub const fn data(&self) -> &HeightmapData {
        &self.data
    }

    /// Settings in use.
    #[must_use]
    pub const fn params(&self) -> &HeightmapParams {
        &self.params
    }

    fn grid_position(&self, x: i32, z: i32) -> (f64, f64) {
        let scale = self.params.horizontal_scale;
        let mut hx = f64::from(x) / scale;
        let mut hz = f64::from(z) / scale;
        if self.params.repeat_x {
            hx = hx.rem_euclid(self.data.width() as f64);
        }
        if self.params.repeat_z {
            hz = hz.rem_euclid(self.data.depth() as f64);
        }
        (hx, hz)
    }

    /// Normalized sample under a world column.
    #[must_use]
    pub fn normalized_height(&self, x: i32, z: i32) -> f64 {
        let (hx, hz) = self.grid_position(x, z);
        self.data.sample(hx, hz)
    }

    /// Terrain height in blocks at a world column.
    #[must_use]
    pub fn terrain_height(&self, x: i32, z: i32) -> f64 {
        let p = &self.params;
        let h = self.normalized_height(x, z);
        (p.min_height + h * (p.max_height - p.min_height)) * p.vertical_scale
    }

    /// Surface block for a normalized height.
    #[must_use]
    pub fn surface_voxel(&self, normalized: f64) -> Voxel {
        self.params
            .layers
            .iter()
            .find(|layer| normalized >= layer.min && normalized < layer.max)
            .map_or(Voxel::Grass, |layer| layer.voxel)
    }

    /// Overwrites every voxel of `chunk` from the grid.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::CoordinateOverflow`] for chunks outside
    /// representable world space.
    pub fn populate(&self, chunk: &mut Chunk) -> GenResult<()> {
        let (origin_x, origin_z) = chunk_origin(chunk.coord())?;
        let top = CHUNK_HEIGHT as i64 - 1;

        for local_z in 0..CHUNK_SIZE {
            for local_x in 0..CHUNK_SIZE {
                let x = origin_x + local_x as i32;
                let z = origin_z + local_z as i32;

                let surface = self.surface_voxel(self.normalized_height(x, z));
                let max_y = self.terrain_height(x, z) as i64;

                for y in 0..CHUNK_HEIGHT {
                    let yi = y as i64;
                    let voxel = if yi > max_y.min(top) {
                        Voxel::Air
                    } else {
                        match max_y - yi {
                            0 => surface,
                            1..=3 if surface == Voxel::Sand => Voxel::Sand,
                            1..=3 => Voxel::Dirt,
                            _ => Voxel::Stone,
                        }
                    };
                    chunk.set(local_x, y, local_z, voxel)?;
                }
            }
        }

        chunk.mark_dirty();
        debug!(
            x = chunk.coord().x,
            z = chunk.coord().z,
            "heightmap chunk generated"
        );
        Ok(())
    }
}
