//! # Biome Classification
//!
//! Determines terrain type from climate noise.
//!
//! Uses a climate model based on:
//! - Temperature (latitude bands plus noise)
//! - Humidity (from a separate noise channel)
//! - Elevation (from a third, low-frequency channel)
//!
//! All three channels are normalized to [0, 1] before classification.

use crate::chunk::Voxel;
use crate::noise::{FractalParams, PerlinNoise, WorldSeed};

/// Biome types in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum BiomeType {
    /// Cold, sparse, snow covered ground.
    Tundra = 0,
    /// Cold conifer forest.
    Taiga = 1,
    /// High, cold peaks.
    SnowyMountains = 2,
    /// Frozen flatland.
    IcePlains = 3,
    /// Temperate grassland.
    #[default]
    Plains = 4,
    /// Temperate forest.
    Forest = 5,
    /// Humid temperate forest.
    DenseForest = 6,
    /// High, temperate peaks.
    Mountains = 7,
    /// Raised rolling land.
    Hills = 8,
    /// Warm, dry sand.
    Desert = 9,
    /// Hottest, driest red sand.
    HotDesert = 10,
    /// Warm dry grassland.
    Savanna = 11,
    /// Hot, wet forest.
    Jungle = 12,
    /// Hot, waterlogged lowland.
    Swamp = 13,
    /// Coastline.
    Beach = 14,
    /// Shallow ocean.
    Ocean = 15,
    /// Deep ocean.
    DeepOcean = 16,
    /// River channel.
    River = 17,
}

impl BiomeType {
    /// Number of biome variants.
    pub const COUNT: usize = 18;

    /// Every biome, in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Tundra,
        Self::Taiga,
        Self::SnowyMountains,
        Self::IcePlains,
        Self::Plains,
        Self::Forest,
        Self::DenseForest,
        Self::Mountains,
        Self::Hills,
        Self::Desert,
        Self::HotDesert,
        Self::Savanna,
        Self::Jungle,
        Self::Swamp,
        Self::Beach,
        Self::Ocean,
        Self::DeepOcean,
        Self::River,
    ];

    /// Returns the fixed properties of this biome.
    #[inline]
    #[must_use]
    pub fn properties(self) -> &'static BiomeProperties {
        &BIOME_TABLE[self as usize]
    }

    /// Returns true for the open-water biomes.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Self::Ocean | Self::DeepOcean | Self::River)
    }
}

/// Fixed descriptive data for one biome.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiomeProperties {
    /// The biome described.
    pub biome: BiomeType,
    /// Display name.
    pub name: &'static str,
    /// Typical temperature in [0, 1].
    pub temperature: f32,
    /// Typical humidity in [0, 1].
    pub humidity: f32,
    /// Typical rainfall in [0, 1].
    pub rainfall: f32,
    /// Height variation factor.
    pub height_variation: f32,
    /// Height offset relative to sea level.
    pub height_offset: f32,
    /// Terrain roughness.
    pub roughness: f32,
    /// Top block.
    pub surface_block: Voxel,
    /// Block under the top.
    pub subsurface_block: Voxel,
    /// Deep fill block.
    pub stone_block: Voxel,
    /// Map display color (RGB).
    pub map_color: [f32; 3],
    /// Trees per column, 0-1.
    pub tree_density: f32,
    /// Grass per column, 0-1.
    pub grass_density: f32,
    /// Flowers per column, 0-1.
    pub flower_density: f32,
}

macro_rules! biome {
    (
        $biome:ident, $name:literal,
        climate: ($t:literal, $h:literal, $r:literal),
        shape: ($var:literal, $off:literal, $rough:literal),
        blocks: ($surface:ident, $sub:ident, $stone:ident),
        color: [$cr:literal, $cg:literal, $cb:literal],
        flora: ($trees:literal, $grass:literal, $flowers:literal)
    ) => {
        BiomeProperties {
            biome: BiomeType::$biome,
            name: $name,
            temperature: $t,
            humidity: $h,
            rainfall: $r,
            height_variation: $var,
            height_offset: $off,
            roughness: $rough,
            surface_block: Voxel::$surface,
            subsurface_block: Voxel::$sub,
            stone_block: Voxel::$stone,
            map_color: [$cr, $cg, $cb],
            tree_density: $trees,
            grass_density: $grass,
            flower_density: $flowers,
        }
    };
}

/// Property table, indexed by `BiomeType as usize`.
static BIOME_TABLE: [BiomeProperties; BiomeType::COUNT] = [
    biome!(Tundra, "Tundra",
        climate: (0.1, 0.3, 0.2), shape: (0.3, 0.0, 0.4),
        blocks: (Snow, Dirt, Stone), color: [0.8, 0.9, 1.0],
        flora: (0.01, 0.2, 0.01)),
    biome!(Taiga, "Taiga",
        climate: (0.2, 0.5, 0.4), shape: (0.5, 0.1, 0.5),
        blocks: (Grass, Dirt, Stone), color: [0.3, 0.5, 0.3],
        flora: (0.3, 0.4, 0.05)),
    biome!(SnowyMountains, "Snowy Mountains",
        climate: (0.0, 0.6, 0.5), shape: (1.0, 0.8, 0.9),
        blocks: (Snow, Stone, Stone), color: [1.0, 1.0, 1.0],
        flora: (0.0, 0.0, 0.0)),
    biome!(IcePlains, "Ice Plains",
        climate: (0.05, 0.1, 0.1), shape: (0.2, 0.0, 0.2),
        blocks: (Ice, Snow, Stone), color: [0.7, 0.9, 1.0],
        flora: (0.0, 0.0, 0.0)),
    biome!(Plains, "Plains",
        climate: (0.5, 0.3, 0.4), shape: (0.2, 0.0, 0.3),
        blocks: (Grass, Dirt, Stone), color: [0.5, 0.8, 0.3],
        flora: (0.05, 0.7, 0.2)),
    biome!(Forest, "Forest",
        climate: (0.5, 0.6, 0.6), shape: (0.4, 0.1, 0.5),
        blocks: (Grass, Dirt, Stone), color: [0.2, 0.6, 0.2],
        flora: (0.4, 0.6, 0.15)),
    biome!(DenseForest, "Dense Forest",
        climate: (0.55, 0.8, 0.8), shape: (0.5, 0.15, 0.6),
        blocks: (Grass, Dirt, Stone), color: [0.15, 0.5, 0.15],
        flora: (0.7, 0.8, 0.1)),
    biome!(Mountains, "Mountains",
        climate: (0.4, 0.4, 0.5), shape: (0.9, 0.7, 0.9),
        blocks: (Stone, Stone, Stone), color: [0.6, 0.6, 0.6],
        flora: (0.1, 0.2, 0.05)),
    biome!(Hills, "Hills",
        climate: (0.5, 0.5, 0.5), shape: (0.6, 0.3, 0.6),
        blocks: (Grass, Dirt, Stone), color: [0.4, 0.7, 0.3],
        flora: (0.2, 0.5, 0.1)),
    biome!(Desert, "Desert",
        climate: (0.8, 0.1, 0.0), shape: (0.3, 0.0, 0.4),
        blocks: (Sand, Sand, SandStone), color: [0.9, 0.8, 0.5],
        flora: (0.0, 0.05, 0.01)),
    biome!(HotDesert, "Hot Desert",
        climate: (1.0, 0.0, 0.0), shape: (0.4, 0.0, 0.5),
        blocks: (RedSand, RedSand, RedSandStone), color: [1.0, 0.6, 0.3],
        flora: (0.0, 0.0, 0.0)),
    biome!(Savanna, "Savanna",
        climate: (0.75, 0.3, 0.3), shape: (0.3, 0.0, 0.4),
        blocks: (Grass, Dirt, Stone), color: [0.8, 0.7, 0.4],
        flora: (0.08, 0.4, 0.05)),
    biome!(Jungle, "Jungle",
        climate: (0.9, 0.9, 1.0), shape: (0.5, 0.1, 0.7),
        blocks: (Grass, Dirt, Stone), color: [0.1, 0.7, 0.1],
        flora: (0.8, 0.9, 0.3)),
    biome!(Swamp, "Swamp",
        climate: (0.7, 1.0, 0.9), shape: (0.1, -0.2, 0.3),
        blocks: (Mud, Dirt, Stone), color: [0.3, 0.5, 0.3],
        flora: (0.3, 0.7, 0.2)),
    biome!(Beach, "Beach",
        climate: (0.6, 0.5, 0.3), shape: (0.1, -0.05, 0.2),
        blocks: (Sand, Sand, Stone), color: [0.9, 0.9, 0.7],
        flora: (0.0, 0.1, 0.0)),
    biome!(Ocean, "Ocean",
        climate: (0.5, 1.0, 0.7), shape: (0.2, -0.5, 0.3),
        blocks: (Water, Sand, Stone), color: [0.2, 0.4, 0.8],
        flora: (0.0, 0.0, 0.0)),
    biome!(DeepOcean, "Deep Ocean",
        climate: (0.4, 1.0, 0.7), shape: (0.3, -0.8, 0.4),
        blocks: (Water, Sand, Stone), color: [0.1, 0.2, 0.6],
        flora: (0.0, 0.0, 0.0)),
    biome!(River, "River",
        climate: (0.5, 1.0, 0.6), shape: (0.1, -0.15, 0.2),
        blocks: (Water, Sand, Stone), color: [0.3, 0.5, 0.9],
        flora: (0.05, 0.3, 0.1)),
];

/// Biome classifier that determines biome from world coordinates.
///
/// Uses three independently seeded noise channels to simulate climate.
pub struct BiomeClassifier {
    /// Temperature noise
    temperature_noise: PerlinNoise,
    /// Humidity noise
    humidity_noise: PerlinNoise,
    /// Elevation noise
    elevation_noise: PerlinNoise,
}

impl BiomeClassifier {
    /// Scale for temperature noise (larger = more gradual changes).
    const TEMPERATURE_SCALE: f64 = 0.002;
    /// Scale for humidity noise.
    const HUMIDITY_SCALE: f64 = 0.0025;
    /// Scale for elevation noise.
    const ELEVATION_SCALE: f64 = 0.001;
    /// Latitude cooling per block of |z|.
    const LATITUDE_FALLOFF: f64 = 0.0001;
    /// Share of temperature decided by latitude.
    const LATITUDE_WEIGHT: f64 = 0.7;
    /// Distance sampled by [`Self::is_in_transition_zone`].
    const TRANSITION_RADIUS: i32 = 16;
    /// Default blend radius in blocks.
    pub const DEFAULT_BLEND_RADIUS: i32 = 64;

    /// Creates a new biome classifier from a world seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            temperature_noise: PerlinNoise::new(seed.derive(1)),
            humidity_noise: PerlinNoise::new(seed.derive(2)),
            elevation_noise: PerlinNoise::new(seed.derive(3)),
        }
    }

    /// Temperature in [0, 1]; warmest along `z = 0`.
    #[must_use]
    pub fn temperature_at(&self, x: i32, z: i32) -> f64 {
        let latitude = (f64::from(z).abs() * Self::LATITUDE_FALLOFF).min(1.0);
        let noise = self.temperature_noise.fractal_2d(
            f64::from(x) * Self::TEMPERATURE_SCALE,
            f64::from(z) * Self::TEMPERATURE_SCALE,
            FractalParams::TERRAIN,
        );
        let temperature = (1.0 - latitude) * Self::LATITUDE_WEIGHT
            + (noise * 0.5 + 0.5) * (1.0 - Self::LATITUDE_WEIGHT);
        temperature.clamp(0.0, 1.0)
    }

    /// Humidity in [0, 1].
    #[must_use]
    pub fn humidity_at(&self, x: i32, z: i32) -> f64 {
        let noise = self.humidity_noise.fractal_2d(
            f64::from(x) * Self::HUMIDITY_SCALE,
            f64::from(z) * Self::HUMIDITY_SCALE,
            FractalParams::TERRAIN,
        );
        (noise * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Elevation in [0, 1].
    #[must_use]
    pub fn elevation_at(&self, x: i32, z: i32) -> f64 {
        let noise = self.elevation_noise.fractal_2d(
            f64::from(x) * Self::ELEVATION_SCALE,
            f64::from(z) * Self::ELEVATION_SCALE,
            FractalParams::TERRAIN,
        );
        (noise * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Classifies the biome at world coordinates.
    #[must_use]
    pub fn biome_at(&self, x: i32, z: i32) -> BiomeType {
        Self::classify(
            self.temperature_at(x, z),
            self.humidity_at(x, z),
            self.elevation_at(x, z),
        )
    }

    /// Classifies biome from climate values, each in [0, 1].
    ///
    /// Elevation bands are checked first, then temperature bands, then
    /// humidity within each band.
    #[must_use]
    pub fn classify(temperature: f64, humidity: f64, elevation: f64) -> BiomeType {
        // Water and coast
        if elevation < 0.15 {
            return BiomeType::DeepOcean;
        }
        if elevation < 0.3 {
            return BiomeType::Ocean;
        }
        if elevation < 0.35 {
            return BiomeType::Beach;
        }

        // High ground
        if elevation > 0.75 {
            return if temperature < 0.3 {
                BiomeType::SnowyMountains
            } else {
                BiomeType::Mountains
            };
        }
        if elevation > 0.6 {
            return BiomeType::Hills;
        }

        if temperature < 0.33 {
            return match humidity {
                h if h < 0.2 => BiomeType::IcePlains,
                h if h < 0.5 => BiomeType::Tundra,
                _ => BiomeType::Taiga,
            };
        }

        if temperature < 0.66 {
            return match humidity {
                h if h < 0.4 => BiomeType::Plains,
                h if h < 0.7 => BiomeType::Forest,
                _ => BiomeType::DenseForest,
            };
        }

        match humidity {
            h if h < 0.15 => BiomeType::HotDesert,
            h if h < 0.4 => {
                if temperature > 0.85 {
                    BiomeType::Desert
                } else {
                    BiomeType::Savanna
                }
            }
            h if h < 0.7 => BiomeType::Savanna,
            h if h > 0.85 && elevation < 0.45 => BiomeType::Swamp,
            _ => BiomeType::Jungle,
        }
    }

    /// Returns the fixed properties of a biome.
    #[inline]
    #[must_use]
    pub fn properties_of(&self, biome: BiomeType) -> &'static BiomeProperties {
        biome.properties()
    }

    /// Returns properties averaged over a 5x5 grid spanning `radius` blocks.
    ///
    /// Samples are weighted by `1 / (1 + grid distance)`. Numeric fields are
    /// blended; the biome identity, name and block choices come from the
    /// center sample.
    #[must_use]
    pub fn blended_properties_at(&self, x: i32, z: i32, radius: i32) -> BiomeProperties {
        let center = self.biome_at(x, z);
        let mut blended = *center.properties();
        let spacing = f64::from(radius) / 5.0;

        let mut total_weight = 0.0f32;
        let mut acc = [0.0f32; 12];

        for dz in -2i32..=2 {
            for dx in -2i32..=2 {
                let sample_x = x.saturating_add((f64::from(dx) * spacing) as i32);
                let sample_z = z.saturating_add((f64::from(dz) * spacing) as i32);
                let props = self.biome_at(sample_x, sample_z).properties();

                let distance = f64::from(dx * dx + dz * dz).sqrt();
                let weight = (1.0 / (1.0 + distance)) as f32;
                total_weight += weight;

                let fields = numeric_fields(props);
                for (slot, value) in acc.iter_mut().zip(fields) {
                    *slot += value * weight;
                }
            }
        }

        for slot in &mut acc {
            *slot /= total_weight;
        }

        blended.temperature = acc[0];
        blended.humidity = acc[1];
        blended.rainfall = acc[2];
        blended.height_variation = acc[3];
        blended.height_offset = acc[4];
        blended.roughness = acc[5];
        blended.map_color = [acc[6], acc[7], acc[8]];
        blended.tree_density = acc[9];
        blended.grass_density = acc[10];
        blended.flower_density = acc[11];
        blended
    }

    /// Returns true when a point 16 blocks away in any cardinal direction
    /// classifies differently from `(x, z)`.
    #[must_use]
    pub fn is_in_transition_zone(&self, x: i32, z: i32) -> bool {
        let center = self.biome_at(x, z);
        let d = Self::TRANSITION_RADIUS;
        [(0, -d), (0, d), (d, 0), (-d, 0)]
            .into_iter()
            .any(|(dx, dz)| self.biome_at(x.saturating_add(dx), z.saturating_add(dz)) != center)
    }
}

#[inline]
fn numeric_fields(p: &BiomeProperties) -> [f32; 12] {
    [
        p.temperature,
        p.humidity,
        p.rainfall,
        p.height_variation,
        p.height_offset,
        p.roughness,
        p.map_color[0],
        p.map_color[1],
        p.map_color[2],
        p.tree_density,
        p.grass_density,
        p.flower_density,
    ]
}
