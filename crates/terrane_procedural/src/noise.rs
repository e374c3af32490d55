//! # Perlin Noise Implementation
//!
//! Seeded, deterministic gradient noise in two and three dimensions.
//!
//! ## Determinism Guarantee
//!
//! The permutation table is shuffled with `ChaCha8Rng`, whose output
//! stream is fixed by its algorithm. Given the same `WorldSeed`, this
//! implementation produces **exactly** the same values on any platform,
//! any time.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{GenResult, GenerationError};

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., humidity noise).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(12345)
    }
}

impl From<u64> for WorldSeed {
    fn from(seed: u64) -> Self {
        Self(seed)
    }
}

/// Octave settings for fractal noise.
///
/// Only constructible through [`FractalParams::new`], so a value always
/// has at least one octave and positive, finite decay factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FractalParams {
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl FractalParams {
    /// Four octaves, halving amplitude and doubling frequency.
    pub const TERRAIN: Self = Self {
        octaves: 4,
        persistence: 0.5,
        lacunarity: 2.0,
    };

    /// Validates and builds fractal parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidNoiseParams`] when `octaves` is zero
    /// or either factor is not a positive finite number.
    pub fn new(octaves: u32, persistence: f64, lacunarity: f64) -> GenResult<Self> {
        if octaves == 0 {
            return Err(GenerationError::InvalidNoiseParams(
                "octaves must be at least 1".into(),
            ));
        }
        if !(persistence.is_finite() && persistence > 0.0) {
            return Err(GenerationError::InvalidNoiseParams(format!(
                "persistence must be positive, got {persistence}"
            )));
        }
        if !(lacunarity.is_finite() && lacunarity > 0.0) {
            return Err(GenerationError::InvalidNoiseParams(format!(
                "lacunarity must be positive, got {lacunarity}"
            )));
        }
        Ok(Self {
            octaves,
            persistence,
            lacunarity,
        })
    }

    /// Number of summed layers.
    #[inline]
    #[must_use]
    pub const fn octaves(self) -> u32 {
        self.octaves
    }

    /// Amplitude multiplier per octave.
    #[inline]
    #[must_use]
    pub const fn persistence(self) -> f64 {
        self.persistence
    }

    /// Frequency multiplier per octave.
    #[inline]
    #[must_use]
    pub const fn lacunarity(self) -> f64 {
        self.lacunarity
    }
}

impl Default for FractalParams {
    fn default() -> Self {
        Self::TERRAIN
    }
}

/// Pre-computed permutation table for noise.
///
/// This is computed once from the seed and reused.
struct PermutationTable {
    /// 512-entry permutation table (256 entries, doubled for overflow handling).
    perm: [u8; 512],
}

impl PermutationTable {
    /// Creates a new permutation table from a seed.
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];

        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates over the raw ChaCha8 stream
        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        for i in (1..256usize).rev() {
            let j = (rng.next_u32() as usize) % (i + 1);
            perm.swap(i, j);
        }

        perm.copy_within(0..256, 256);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index & 511])
    }
}

/// Seeded Perlin noise generator.
///
/// Produces smooth, continuous values in the range [-1, 1]. The generator
/// is immutable after construction and can be shared across threads.
///
/// # Example
///
/// ```rust,ignore
/// let noise = PerlinNoise::new(WorldSeed::new(42));
///
/// let value = noise.perlin_2d(100.5, 200.3);
/// assert!((-1.0..=1.0).contains(&value));
///
/// let terrain = noise.fractal_2d(x * 0.01, z * 0.01, FractalParams::TERRAIN);
/// ```
pub struct PerlinNoise {
    perm_table: PermutationTable,
}

impl PerlinNoise {
    /// Creates a new noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D Perlin noise.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn perlin_2d(&self, x: f64, y: f64) -> f64 {
        let xi = (fast_floor(x) & 255) as usize;
        let yi = (fast_floor(y) & 255) as usize;

        let x = x - x.floor();
        let y = y - y.floor();

        let u = fade(x);
        let v = fade(y);

        let p = &self.perm_table;
        let a = p.get(xi) + yi;
        let b = p.get(xi + 1) + yi;

        let value = lerp(
            v,
            lerp(u, grad_2d(p.get(a), x, y), grad_2d(p.get(b), x - 1.0, y)),
            lerp(
                u,
                grad_2d(p.get(a + 1), x, y - 1.0),
                grad_2d(p.get(b + 1), x - 1.0, y - 1.0),
            ),
        );

        value.clamp(-1.0, 1.0)
    }

    /// Samples 3D Perlin noise.
    ///
    /// # Returns
    ///
    /// A value in the range [-1, 1].
    #[must_use]
    pub fn perlin_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (fast_floor(x) & 255) as usize;
        let yi = (fast_floor(y) & 255) as usize;
        let zi = (fast_floor(z) & 255) as usize;

        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.perm_table;
        let a = p.get(xi) + yi;
        let aa = p.get(a) + zi;
        let ab = p.get(a + 1) + zi;
        let b = p.get(xi + 1) + yi;
        let ba = p.get(b) + zi;
        let bb = p.get(b + 1) + zi;

        let near = lerp(
            v,
            lerp(
                u,
                grad_3d(p.get(aa), x, y, z),
                grad_3d(p.get(ba), x - 1.0, y, z),
            ),
            lerp(
                u,
                grad_3d(p.get(ab), x, y - 1.0, z),
                grad_3d(p.get(bb), x - 1.0, y - 1.0, z),
            ),
        );
        let far = lerp(
            v,
            lerp(
                u,
                grad_3d(p.get(aa + 1), x, y, z - 1.0),
                grad_3d(p.get(ba + 1), x - 1.0, y, z - 1.0),
            ),
            lerp(
                u,
                grad_3d(p.get(ab + 1), x, y - 1.0, z - 1.0),
                grad_3d(p.get(bb + 1), x - 1.0, y - 1.0, z - 1.0),
            ),
        );

        lerp(w, near, far).clamp(-1.0, 1.0)
    }

    /// Generates fractal (octaved) 2D noise.
    ///
    /// Combines multiple layers of noise at different frequencies
    /// to create more natural-looking terrain. The sum is normalized by
    /// the total amplitude, so the result stays within [-1, 1].
    #[must_use]
    pub fn fractal_2d(&self, x: f64, y: f64, params: FractalParams) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..params.octaves {
            total += self.perlin_2d(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        total / max_amplitude
    }

    /// Generates fractal (octaved) 3D noise.
    #[must_use]
    pub fn fractal_3d(&self, x: f64, y: f64, z: f64, params: FractalParams) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..params.octaves {
            total += self.perlin_3d(x * frequency, y * frequency, z * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= params.persistence;
            frequency *= params.lacunarity;
        }

        total / max_amplitude
    }
}

/// Quintic smoothstep, `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of eight gradients: four diagonals, four axes.
#[inline]
fn grad_2d(hash: usize, x: f64, y: f64) -> f64 {
    match hash & 7 {
        0 => x + y,
        1 => -x + y,
        2 => x - y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

/// Dot product with one of the twelve cube-edge gradients (16 with repeats).
#[inline]
fn grad_3d(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

/// Fast floor function.
///
/// Faster than `f64::floor()` for our use case.
#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}
