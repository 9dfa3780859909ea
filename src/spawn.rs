//! Spawn context for randomized point generation.
//!
//! All generator randomness flows through [`SpawnContext`] so family
//! constructors stay free of RNG boilerplate. Generation is intentionally
//! unseeded across runs; within a run each particle index gets its own
//! deterministic stream.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Context handed to point generators, with helpers for common patterns.
///
/// ```ignore
/// let mut ctx = SpawnContext::new(i, count);
/// let chaos = ctx.random_in_sphere(35.0);
/// ```
pub struct SpawnContext {
    /// Index of the particle being generated (0 to count-1).
    pub index: usize,
    /// Total number of particles in the family.
    pub count: usize,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a new spawn context for one particle.
    pub fn new(index: usize, count: usize) -> Self {
        // Seed per index for distinct streams within a run, but different
        // each program execution.
        let seed = index as u64
            ^ (std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42));

        Self {
            index,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Normalized progress through the family (0.0 to 1.0).
    ///
    /// Useful for evenly spaced placements such as helix points.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count <= 1 {
            0.0
        } else {
            self.index as f32 / (self.count - 1) as f32
        }
    }

    // ========== Random primitives ==========

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in the given range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        self.rng.gen_range(min..max)
    }

    // ========== Position helpers ==========

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Distribution is uniform throughout the volume.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let theta = self.rng.gen_range(0.0..TAU);
        // Sin-weighted polar angle; a uniform angle piles density at the
        // poles.
        let phi = (1.0 - 2.0 * self.rng.gen::<f32>()).acos();
        // Cube root for uniform volume distribution
        let r = radius * self.rng.gen::<f32>().cbrt();

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Random point inside a cube of given half-size, centered at origin.
    ///
    /// For a cube from -30 to 30, use `half_size = 30.0`.
    pub fn random_in_cube(&mut self, half_size: f32) -> Vec3 {
        Vec3::new(
            self.rng.gen_range(-half_size..half_size),
            self.rng.gen_range(-half_size..half_size),
            self.rng.gen_range(-half_size..half_size),
        )
    }

    // ========== Categorical helpers ==========

    /// Pick an index from a weighted categorical distribution.
    ///
    /// Weights need not sum to 1. Returns the last index if rounding
    /// leaves the draw past the final bucket.
    pub fn pick_weighted(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().sum();
        if total <= 0.0 || weights.is_empty() {
            return 0;
        }
        let mut draw = self.rng.gen::<f32>() * total;
        for (i, w) in weights.iter().enumerate() {
            if draw < *w {
                return i;
            }
            draw -= w;
        }
        weights.len() - 1
    }
}
