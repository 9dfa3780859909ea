//! Free-floating dust attracted toward a moving point.
//!
//! Each particle drifts under random jitter and a slight downward bias,
//! and steers toward the attraction target while inside the capture
//! radius. No inter-particle forces; the update is O(n). Particles that
//! sink below the floor respawn at the top of the volume instead of
//! being destroyed.
//!
//! Integration is impulse-style per frame at a nominal 60 Hz, matching
//! the drifty hand-tuned feel: drag multiplies velocity by a constant
//! each step rather than scaling with dt.

use crate::morph::Instance;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Attractor field configuration.
#[derive(Clone, Copy, Debug)]
pub struct AttractorParams {
    /// Attraction applies only within this distance of the target.
    pub capture_radius: f32,
    /// Attraction impulse magnitude per step.
    pub strength: f32,
    /// Random jitter amplitude per axis per step.
    pub jitter: f32,
    /// Constant downward impulse per step.
    pub downward_bias: f32,
    /// Velocity multiplier per step.
    pub drag: f32,
    /// Particles below this y respawn.
    pub floor: f32,
    /// Respawn height.
    pub respawn_height: f32,
    /// Half-extent of the x/z spawn region.
    pub spread: f32,
    /// Particle size range.
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for AttractorParams {
    fn default() -> Self {
        Self {
            capture_radius: 10.0,
            strength: 0.5,
            jitter: 0.05,
            downward_bias: 0.02,
            drag: 0.96,
            floor: -10.0,
            respawn_height: 10.0,
            spread: 10.0,
            min_size: 0.05,
            max_size: 0.25,
        }
    }
}

struct Mote {
    position: Vec3,
    velocity: Vec3,
    acceleration: Vec3,
    size: f32,
}

/// A field of attractor-driven dust particles.
pub struct AttractorField {
    params: AttractorParams,
    motes: Vec<Mote>,
    rng: SmallRng,
}

impl AttractorField {
    /// Scatter `count` particles through the spawn volume.
    pub fn new(count: usize, params: AttractorParams) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        let mut rng = SmallRng::seed_from_u64(seed);

        let motes = (0..count)
            .map(|_| Mote {
                position: Vec3::new(
                    rng.gen_range(-params.spread..params.spread),
                    rng.gen_range(-params.spread..params.spread),
                    rng.gen_range(-params.spread..params.spread),
                ),
                velocity: Vec3::ZERO,
                acceleration: Vec3::ZERO,
                size: rng.gen_range(params.min_size..params.max_size),
            })
            .collect();

        Self { params, motes, rng }
    }

    /// Number of particles in the field.
    #[inline]
    pub fn len(&self) -> usize {
        self.motes.len()
    }

    /// Whether the field has no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.motes.is_empty()
    }

    /// Advance one frame, steering toward `target`.
    pub fn step(&mut self, target: Vec3) {
        let p = self.params;
        for mote in &mut self.motes {
            let diff = target - mote.position;
            let dist = diff.length();
            // A particle sitting exactly on the target gets no pull;
            // dividing by dist would NaN.
            if dist > f32::EPSILON && dist < p.capture_radius {
                mote.acceleration += diff / dist * p.strength;
            }

            mote.acceleration += Vec3::new(
                (self.rng.gen::<f32>() - 0.5) * p.jitter,
                (self.rng.gen::<f32>() - 0.5) * p.jitter - p.downward_bias,
                (self.rng.gen::<f32>() - 0.5) * p.jitter,
            );

            mote.velocity = mote.velocity * p.drag + mote.acceleration;
            mote.position += mote.velocity;
            mote.acceleration = Vec3::ZERO;

            if mote.position.y < p.floor {
                mote.position = Vec3::new(
                    self.rng.gen_range(-p.spread..p.spread),
                    p.respawn_height,
                    self.rng.gen_range(-p.spread..p.spread),
                );
                mote.velocity = Vec3::ZERO;
            }
        }
    }

    /// Write this frame's transforms into the instance buffer.
    ///
    /// The twist column carries a slow shared spin so motes sparkle as
    /// they tumble.
    pub fn instances_into(&self, elapsed: f32, out: &mut [Instance]) {
        assert_eq!(
            out.len(),
            self.motes.len(),
            "instance buffer does not match field size"
        );
        let gold = [1.0, 0.84, 0.0];
        for (mote, slot) in self.motes.iter().zip(out.iter_mut()) {
            *slot = Instance {
                position: mote.position.to_array(),
                twist: elapsed * 0.6,
                scale: mote.size,
                color: gold,
            };
        }
    }

    #[cfg(test)]
    fn place(&mut self, index: usize, position: Vec3, velocity: Vec3) {
        self.motes[index].position = position;
        self.motes[index].velocity = velocity;
    }
}
