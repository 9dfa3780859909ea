//! Ambient snowfall: stateless drift evaluated from elapsed time.
//!
//! Flakes carry static base positions plus per-flake fall speed, drift
//! frequency, amplitude, phase and size drawn once at creation. The
//! per-frame transform is a pure function of elapsed time: a modular
//! fall that wraps around the volume, with sinusoidal lateral drift.
//! Nothing integrates, so the field needs no per-frame state and cannot
//! drift numerically.

use crate::morph::Instance;
use crate::spawn::SpawnContext;
use glam::Vec3;

/// Snowfall configuration.
#[derive(Clone, Copy, Debug)]
pub struct DriftParams {
    /// Horizontal extent of the volume (full width).
    pub range: f32,
    /// Vertical extent of the fall (full height); flakes wrap within it.
    pub fall_height: f32,
    /// Upward shift of the spawn band so flakes start above the scene.
    pub lift: f32,
    /// Fall speed range in units per second.
    pub min_fall_speed: f32,
    pub max_fall_speed: f32,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            range: 80.0,
            fall_height: 80.0,
            lift: 20.0,
            min_fall_speed: 4.5,
            max_fall_speed: 7.0,
        }
    }
}

struct Flake {
    base: Vec3,
    fall_speed: f32,
    drift_frequency: f32,
    drift_amplitude: f32,
    phase: f32,
    size: f32,
}

/// A field of drifting snow.
pub struct DriftField {
    params: DriftParams,
    flakes: Vec<Flake>,
}

impl DriftField {
    /// Scatter `count` flakes through the volume.
    pub fn new(count: usize, params: DriftParams) -> Self {
        let flakes = (0..count)
            .map(|i| {
                let mut ctx = SpawnContext::new(i, count);
                let base = Vec3::new(
                    (ctx.random() - 0.5) * params.range,
                    (ctx.random() - 0.5) * params.fall_height + params.lift,
                    (ctx.random() - 0.5) * params.range,
                );
                // One draw feeds both drift terms, so fast wobblers also
                // swing wide.
                let drift = ctx.random();
                Flake {
                    base,
                    fall_speed: ctx.random_range(params.min_fall_speed, params.max_fall_speed),
                    drift_frequency: drift * 2.0 + 1.0,
                    drift_amplitude: drift * 2.0 + 0.5,
                    phase: ctx.random_range(0.0, std::f32::consts::TAU),
                    size: ctx.random_range(1.0, 3.0),
                }
            })
            .collect();

        Self { params, flakes }
    }

    /// Number of flakes.
    #[inline]
    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    /// Whether the field has no flakes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    /// Write the transforms for an instant in time into the buffer.
    pub fn instances_into(&self, elapsed: f32, out: &mut [Instance]) {
        assert_eq!(
            out.len(),
            self.flakes.len(),
            "instance buffer does not match field size"
        );
        let half = self.params.fall_height * 0.5;
        for (flake, slot) in self.flakes.iter().zip(out.iter_mut()) {
            let mut y = flake.base.y - (elapsed * flake.fall_speed).rem_euclid(self.params.fall_height);
            if y < -half {
                y += self.params.fall_height;
            }
            let x = flake.base.x
                + (elapsed * flake.drift_frequency + flake.phase).sin() * flake.drift_amplitude;
            let z = flake.base.z
                + (elapsed * flake.drift_frequency * 0.8 + flake.phase).cos() * flake.drift_amplitude;

            *slot = Instance {
                position: [x, y, z],
                twist: 0.0,
                scale: flake.size,
                color: [1.0, 1.0, 1.0],
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_wraps_within_band() {
        let params = DriftParams::default();
        let field = DriftField::new(200, params);
        let mut out = vec![Instance::default(); field.len()];
        for step in 0..50 {
            let elapsed = step as f32 * 1.7;
            field.instances_into(elapsed, &mut out);
            for inst in &out {
                let y = inst.position[1];
                let max_y = params.fall_height * 0.5 + params.lift + params.fall_height;
                assert!(y > -params.fall_height && y < max_y, "flake escaped: {}", y);
            }
        }
    }

    #[test]
    fn test_evaluation_is_stateless() {
        let field = DriftField::new(64, DriftParams::default());
        let mut a = vec![Instance::default(); 64];
        let mut b = vec![Instance::default(); 64];
        field.instances_into(3.5, &mut a);
        field.instances_into(100.0, &mut b);
        field.instances_into(3.5, &mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_drift_stays_near_base_column() {
        let field = DriftField::new(64, DriftParams::default());
        let mut out = vec![Instance::default(); 64];
        field.instances_into(7.3, &mut out);
        for (flake, inst) in field.flakes.iter().zip(&out) {
            assert!((inst.position[0] - flake.base.x).abs() <= flake.drift_amplitude + 1e-4);
            assert!((inst.position[2] - flake.base.z).abs() <= flake.drift_amplitude + 1e-4);
        }
    }
}
