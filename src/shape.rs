//! Tiered-cone geometry for the formed shape.
//!
//! Produces the "target" half of every particle family: points inside the
//! segmented cone volume, on its visible surface shell, along a conical
//! helix (garland lights) or on a golden-angle spiral (keepsake frames).
//! Pure sampling with no temporal state; a family calls these once at
//! creation and never again.

use crate::spawn::SpawnContext;
use glam::Vec3;
use std::f32::consts::TAU;

/// Retry cap for surface rejection sampling. On exhaustion the last
/// candidate height is accepted rather than recursing further.
const MAX_SURFACE_ATTEMPTS: u32 = 32;

/// A stylized conical tree: a tapered cone with repeated flared bands.
///
/// The silhouette reads as stacked branch layers rather than a smooth
/// cone: a global envelope `R * (1 - h)^taper` is modulated by a sawtooth
/// tier factor that flares at the bottom of each band and cuts in at the
/// top.
#[derive(Clone, Copy, Debug)]
pub struct TreeShape {
    /// Total height of the cone.
    pub height: f32,
    /// Radius at the base.
    pub radius: f32,
    /// Number of flared bands along the height.
    pub tiers: u32,
    /// Taper exponent of the global envelope.
    pub taper: f32,
}

impl Default for TreeShape {
    /// Height : base diameter of 44 : 28, seven tiers.
    fn default() -> Self {
        Self {
            height: 44.0,
            radius: 14.0,
            tiers: 7,
            taper: 1.1,
        }
    }
}

impl TreeShape {
    /// Maximum allowed radius at a normalized height in `[0, 1]`.
    ///
    /// Combines the tapering envelope with the per-tier flare. The tier
    /// factor runs 1.0 at the bottom of each band down to 0.4 at its top,
    /// producing the under-cut of each branch layer.
    pub fn radius_at(&self, normalized_h: f32) -> f32 {
        let h = normalized_h.clamp(0.0, 1.0);
        let tier_phase = (h * self.tiers as f32) % 1.0;
        let tier_factor = 0.4 + 0.6 * (1.0 - tier_phase).powf(1.2);
        self.envelope_radius(h) * tier_factor
    }

    /// Envelope radius without the tier flare, for placements that sit
    /// just outside the foliage (keepsake frames).
    pub fn envelope_radius(&self, normalized_h: f32) -> f32 {
        let h = normalized_h.clamp(0.0, 1.0);
        self.radius * (1.0 - h).powf(self.taper)
    }

    /// Random point inside the cone volume, biased toward the outer shell.
    ///
    /// The radial law `0.2 + 0.8 * sqrt(u)` pushes most of the mass into
    /// the outer band, filling branches rather than the trunk core.
    /// Output is centered vertically: y runs from `-height/2` to
    /// `+height/2`.
    pub fn point_in_volume(&self, ctx: &mut SpawnContext) -> Vec3 {
        let y = ctx.random() * self.height;
        let max_r = self.radius_at(y / self.height);
        let r = max_r * (0.2 + 0.8 * ctx.random().sqrt());
        let angle = ctx.random() * TAU;
        Vec3::new(angle.cos() * r, y - self.height * 0.5, angle.sin() * r)
    }

    /// Random point on the visible surface shell.
    ///
    /// Rejection sampling thins points toward the sparse tip
    /// (`reject if u > 1 - h * 0.7`); the retry loop is bounded so
    /// pathological parameters cannot spin forever. The radial offset is
    /// restricted to the outer `[0.9, 1.0]` shell of the allowed radius.
    pub fn point_on_surface(&self, ctx: &mut SpawnContext) -> Vec3 {
        let mut y = ctx.random() * self.height;
        for _ in 0..MAX_SURFACE_ATTEMPTS {
            if ctx.random() <= 1.0 - (y / self.height) * 0.7 {
                break;
            }
            y = ctx.random() * self.height;
        }
        let max_r = self.radius_at(y / self.height);
        let r = max_r * (0.9 + 0.1 * ctx.random());
        let angle = ctx.random() * TAU;
        Vec3::new(angle.cos() * r, y - self.height * 0.5, angle.sin() * r)
    }

    /// Golden-angle spiral placement up the lower 80% of the envelope,
    /// pushed one unit outside the foliage surface so frames float clear
    /// of the points.
    pub fn keepsake_position(&self, index: usize, count: usize) -> Vec3 {
        let y = (index as f32 / count.max(1) as f32) * self.height * 0.8;
        let r = self.envelope_radius(y / self.height) + 1.0;
        // Roughly 137.5 degrees per step.
        let angle = index as f32 * 2.4;
        Vec3::new(angle.cos() * r, y - self.height * 0.5, angle.sin() * r)
    }
}

/// A conical helix for evenly spaced garland lights.
#[derive(Clone, Copy, Debug)]
pub struct Helix {
    /// Complete wraps from bottom to top.
    pub turns: f32,
    /// Radius at the bottom of the helix.
    pub bottom_radius: f32,
    /// Radius at the top. Nonzero avoids pinching at the tip.
    pub top_radius: f32,
    /// Y of the lowest point.
    pub bottom_y: f32,
    /// Y of the highest point.
    pub top_y: f32,
}

impl Default for Helix {
    fn default() -> Self {
        Self {
            turns: 8.0,
            bottom_radius: 16.0,
            top_radius: 2.0,
            bottom_y: -20.0,
            top_y: 15.0,
        }
    }
}

impl Helix {
    /// Point on the helix at parameter `t` in `[0, 1]` (bottom to top).
    pub fn position(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let angle = t * self.turns * TAU;
        let radius = self.bottom_radius + (self.top_radius - self.bottom_radius) * t;
        let y = self.bottom_y + (self.top_y - self.bottom_y) * t;
        Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_tapers_to_zero() {
        let shape = TreeShape::default();
        assert!(shape.radius_at(1.0) < 0.001);
        assert!(shape.radius_at(0.0) > shape.radius_at(0.99));
    }

    #[test]
    fn test_radius_clamps_input() {
        let shape = TreeShape::default();
        assert_eq!(shape.radius_at(-0.5), shape.radius_at(0.0));
        assert_eq!(shape.radius_at(1.5), shape.radius_at(1.0));
    }

    #[test]
    fn test_tier_flare_within_envelope() {
        let shape = TreeShape::default();
        for i in 0..100 {
            let h = i as f32 / 100.0;
            let r = shape.radius_at(h);
            let envelope = shape.envelope_radius(h);
            assert!(r <= envelope + 0.001);
            assert!(r >= envelope * 0.4 - 0.001);
        }
    }

    #[test]
    fn test_volume_points_inside_allowed_radius() {
        let shape = TreeShape::default();
        let mut ctx = SpawnContext::new(0, 1);
        for _ in 0..1_000 {
            let p = shape.point_in_volume(&mut ctx);
            let h = (p.y + shape.height * 0.5) / shape.height;
            assert!(h >= 0.0 && h <= 1.0);
            let radial = Vec3::new(p.x, 0.0, p.z).length();
            assert!(radial <= shape.radius_at(h) + 0.001);
        }
    }

    #[test]
    fn test_volume_radial_outer_bias() {
        // The radial law maps to [0.2, 1.0] of the allowed radius, with
        // the median above 0.7 of it.
        let shape = TreeShape::default();
        let mut ctx = SpawnContext::new(0, 1);
        let mut ratios = Vec::with_capacity(5_000);
        for _ in 0..5_000 {
            let p = shape.point_in_volume(&mut ctx);
            let h = (p.y + shape.height * 0.5) / shape.height;
            let max_r = shape.radius_at(h);
            if max_r > 0.01 {
                let radial = Vec3::new(p.x, 0.0, p.z).length();
                ratios.push(radial / max_r);
            }
        }
        for r in &ratios {
            assert!(*r >= 0.2 - 0.001 && *r <= 1.0 + 0.001);
        }
        ratios.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = ratios[ratios.len() / 2];
        assert!(median > 0.7, "median radial ratio {} too low", median);
    }

    #[test]
    fn test_surface_points_in_thin_shell() {
        let shape = TreeShape::default();
        let mut ctx = SpawnContext::new(0, 1);
        for _ in 0..1_000 {
            let p = shape.point_on_surface(&mut ctx);
            let h = (p.y + shape.height * 0.5) / shape.height;
            let max_r = shape.radius_at(h);
            let radial = Vec3::new(p.x, 0.0, p.z).length();
            assert!(radial >= max_r * 0.9 - 0.001 && radial <= max_r + 0.001);
        }
    }

    #[test]
    fn test_surface_favors_lower_heights() {
        let shape = TreeShape::default();
        let mut ctx = SpawnContext::new(0, 1);
        let mut lower = 0usize;
        let total = 10_000;
        for _ in 0..total {
            let p = shape.point_on_surface(&mut ctx);
            if p.y < 0.0 {
                lower += 1;
            }
        }
        // Uniform sampling would give ~50%; the rejection law shifts
        // clearly more than that to the lower half.
        assert!(lower as f32 / total as f32 > 0.55);
    }

    #[test]
    fn test_helix_endpoints() {
        let helix = Helix::default();
        let bottom = helix.position(0.0);
        let top = helix.position(1.0);
        assert!((bottom.y - helix.bottom_y).abs() < 0.001);
        assert!((top.y - helix.top_y).abs() < 0.001);
        assert!((Vec3::new(bottom.x, 0.0, bottom.z).length() - helix.bottom_radius).abs() < 0.01);
        assert!((Vec3::new(top.x, 0.0, top.z).length() - helix.top_radius).abs() < 0.01);
    }

    #[test]
    fn test_keepsake_spiral_stays_outside_envelope() {
        let shape = TreeShape::default();
        for i in 0..12 {
            let p = shape.keepsake_position(i, 12);
            let h = (p.y + shape.height * 0.5) / shape.height;
            let radial = Vec3::new(p.x, 0.0, p.z).length();
            assert!(radial >= shape.envelope_radius(h) + 0.99);
        }
    }
}
