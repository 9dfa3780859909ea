//! Particle families: fixed point sets with a chaos and a target arrangement.
//!
//! A family is created once at scene startup and never resized. Each
//! particle carries two immutable positions (a dispersed "chaos" scatter
//! and a formed "target" slot), a color, an optional ornament kind and a
//! precomputed stagger height used by the morph evaluator. Nothing here
//! changes per frame; the per-frame transforms live in [`crate::morph`].

use crate::error::FamilyError;
use crate::shape::{Helix, TreeShape};
use crate::spawn::SpawnContext;
use glam::Vec3;

/// Hard cap on per-family particle counts. Checked once at creation;
/// exceeding it is a configuration error, never a silent truncation.
pub const MAX_FAMILY_PARTICLES: usize = 1 << 20;

/// Ornament variants, drawn from a weighted distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrnamentKind {
    /// Boxy, heavy-looking pieces (15%).
    Heavy,
    /// Classic balls (45%).
    Ball,
    /// Small glowing bulbs (40%).
    Light,
}

/// Cosmetic idle motion layered on top of the morph interpolation.
///
/// Secondary motion never feeds back into the morph progress; it only
/// perturbs the final transform.
#[derive(Clone, Copy, Debug)]
pub enum MotionStyle {
    /// No idle motion.
    Static,
    /// Sinusoidal vertical bob, scaled by local progress so dispersed
    /// particles drift freely.
    Bob { amplitude: f32, rate: f32 },
    /// Three-axis sinusoidal sway with a per-index phase, scaled by
    /// local progress. A cheap stand-in for volumetric noise over a
    /// dense cloud.
    Sway { amplitude: f32, rate: f32 },
    /// Scale pulse with a per-index phase step, plus a slow breathing
    /// cycle shared by the whole family. Scale collapses to zero while
    /// dispersed.
    Twinkle { rate: f32, phase_step: f32 },
}

/// How a particle's stagger height `t` is derived from its target y.
///
/// The window deliberately covers less than the full shape height so the
/// assembly wave sweeps the visually dense region; heights outside it
/// clamp to the endpoints.
#[derive(Clone, Copy, Debug)]
pub struct StaggerWindow {
    /// Target y mapped to `t = 0`.
    pub base: f32,
    /// Height of the window; `base + span` maps to `t = 1`.
    pub span: f32,
}

impl Default for StaggerWindow {
    fn default() -> Self {
        Self { base: -10.0, span: 22.0 }
    }
}

impl StaggerWindow {
    /// Normalized, clamped stagger height for a target y.
    #[inline]
    pub fn normalize(&self, y: f32) -> f32 {
        ((y - self.base) / self.span).clamp(0.0, 1.0)
    }
}

/// A fixed-size set of particles sharing one generator and one evaluator
/// pass.
pub struct ParticleFamily {
    chaos: Vec<Vec3>,
    target: Vec<Vec3>,
    color: Vec<Vec3>,
    kind: Option<Vec<OrnamentKind>>,
    stagger: Vec<f32>,
    scale: Vec<f32>,
    motion: MotionStyle,
    twist_strength: f32,
}

fn check_count(count: usize) -> Result<(), FamilyError> {
    if count == 0 {
        return Err(FamilyError::Empty);
    }
    if count > MAX_FAMILY_PARTICLES {
        return Err(FamilyError::CapacityExceeded {
            requested: count,
            capacity: MAX_FAMILY_PARTICLES,
        });
    }
    Ok(())
}

fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}

impl ParticleFamily {
    /// Foliage points filling the cone volume.
    ///
    /// Chaos positions scatter uniformly in a sphere of radius 35. Colors
    /// are deep emerald greens lightening toward the top, with occasional
    /// gold highlights.
    pub fn foliage(count: usize, shape: &TreeShape) -> Result<Self, FamilyError> {
        check_count(count)?;
        let window = StaggerWindow::default();

        let mut chaos = Vec::with_capacity(count);
        let mut target = Vec::with_capacity(count);
        let mut color = Vec::with_capacity(count);
        let mut stagger = Vec::with_capacity(count);

        for i in 0..count {
            let mut ctx = SpawnContext::new(i, count);
            let t = shape.point_in_volume(&mut ctx);

            let c = if ctx.random() > 0.95 {
                // Gold highlight
                rgb(0xFFD700).lerp(rgb(0xFFAA00), ctx.random())
            } else {
                // Emerald, lighter toward the tips
                let h = (t.y + shape.height * 0.5) / shape.height;
                let mix = (h * 0.5 + ctx.random() * 0.5).clamp(0.0, 1.0);
                rgb(0x004020).lerp(rgb(0x006030), mix)
            };

            chaos.push(ctx.random_in_sphere(35.0));
            stagger.push(window.normalize(t.y));
            target.push(t);
            color.push(c);
        }

        log::debug!("foliage family: {} points", count);
        Ok(Self {
            chaos,
            target,
            color,
            kind: None,
            stagger,
            scale: vec![1.0; count],
            motion: MotionStyle::Sway { amplitude: 0.2, rate: 0.5 },
            twist_strength: 10.0,
        })
    }

    /// Ornaments sitting on the visible surface shell.
    ///
    /// Kinds are drawn 15% heavy / 45% ball / 40% light, each with its own
    /// palette and base scale. Chaos positions scatter in a 60-unit cube.
    pub fn ornaments(count: usize, shape: &TreeShape) -> Result<Self, FamilyError> {
        check_count(count)?;
        let window = StaggerWindow::default();

        let mut chaos = Vec::with_capacity(count);
        let mut target = Vec::with_capacity(count);
        let mut color = Vec::with_capacity(count);
        let mut kind = Vec::with_capacity(count);
        let mut stagger = Vec::with_capacity(count);
        let mut scale = Vec::with_capacity(count);

        for i in 0..count {
            let mut ctx = SpawnContext::new(i, count);
            let t = shape.point_on_surface(&mut ctx);

            let (k, c, s) = match ctx.pick_weighted(&[0.15, 0.45, 0.40]) {
                0 => {
                    let c = if ctx.random() > 0.6 { rgb(0xFFD700) } else { rgb(0x8B0000) };
                    (OrnamentKind::Heavy, c, 1.5)
                }
                1 => {
                    // Gold leads, silver and red trail.
                    let palette = [rgb(0xFFD700), rgb(0xE0E0E0), rgb(0xFF0000)];
                    let c = palette[ctx.pick_weighted(&[0.42, 0.30, 0.28])];
                    (OrnamentKind::Ball, c, 0.9)
                }
                _ => (OrnamentKind::Light, rgb(0xFFFFE0), 0.5),
            };

            chaos.push(ctx.random_in_cube(30.0));
            stagger.push(window.normalize(t.y));
            target.push(t);
            color.push(c);
            kind.push(k);
            scale.push(s);
        }

        log::debug!("ornament family: {} points", count);
        Ok(Self {
            chaos,
            target,
            color,
            kind: Some(kind),
            stagger,
            scale,
            motion: MotionStyle::Bob { amplitude: 0.05, rate: 2.0 },
            twist_strength: 10.0,
        })
    }

    /// Garland lights spaced evenly along a conical helix.
    ///
    /// The stagger height comes from the helix parameter rather than the
    /// shared window, so the running-light wave follows the winding order.
    /// Chaos positions explode outward: the target scaled by 3 plus a
    /// random cube offset.
    pub fn garland(count: usize, helix: &Helix) -> Result<Self, FamilyError> {
        check_count(count)?;

        let mut chaos = Vec::with_capacity(count);
        let mut target = Vec::with_capacity(count);
        let mut stagger = Vec::with_capacity(count);

        for i in 0..count {
            let mut ctx = SpawnContext::new(i, count);
            let t = helix.position(ctx.progress());
            chaos.push(t * 3.0 + ctx.random_in_cube(10.0));
            stagger.push(ctx.progress());
            target.push(t);
        }

        log::debug!("garland family: {} lights", count);
        Ok(Self {
            chaos,
            target,
            color: vec![Vec3::ONE; count],
            kind: None,
            stagger,
            scale: vec![1.0; count],
            motion: MotionStyle::Twinkle { rate: 3.0, phase_step: 0.2 },
            twist_strength: 15.0,
        })
    }

    /// Keepsake frames on a golden-angle spiral up the envelope.
    pub fn keepsakes(count: usize, shape: &TreeShape) -> Result<Self, FamilyError> {
        check_count(count)?;
        let window = StaggerWindow::default();

        let mut chaos = Vec::with_capacity(count);
        let mut target = Vec::with_capacity(count);
        let mut stagger = Vec::with_capacity(count);

        for i in 0..count {
            let mut ctx = SpawnContext::new(i, count);
            let t = shape.keepsake_position(i, count);
            chaos.push(ctx.random_in_cube(25.0));
            stagger.push(window.normalize(t.y));
            target.push(t);
        }

        log::debug!("keepsake family: {} frames", count);
        Ok(Self {
            chaos,
            target,
            color: vec![rgb(0xD4AF37); count],
            kind: None,
            stagger,
            scale: vec![1.0; count],
            motion: MotionStyle::Bob { amplitude: 0.2, rate: 1.5 },
            twist_strength: 10.0,
        })
    }

    /// Number of particles in the family.
    #[inline]
    pub fn len(&self) -> usize {
        self.target.len()
    }

    /// Whether the family is empty. Construction forbids this, so it is
    /// always false for a built family.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Dispersed positions, immutable after creation.
    #[inline]
    pub fn chaos(&self) -> &[Vec3] {
        &self.chaos
    }

    /// Formed positions, immutable after creation.
    #[inline]
    pub fn target(&self) -> &[Vec3] {
        &self.target
    }

    /// Static per-particle colors.
    #[inline]
    pub fn color(&self) -> &[Vec3] {
        &self.color
    }

    /// Ornament kinds, if this family has them.
    #[inline]
    pub fn kind(&self) -> Option<&[OrnamentKind]> {
        self.kind.as_deref()
    }

    /// Precomputed clamped stagger heights in `[0, 1]`.
    #[inline]
    pub fn stagger(&self) -> &[f32] {
        &self.stagger
    }

    /// Static base scales.
    #[inline]
    pub fn scale(&self) -> &[f32] {
        &self.scale
    }

    /// Idle motion style for this family.
    #[inline]
    pub fn motion(&self) -> MotionStyle {
        self.motion
    }

    /// Spiral twist strength in radians at full dispersion.
    #[inline]
    pub fn twist_strength(&self) -> f32 {
        self.twist_strength
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_precondition() {
        let shape = TreeShape::default();
        match ParticleFamily::foliage(MAX_FAMILY_PARTICLES + 1, &shape) {
            Err(FamilyError::CapacityExceeded { requested, capacity }) => {
                assert_eq!(requested, MAX_FAMILY_PARTICLES + 1);
                assert_eq!(capacity, MAX_FAMILY_PARTICLES);
            }
            _ => panic!("expected CapacityExceeded"),
        }
        assert!(matches!(
            ParticleFamily::foliage(0, &shape),
            Err(FamilyError::Empty)
        ));
    }

    #[test]
    fn test_foliage_buffers_consistent() {
        let family = ParticleFamily::foliage(500, &TreeShape::default()).unwrap();
        assert_eq!(family.len(), 500);
        assert_eq!(family.chaos().len(), 500);
        assert_eq!(family.target().len(), 500);
        assert_eq!(family.color().len(), 500);
        assert_eq!(family.stagger().len(), 500);
        assert!(family.kind().is_none());
        for t in family.stagger() {
            assert!(*t >= 0.0 && *t <= 1.0);
        }
    }

    #[test]
    fn test_ornament_kind_weights() {
        let family = ParticleFamily::ornaments(2_000, &TreeShape::default()).unwrap();
        let kinds = family.kind().unwrap();
        let heavy = kinds.iter().filter(|k| **k == OrnamentKind::Heavy).count();
        let light = kinds.iter().filter(|k| **k == OrnamentKind::Light).count();
        // Loose bands around 15% and 40%.
        assert!(heavy > 150 && heavy < 500);
        assert!(light > 550 && light < 1_100);
    }

    #[test]
    fn test_ball_palette_gold_dominant() {
        let family = ParticleFamily::ornaments(5_000, &TreeShape::default()).unwrap();
        let kinds = family.kind().unwrap();
        let gold = Vec3::new(0xFF as f32 / 255.0, 0xD7 as f32 / 255.0, 0.0);
        let red = Vec3::new(1.0, 0.0, 0.0);
        let (mut balls, mut gold_balls, mut red_balls) = (0usize, 0usize, 0usize);
        for (i, k) in kinds.iter().enumerate() {
            if *k == OrnamentKind::Ball {
                balls += 1;
                if family.color()[i] == gold {
                    gold_balls += 1;
                } else if family.color()[i] == red {
                    red_balls += 1;
                }
            }
        }
        // Around 42% gold and 28% red, in loose bands.
        let gold_share = gold_balls as f32 / balls as f32;
        let red_share = red_balls as f32 / balls as f32;
        assert!(gold_share > 0.36 && gold_share < 0.48, "gold share {}", gold_share);
        assert!(red_share > 0.22 && red_share < 0.34, "red share {}", red_share);
        assert!(gold_balls > red_balls);
    }

    #[test]
    fn test_garland_stagger_is_winding_order() {
        let family = ParticleFamily::garland(100, &Helix::default()).unwrap();
        let stagger = family.stagger();
        for i in 1..stagger.len() {
            assert!(stagger[i] > stagger[i - 1]);
        }
    }

    #[test]
    fn test_positions_generated_exactly_once() {
        let family = ParticleFamily::keepsakes(12, &TreeShape::default()).unwrap();
        let chaos_copy: Vec<_> = family.chaos().to_vec();
        let target_copy: Vec<_> = family.target().to_vec();
        // No API mutates the buffers; repeated reads are bit-identical.
        for _ in 0..3 {
            assert_eq!(family.chaos(), chaos_copy.as_slice());
            assert_eq!(family.target(), target_copy.as_slice());
        }
    }
}
