//! Morph choreography: one smoothed global progress, per-particle stagger.
//!
//! Every frame the scene smooths a single scalar toward 0 (dispersed) or
//! 1 (formed), then each family maps that shared value to a per-particle
//! local progress offset by height. Points near the top assemble first
//! and disperse last, producing a wave that sweeps the shape instead of a
//! uniform cross-fade. The eased local progress drives position
//! interpolation, a vanishing spiral twist, and cosmetic idle motion.
//!
//! Transforms are written in place into a preallocated [`Instance`]
//! buffer; nothing allocates inside the frame loop.

use crate::family::{MotionStyle, ParticleFamily};
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::PI;

/// Per-instance transform, laid out for direct GPU upload.
///
/// One slot per particle, fully overwritten every frame. Renderers can
/// hand the whole buffer to an instanced draw via
/// `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Instance {
    /// World position.
    pub position: [f32; 3],
    /// Rotation about the vertical axis, in radians.
    pub twist: f32,
    /// Uniform scale.
    pub scale: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
}

/// Tuning constants for the morph wave.
///
/// The stagger and smoothing values are empirically tuned for visual
/// feel; there is no physical derivation behind them, so they stay
/// configurable rather than baked in.
#[derive(Clone, Copy, Debug)]
pub struct MorphParams {
    /// Exponential smoothing rate of the global progress, per second.
    pub smoothing: f32,
    /// Multiplier on global progress in the stagger formula.
    pub stagger_gain: f32,
    /// Width of the height-ordered stagger window.
    pub stagger_span: f32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            smoothing: 0.8,
            stagger_gain: 2.5,
            stagger_span: 1.5,
        }
    }
}

/// The single authoritative assemble/disperse scalar.
///
/// Exactly one writer (the scene controller) updates it once per frame;
/// every family evaluator reads the same value for that frame. The
/// exponential approach never quite reaches 0 or 1, but the stagger
/// formula saturates well before that.
#[derive(Clone, Copy, Debug, Default)]
pub struct Progress {
    value: f32,
    target: f32,
}

impl Progress {
    /// Start fully dispersed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target state: formed (1) or dispersed (0).
    pub fn set_formed(&mut self, formed: bool) {
        self.target = if formed { 1.0 } else { 0.0 };
    }

    /// Whether the target state is formed.
    #[inline]
    pub fn formed(&self) -> bool {
        self.target > 0.5
    }

    /// Smooth one step toward the target and return the new value.
    ///
    /// The blend factor is capped at 1 so a stalled frame overshoots to
    /// the target at worst, never past it.
    pub fn update(&mut self, rate: f32, dt: f32) -> f32 {
        let alpha = (rate * dt).clamp(0.0, 1.0);
        self.value += (self.target - self.value) * alpha;
        self.value
    }

    /// Current smoothed value in `[0, 1]`.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Explicit discontinuous reset, e.g. when restarting the scene.
    pub fn reset(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }
}

/// Cubic in-out easing, clamped to `[0, 1]`.
#[inline]
pub fn ease_in_out_cubic(x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

/// Height-staggered local progress, before easing.
///
/// `t` is the particle's normalized stagger height: 1 at the top of the
/// window, 0 at the bottom. Tops saturate first on assembly and last on
/// dispersal. Both `t` and the result are clamped; the linear formula
/// extrapolates outside `[0, 1]` otherwise.
#[inline]
pub fn local_progress(global: f32, t: f32, params: &MorphParams) -> f32 {
    let t = t.clamp(0.0, 1.0);
    (global * params.stagger_gain - (params.stagger_span - t * params.stagger_span))
        .clamp(0.0, 1.0)
}

/// Rotate a vector about the Y axis.
#[inline]
pub fn rotate_y(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(c * v.x + s * v.z, v.y, -s * v.x + c * v.z)
}

/// Evaluate one family into its instance buffer for this frame.
///
/// `global` must be the single progress value read once for the frame;
/// re-sampling it between families desynchronizes the wave. `out` must
/// have exactly one slot per particle.
pub fn evaluate_family(
    family: &ParticleFamily,
    global: f32,
    elapsed: f32,
    params: &MorphParams,
    out: &mut [Instance],
) {
    assert_eq!(
        out.len(),
        family.len(),
        "instance buffer does not match family size"
    );

    let chaos = family.chaos();
    let target = family.target();
    let color = family.color();
    let stagger = family.stagger();
    let base_scale = family.scale();
    let motion = family.motion();
    let twist_strength = family.twist_strength();

    // Shared breathing cycle, only used by twinkling families.
    let breath = (elapsed * PI).sin() * 0.15 + 1.0;

    for i in 0..family.len() {
        let p = ease_in_out_cubic(local_progress(global, stagger[i], params));

        // Particles still in chaos spiral toward their slot instead of
        // flying straight in; the twist vanishes as p reaches 1.
        let twist = (1.0 - p) * twist_strength;
        let mut position = rotate_y(chaos[i].lerp(target[i], p), twist);
        let mut scale = base_scale[i];

        match motion {
            MotionStyle::Static => {}
            MotionStyle::Bob { amplitude, rate } => {
                position.y += (elapsed * rate + i as f32).sin() * amplitude * p;
            }
            MotionStyle::Sway { amplitude, rate } => {
                let phase = i as f32 * 0.37;
                position.x += (elapsed * rate + phase).sin() * amplitude * p;
                position.y += (elapsed * rate * 0.8 + phase * 1.3).cos() * amplitude * p;
                position.z += (elapsed * rate * 1.1 + phase * 0.7).sin() * amplitude * p;
            }
            MotionStyle::Twinkle { rate, phase_step } => {
                let pulse = (elapsed * rate + i as f32 * phase_step).sin() * 0.5 + 0.5;
                scale *= (0.5 + pulse * 0.5) * breath * p;
            }
        }

        out[i] = Instance {
            position: position.to_array(),
            twist,
            scale,
            color: color[i].to_array(),
        };
    }
}
