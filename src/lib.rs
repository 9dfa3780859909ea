//! # Conifer
//!
//! CPU-side particle choreography and lightweight physics for morphing
//! point-cloud scenes.
//!
//! The principal scene is a large instanced particle cloud that morphs
//! between a dispersed "chaos" scatter and a formed conical tree, driven
//! by one smoothed global progress scalar and refined by per-particle
//! height staggering. Alongside it run a Verlet cloth banner trailing a
//! flying anchor and an attractor-driven dust field.
//!
//! Rendering is an external collaborator: the crate's outputs are
//! GPU-ready instance buffers ([`Instance`] is `bytemuck`-Pod) and the
//! cloth's deformed vertex and normal buffers. Feed inputs in, call
//! [`SceneController::update`] once per frame, upload the buffers.
//!
//! ## Quick Start
//!
//! ```ignore
//! use conifer::prelude::*;
//!
//! let mut scene = SceneController::new(SceneConfig::default())?;
//! scene.set_formed(true);
//!
//! // In your frame callback:
//! scene.update();
//! renderer.upload_instances(bytemuck::cast_slice(scene.foliage_instances()));
//! renderer.upload_cloth(scene.cloth().positions(), scene.cloth().normals());
//! ```
//!
//! ## Core Concepts
//!
//! ### Families
//!
//! A [`ParticleFamily`] is a fixed-size point set created once at
//! startup: each particle holds an immutable chaos position, an
//! immutable target position inside the formed shape, a color and a
//! precomputed stagger height. Families never resize.
//!
//! ### Progress and stagger
//!
//! One [`Progress`] scalar is smoothed toward 0 or 1 each frame and read
//! once by every family. The stagger formula offsets it per particle by
//! height, so assembly sweeps top-first and dispersal bottom-first; a
//! cubic ease and a vanishing spiral twist finish the motion.
//!
//! ### Physics
//!
//! The [`Cloth`] banner is a pinned Verlet grid with Gauss-Seidel
//! distance constraints; the [`AttractorField`] is free dust steered
//! toward the projected pointer. Both are Markovian: a bad frame
//! self-corrects on the next one.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`shape`] | Tiered-cone, helix and spiral target placement |
//! | [`family`] | Fixed particle sets and their generators |
//! | [`morph`] | Progress smoothing, stagger, easing, instance output |
//! | [`cloth`] | Verlet cloth with constraint relaxation |
//! | [`attractor`] | Pointer-attracted dust |
//! | [`drift`] | Stateless ambient snowfall |
//! | [`scene`] | The controller owning all of the above |

pub mod attractor;
pub mod cloth;
pub mod drift;
pub mod error;
pub mod family;
pub mod morph;
pub mod scene;
pub mod shape;
pub mod spawn;
pub mod time;

pub use bytemuck;
pub use glam::{Vec2, Vec3};

pub use attractor::{AttractorField, AttractorParams};
pub use cloth::{Cloth, ClothParams};
pub use drift::{DriftField, DriftParams};
pub use error::{ClothError, FamilyError, SceneError};
pub use family::{MotionStyle, OrnamentKind, ParticleFamily, StaggerWindow, MAX_FAMILY_PARTICLES};
pub use morph::{ease_in_out_cubic, evaluate_family, local_progress, Instance, MorphParams, Progress};
pub use scene::{FlightPath, SceneConfig, SceneController};
pub use shape::{Helix, TreeShape};
pub use spawn::SpawnContext;
pub use time::Time;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use conifer::prelude::*;
/// ```
pub mod prelude {
    pub use crate::attractor::{AttractorField, AttractorParams};
    pub use crate::cloth::{Cloth, ClothParams};
    pub use crate::drift::{DriftField, DriftParams};
    pub use crate::error::{ClothError, FamilyError, SceneError};
    pub use crate::family::{MotionStyle, OrnamentKind, ParticleFamily};
    pub use crate::morph::{Instance, MorphParams, Progress};
    pub use crate::scene::{FlightPath, SceneConfig, SceneController};
    pub use crate::shape::{Helix, TreeShape};
    pub use crate::spawn::SpawnContext;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3};
}
