//! Error types for configuration-time preconditions.
//!
//! Per-frame stepping never fails: degenerate numerics (zero-length
//! constraint distances, oversized timesteps, out-of-range interpolation
//! parameters) are clamped or guarded at the point of use. Errors exist
//! only for preconditions checked once at creation.

use std::fmt;

/// Errors that can occur when creating a particle family.
#[derive(Debug)]
pub enum FamilyError {
    /// Requested particle count exceeds the preallocated buffer capacity.
    ///
    /// Families never truncate silently; pick a smaller count or raise
    /// the capacity limit.
    CapacityExceeded { requested: usize, capacity: usize },
    /// A family must contain at least one particle.
    Empty,
}

impl fmt::Display for FamilyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyError::CapacityExceeded { requested, capacity } => write!(
                f,
                "Requested {} particles but family capacity is {}",
                requested, capacity
            ),
            FamilyError::Empty => write!(f, "A particle family cannot be empty"),
        }
    }
}

impl std::error::Error for FamilyError {}

/// Errors that can occur when creating a cloth grid.
#[derive(Debug)]
pub enum ClothError {
    /// The grid needs at least 2x2 points to carry any constraints.
    DegenerateGrid { width: usize, height: usize },
    /// Rest length must be positive and finite.
    InvalidRestLength(f32),
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::DegenerateGrid { width, height } => write!(
                f,
                "Cloth grid must be at least 2x2 points, got {}x{}",
                width, height
            ),
            ClothError::InvalidRestLength(rest) => {
                write!(f, "Cloth rest length must be positive and finite, got {}", rest)
            }
        }
    }
}

impl std::error::Error for ClothError {}

/// Errors that can occur when building a scene.
#[derive(Debug)]
pub enum SceneError {
    /// A particle family failed its creation precondition.
    Family(FamilyError),
    /// The cloth banner configuration is invalid.
    Cloth(ClothError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Family(e) => write!(f, "Family error: {}", e),
            SceneError::Cloth(e) => write!(f, "Cloth error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::Family(e) => Some(e),
            SceneError::Cloth(e) => Some(e),
        }
    }
}

impl From<FamilyError> for SceneError {
    fn from(e: FamilyError) -> Self {
        SceneError::Family(e)
    }
}

impl From<ClothError> for SceneError {
    fn from(e: ClothError) -> Self {
        SceneError::Cloth(e)
    }
}
