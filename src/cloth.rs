//! Cloth banner: Verlet point masses with distance-constraint relaxation.
//!
//! A `w x h` grid of points hangs from its first column, which is pinned
//! to an external anchor each frame (hard constraint, not a spring). Free
//! points integrate with implicit velocity, damped, under scaled-down
//! gravity and a sinusoidal wind. Structural links to the right and
//! below neighbors are relaxed Gauss-Seidel style for a fixed number of
//! iterations; the count trades stiffness for cost, not exactness.
//!
//! The grid topology and rest lengths never change after creation. State
//! is Markovian: a bad frame self-corrects on the next one.

use crate::error::ClothError;
use glam::Vec3;

/// Cloth configuration. Validated once when the grid is built.
#[derive(Clone, Copy, Debug)]
pub struct ClothParams {
    /// Grid columns. Column 0 is pinned.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Rest length of every structural link.
    pub rest_length: f32,
    /// Constraint relaxation passes per step.
    pub iterations: u32,
    /// Velocity damping applied during integration.
    pub damping: f32,
    /// Gravity acceleration (negative is down).
    pub gravity: f32,
    /// Gravity multiplier for the floaty banner look.
    pub gravity_scale: f32,
    /// Angular frequency of the sinusoidal wind.
    pub wind_frequency: f32,
    /// Positional wind amplitude per step.
    pub wind_strength: f32,
    /// Timestep clamp; frame hitches slow the cloth for one frame
    /// instead of destabilizing it.
    pub max_dt: f32,
}

impl Default for ClothParams {
    fn default() -> Self {
        Self {
            width: 10,
            height: 6,
            rest_length: 0.4,
            iterations: 3,
            damping: 0.98,
            gravity: -9.8,
            gravity_scale: 0.3,
            wind_frequency: 5.0,
            wind_strength: 0.005,
            max_dt: 0.03,
        }
    }
}

/// A structural link between two grid points, fixed at creation.
#[derive(Clone, Copy, Debug)]
struct Constraint {
    a: usize,
    b: usize,
    rest: f32,
}

/// Verlet cloth state.
pub struct Cloth {
    params: ClothParams,
    position: Vec<Vec3>,
    previous: Vec<Vec3>,
    /// 0 = pinned (infinite mass), 1 = free.
    mass: Vec<f32>,
    constraints: Vec<Constraint>,
    normals: Vec<Vec3>,
}

impl Cloth {
    /// Build the grid hanging flat from the origin, column 0 pinned.
    pub fn new(params: ClothParams) -> Result<Self, ClothError> {
        if params.width < 2 || params.height < 2 {
            return Err(ClothError::DegenerateGrid {
                width: params.width,
                height: params.height,
            });
        }
        if !(params.rest_length.is_finite() && params.rest_length > 0.0) {
            return Err(ClothError::InvalidRestLength(params.rest_length));
        }

        let (w, h, rest) = (params.width, params.height, params.rest_length);
        let count = w * h;
        let mut position = Vec::with_capacity(count);
        let mut mass = Vec::with_capacity(count);
        for y in 0..h {
            for x in 0..w {
                position.push(Vec3::new(x as f32 * rest, -(y as f32) * rest, 0.0));
                mass.push(if x == 0 { 0.0 } else { 1.0 });
            }
        }

        let mut constraints = Vec::with_capacity(2 * count);
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                if x < w - 1 {
                    constraints.push(Constraint { a: i, b: i + 1, rest });
                }
                if y < h - 1 {
                    constraints.push(Constraint { a: i, b: i + w, rest });
                }
            }
        }

        log::debug!("cloth grid: {}x{}, {} links", w, h, constraints.len());
        Ok(Self {
            params,
            previous: position.clone(),
            normals: vec![Vec3::Z; count],
            position,
            mass,
            constraints,
        })
    }

    /// Advance one frame with the pinned column tracking `anchor`.
    pub fn step(&mut self, anchor: Vec3, elapsed: f32, dt: f32) {
        let dt = dt.clamp(0.0, self.params.max_dt);
        self.pin(anchor);
        self.integrate(elapsed, dt);
        for _ in 0..self.params.iterations {
            self.relax();
        }
        self.update_normals();
    }

    /// Vertical offset of a pinned row from the anchor, centering the
    /// banner on it.
    fn pin_offset(&self, row: usize) -> f32 {
        let half = (self.params.height - 1) as f32 * self.params.rest_length * 0.5;
        half - row as f32 * self.params.rest_length
    }

    /// Force the pinned column onto the anchor bar, overwriting any
    /// integrated motion for those points.
    fn pin(&mut self, anchor: Vec3) {
        for row in 0..self.params.height {
            let i = row * self.params.width;
            self.position[i] = anchor + Vec3::new(0.0, self.pin_offset(row), 0.0);
        }
    }

    fn integrate(&mut self, elapsed: f32, dt: f32) {
        let gravity = self.params.gravity * self.params.gravity_scale * dt * dt;
        for i in 0..self.position.len() {
            if self.mass[i] == 0.0 {
                continue;
            }
            let current = self.position[i];
            let velocity = (current - self.previous[i]) * self.params.damping;
            self.previous[i] = current;

            // Sinusoidal gusts, a stylized stand-in for fluid flow.
            let phase = current.x * 0.5 + current.z * 0.5 + elapsed * self.params.wind_frequency;
            let gust = phase.sin() * self.params.wind_strength;

            self.position[i] = current + velocity + Vec3::new(gust, gravity, gust);
        }
    }

    /// One Gauss-Seidel pass over all structural links. Order-dependent;
    /// pinned endpoints never move.
    fn relax(&mut self) {
        for c in &self.constraints {
            let delta = self.position[c.b] - self.position[c.a];
            let dist = delta.length();
            if dist <= f32::EPSILON {
                // Coincident points: no direction to correct along.
                continue;
            }
            let diff = (dist - c.rest) / dist;
            let correction = delta * (0.5 * diff);
            if self.mass[c.a] != 0.0 {
                self.position[c.a] += correction;
            }
            if self.mass[c.b] != 0.0 {
                self.position[c.b] -= correction;
            }
        }
    }

    /// Recompute grid vertex normals from neighboring positions.
    fn update_normals(&mut self) {
        let (w, h) = (self.params.width, self.params.height);
        for y in 0..h {
            for x in 0..w {
                let i = y * w + x;
                let right = self.position[y * w + (x + 1).min(w - 1)]
                    - self.position[y * w + x.saturating_sub(1)];
                let down = self.position[(y + 1).min(h - 1) * w + x]
                    - self.position[y.saturating_sub(1) * w + x];
                let n = right.cross(down);
                self.normals[i] = if n.length_squared() > 1e-12 {
                    n.normalize()
                } else {
                    Vec3::Z
                };
            }
        }
    }

    /// Grid width in points.
    #[inline]
    pub fn width(&self) -> usize {
        self.params.width
    }

    /// Grid height in points.
    #[inline]
    pub fn height(&self) -> usize {
        self.params.height
    }

    /// Deformed vertex positions, row-major, for mesh upload.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.position
    }

    /// Vertex normals matching [`positions`](Self::positions).
    #[inline]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Whether a grid point is pinned.
    #[inline]
    pub fn is_pinned(&self, index: usize) -> bool {
        self.mass[index] == 0.0
    }

    /// World position the pinned point of `row` takes for a given anchor.
    pub fn pinned_position(&self, anchor: Vec3, row: usize) -> Vec3 {
        anchor + Vec3::new(0.0, self.pin_offset(row), 0.0)
    }

    /// Mean absolute deviation of link lengths from rest. Diagnostic for
    /// relaxation quality.
    pub fn mean_constraint_error(&self) -> f32 {
        let sum: f32 = self
            .constraints
            .iter()
            .map(|c| ((self.position[c.b] - self.position[c.a]).length() - c.rest).abs())
            .sum();
        sum / self.constraints.len() as f32
    }

    #[cfg(test)]
    fn relax_n(&mut self, n: u32) {
        for _ in 0..n {
            self.relax();
        }
    }
}
