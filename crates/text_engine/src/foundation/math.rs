//! Math utilities and types
//!
//! Provides the vector aliases used for pen positions and advances, plus the
//! axis-aligned [`BBox`] shared by glyph metrics and layout measurement.

use std::ops::{Add, AddAssign, BitOr, BitOrAssign};

pub use nalgebra::{Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Axis-aligned bounding box in pixel units
///
/// Text is laid out in 2D, so `z` stays at zero for every box the engine
/// produces. The y axis points up: `lower.y` is below the baseline for
/// descenders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    /// Minimum corner
    pub lower: Vec3,
    /// Maximum corner
    pub upper: Vec3,
}

impl Default for BBox {
    fn default() -> Self {
        Self {
            lower: Vec3::zeros(),
            upper: Vec3::zeros(),
        }
    }
}

impl BBox {
    /// Create a box from its two corners
    pub fn new(lower: Vec3, upper: Vec3) -> Self {
        Self { lower, upper }
    }

    /// Create a 2D box from its extents
    pub fn from_extents(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            lower: Vec3::new(min_x, min_y, 0.0),
            upper: Vec3::new(max_x, max_y, 0.0),
        }
    }

    /// A box that is not valid; the first union replaces it entirely
    pub fn invalid() -> Self {
        Self {
            lower: Vec3::new(1.0, 1.0, 1.0),
            upper: Vec3::new(-1.0, -1.0, -1.0),
        }
    }

    /// Whether the lower corner does not exceed the upper corner on any axis
    pub fn is_valid(&self) -> bool {
        self.lower.x <= self.upper.x && self.lower.y <= self.upper.y && self.lower.z <= self.upper.z
    }

    /// Width along x
    pub fn width(&self) -> f32 {
        self.upper.x - self.lower.x
    }

    /// Height along y
    pub fn height(&self) -> f32 {
        self.upper.y - self.lower.y
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        Self {
            lower: self.lower.inf(&other.lower),
            upper: self.upper.sup(&other.upper),
        }
    }

    /// Union with `other`, treating an invalid `self` as empty
    pub fn merge(&mut self, other: &Self) {
        if self.is_valid() {
            *self |= *other;
        } else {
            *self = *other;
        }
    }
}

impl Add<Vec3> for BBox {
    type Output = Self;

    fn add(self, offset: Vec3) -> Self {
        Self {
            lower: self.lower + offset,
            upper: self.upper + offset,
        }
    }
}

impl AddAssign<Vec3> for BBox {
    fn add_assign(&mut self, offset: Vec3) {
        self.lower += offset;
        self.upper += offset;
    }
}

impl BitOr for BBox {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        self.union(&other)
    }
}

impl BitOrAssign for BBox {
    fn bitor_assign(&mut self, other: Self) {
        *self = self.union(&other);
    }
}
