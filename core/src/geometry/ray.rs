//! Rays

use super::{Float, Point3f, Vector3f};

/// A ray with an origin and a direction. The direction is not required to be
/// unit length; the ray parameter `t` is measured in units of `d`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,
}

impl Ray {
    /// Returns a new ray.
    ///
    /// * `o` - Origin.
    /// * `d` - Direction.
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Self { o, d }
    }

    /// Get position along the ray at given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
