//! Hit records

use super::Float;

/// Result of a successful ray/surface intersection.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct HitRecord {
    /// Ray parameter at the intersection.
    pub t: Float,

    /// First surface coordinate, in [0, 1] inside the surface bounds.
    pub u: Float,

    /// Second surface coordinate, in [0, 1] inside the surface bounds.
    pub v: Float,
}

impl HitRecord {
    /// Returns a new hit record.
    ///
    /// * `t` - Ray parameter.
    /// * `u` - First surface coordinate.
    /// * `v` - Second surface coordinate.
    pub fn new(t: Float, u: Float, v: Float) -> Self {
        Self { t, u, v }
    }
}
