//! Quad orientations

use core_lib::geometry::*;
use core_lib::pbrt::*;

/// The six axis-aligned orientations a quad of the enclosure can take. Each
/// one fixes a single axis and faces into the enclosure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// XY plane at the low z bound, facing +z.
    Back,

    /// YZ plane at the low x bound, facing +x.
    Left,

    /// XZ plane at the low y bound, facing +y.
    Floor,

    /// YZ plane at the high x bound, facing -x.
    Right,

    /// XZ plane at the high y bound, facing -y.
    Ceiling,

    /// XY plane at the high z bound, facing -z.
    Front,
}

/// Axis pairing and (u, v) remap of an orientation.
struct OrientationData {
    /// The axis held constant over the quad.
    fixed: Axis,

    /// Axis measured by the hit's u coordinate.
    u_axis: Axis,

    /// Axis measured by the hit's v coordinate.
    v_axis: Axis,

    /// Mirror u so it runs left to right when seen from inside.
    flip_u: bool,

    /// Mirror v so it runs bottom to top when seen from inside.
    flip_v: bool,

    /// Sign of the inward normal along the fixed axis.
    facing: Float,
}

const BACK: OrientationData = OrientationData {
    fixed: Axis::Z,
    u_axis: Axis::X,
    v_axis: Axis::Y,
    flip_u: false,
    flip_v: false,
    facing: 1.0,
};

const LEFT: OrientationData = OrientationData {
    fixed: Axis::X,
    u_axis: Axis::Z,
    v_axis: Axis::Y,
    flip_u: true,
    flip_v: false,
    facing: 1.0,
};

const FLOOR: OrientationData = OrientationData {
    fixed: Axis::Y,
    u_axis: Axis::Z,
    v_axis: Axis::X,
    flip_u: true,
    flip_v: true,
    facing: 1.0,
};

const RIGHT: OrientationData = OrientationData {
    fixed: Axis::X,
    u_axis: Axis::Z,
    v_axis: Axis::Y,
    flip_u: false,
    flip_v: false,
    facing: -1.0,
};

const CEILING: OrientationData = OrientationData {
    fixed: Axis::Y,
    u_axis: Axis::Z,
    v_axis: Axis::X,
    flip_u: false,
    flip_v: true,
    facing: -1.0,
};

const FRONT: OrientationData = OrientationData {
    fixed: Axis::Z,
    u_axis: Axis::X,
    v_axis: Axis::Y,
    flip_u: true,
    flip_v: false,
    facing: -1.0,
};

impl Orientation {
    /// All orientations.
    pub const ALL: [Orientation; 6] = [
        Orientation::Back,
        Orientation::Left,
        Orientation::Floor,
        Orientation::Right,
        Orientation::Ceiling,
        Orientation::Front,
    ];

    fn data(&self) -> &'static OrientationData {
        match self {
            Orientation::Back => &BACK,
            Orientation::Left => &LEFT,
            Orientation::Floor => &FLOOR,
            Orientation::Right => &RIGHT,
            Orientation::Ceiling => &CEILING,
            Orientation::Front => &FRONT,
        }
    }

    /// Returns the axis held constant over the quad.
    pub fn fixed_axis(&self) -> Axis {
        self.data().fixed
    }

    /// Returns the axes measured by the hit's (u, v) coordinates.
    pub fn uv_axes(&self) -> (Axis, Axis) {
        let d = self.data();
        (d.u_axis, d.v_axis)
    }

    /// Returns whether u and v are mirrored when mapped to the visual frame.
    pub fn flips(&self) -> (bool, bool) {
        let d = self.data();
        (d.flip_u, d.flip_v)
    }

    /// Returns the unit normal pointing into the enclosure.
    pub fn normal(&self) -> Vector3f {
        let mut n = Vector3f::zero();
        n[self.data().fixed] = self.data().facing;
        n
    }

    /// Maps raw hit coordinates to the visual frame where increasing s runs
    /// left to right and increasing t runs bottom to top as seen from inside
    /// the enclosure. The mapping is its own inverse.
    ///
    /// * `u` - Raw coordinate along the u axis.
    /// * `v` - Raw coordinate along the v axis.
    pub fn to_visual(&self, u: Float, v: Float) -> (Float, Float) {
        let (flip_u, flip_v) = self.flips();
        (
            if flip_u { 1.0 - u } else { u },
            if flip_v { 1.0 - v } else { v },
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_axes_differ_from_fixed_axis() {
        for o in Orientation::ALL {
            let (u, v) = o.uv_axes();
            assert_ne!(u, o.fixed_axis());
            assert_ne!(v, o.fixed_axis());
            assert_ne!(u, v);
        }
    }

    #[test]
    fn normals_are_unit_and_along_fixed_axis() {
        for o in Orientation::ALL {
            let n = o.normal();
            assert_eq!(n.length(), 1.0);
            assert_eq!(n[o.fixed_axis()].abs(), 1.0);
        }
    }

    #[test]
    fn opposite_sides_face_each_other() {
        let pairs = [
            (Orientation::Back, Orientation::Front),
            (Orientation::Left, Orientation::Right),
            (Orientation::Floor, Orientation::Ceiling),
        ];
        for (a, b) in pairs {
            assert_eq!(a.normal(), -b.normal());
        }
    }

    #[test]
    fn to_visual_is_an_involution() {
        for o in Orientation::ALL {
            let (s, t) = o.to_visual(0.25, 0.75);
            assert_eq!(o.to_visual(s, t), (0.25, 0.75));
        }
    }
}
