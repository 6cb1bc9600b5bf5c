//! Axis-aligned quads

use super::orientation::*;
use core_lib::geometry::*;
use core_lib::pbrt::*;
use core_lib::spectrum::*;

/// Unique element index; also the row/column of the element in the
/// form-factor matrix.
pub type ElemIndex = usize;

/// Corners of a quad in the visual frame of its orientation. The numbering
/// matches the bilinear blend: corner 0 is at (s, t) = (0, 0), corner 1 at
/// (1, 0), corner 2 at (0, 1) and corner 3 at (1, 1).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Corner {
    BottomLeft = 0,
    BottomRight = 1,
    TopLeft = 2,
    TopRight = 3,
}

impl Corner {
    /// All corners in blend order.
    pub const ALL: [Corner; 4] = [
        Corner::BottomLeft,
        Corner::BottomRight,
        Corner::TopLeft,
        Corner::TopRight,
    ];

    /// Returns the (column, row) offset of the corner from the bottom left
    /// corner of its cell in a face grid.
    pub fn grid_offset(&self) -> (isize, isize) {
        match self {
            Corner::BottomLeft => (0, 0),
            Corner::BottomRight => (1, 0),
            Corner::TopLeft => (0, 1),
            Corner::TopRight => (1, 1),
        }
    }
}

/// Running weighted sum of colour contributions deposited on a corner.
#[derive(Copy, Clone, Debug, Default)]
struct CornerAccumulator {
    sum: RGBSpectrum,
    weight: Float,
}

/// A planar axis-aligned rectangle of the enclosure.
#[derive(Clone, Debug)]
pub struct Quad {
    /// Orientation (fixed axis, uv pairing and facing).
    pub orientation: Orientation,

    /// Offset of the quad's plane along the fixed axis.
    pub k: Float,

    /// Bounds along the u axis.
    pub u_range: (Float, Float),

    /// Bounds along the v axis.
    pub v_range: (Float, Float),

    /// Unique element index.
    pub index: ElemIndex,

    /// Corner colours in `Corner` order.
    corners: [RGBSpectrum; 4],

    /// Contributions deposited on each corner.
    accumulators: [CornerAccumulator; 4],
}

impl Quad {
    /// Create a new quad.
    ///
    /// * `orientation` - Orientation of the quad.
    /// * `k`           - Offset of the plane along the fixed axis.
    /// * `u_range`     - Bounds along the u axis; must be non-empty.
    /// * `v_range`     - Bounds along the v axis; must be non-empty.
    /// * `index`       - Unique element index.
    /// * `corners`     - Initial corner colours in `Corner` order.
    pub fn new(
        orientation: Orientation,
        k: Float,
        u_range: (Float, Float),
        v_range: (Float, Float),
        index: ElemIndex,
        corners: [RGBSpectrum; 4],
    ) -> Self {
        assert!(u_range.0 < u_range.1, "empty u range {:?}", u_range);
        assert!(v_range.0 < v_range.1, "empty v range {:?}", v_range);

        Self {
            orientation,
            k,
            u_range,
            v_range,
            index,
            corners,
            accumulators: [CornerAccumulator::default(); 4],
        }
    }

    /// Returns the unit normal pointing into the enclosure.
    pub fn normal(&self) -> Vector3f {
        self.orientation.normal()
    }

    /// Returns the world space point at raw surface coordinates (u, v).
    ///
    /// * `u` - Coordinate along the u axis.
    /// * `v` - Coordinate along the v axis.
    pub fn point_at(&self, u: Float, v: Float) -> Point3f {
        let (u_axis, v_axis) = self.orientation.uv_axes();
        let mut p = Vector3f::zero();
        p[self.orientation.fixed_axis()] = self.k;
        p[u_axis] = lerp(u, self.u_range.0, self.u_range.1);
        p[v_axis] = lerp(v, self.v_range.0, self.v_range.1);
        Point3f::from(p)
    }

    /// Returns the centre of the quad.
    pub fn centre(&self) -> Point3f {
        self.point_at(0.5, 0.5)
    }

    /// Returns the area of the quad.
    pub fn area(&self) -> Float {
        (self.u_range.1 - self.u_range.0) * (self.v_range.1 - self.v_range.0)
    }

    /// Returns the intersection of a ray with the quad if the crossing lies
    /// within [t_min, t_max] and inside the bounds. Bounds are inclusive.
    /// Rays parallel to the plane never hit.
    ///
    /// * `r`     - The ray.
    /// * `t_min` - Minimum ray parameter.
    /// * `t_max` - Maximum ray parameter.
    pub fn hit(&self, r: &Ray, t_min: Float, t_max: Float) -> Option<HitRecord> {
        let fixed = self.orientation.fixed_axis();
        if r.d[fixed] == 0.0 {
            return None;
        }

        // Written so that a NaN parameter is rejected as well.
        let t = (self.k - r.o[fixed]) / r.d[fixed];
        if !(t >= t_min && t <= t_max) {
            return None;
        }

        let (u_axis, v_axis) = self.orientation.uv_axes();
        let p = r.at(t);
        let (a, b) = (p[u_axis], p[v_axis]);
        if a < self.u_range.0 || a > self.u_range.1 || b < self.v_range.0 || b > self.v_range.1 {
            return None;
        }

        Some(HitRecord::new(
            t,
            (a - self.u_range.0) / (self.u_range.1 - self.u_range.0),
            (b - self.v_range.0) / (self.v_range.1 - self.v_range.0),
        ))
    }

    /// Returns the bilinear blend of the corner colours at raw surface
    /// coordinates (u, v) as reported by `hit()`.
    ///
    /// * `u` - Coordinate along the u axis.
    /// * `v` - Coordinate along the v axis.
    pub fn get_color(&self, u: Float, v: Float) -> RGBSpectrum {
        let (s, t) = self.orientation.to_visual(u, v);
        self.get_visual_color(s, t)
    }

    /// Returns the bilinear blend of the corner colours at visual frame
    /// coordinates (s, t).
    ///
    /// * `s` - Left to right coordinate.
    /// * `t` - Bottom to top coordinate.
    pub fn get_visual_color(&self, s: Float, t: Float) -> RGBSpectrum {
        let [c0, c1, c2, c3] = self.corners;
        let bottom = lerp(s, c0, c1);
        let top = lerp(s, c2, c3);
        lerp(t, bottom, top)
    }

    /// Returns the colour of a corner.
    ///
    /// * `corner` - The corner.
    pub fn corner_color(&self, corner: Corner) -> RGBSpectrum {
        self.corners[corner as usize]
    }

    /// Deposit a weighted colour contribution on a corner. The corner colour
    /// becomes the weighted mean of everything deposited so far.
    ///
    /// * `corner` - The corner.
    /// * `c`      - Colour contribution.
    /// * `weight` - Weight of the contribution; must be positive.
    pub fn add_color(&mut self, corner: Corner, c: RGBSpectrum, weight: Float) {
        debug_assert!(weight > 0.0);

        let acc = &mut self.accumulators[corner as usize];
        acc.sum += c * weight;
        acc.weight += weight;
        self.corners[corner as usize] = acc.sum / acc.weight;
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn unit_quad(orientation: Orientation, k: Float) -> Quad {
        Quad::new(
            orientation,
            k,
            (1.0, 3.0),
            (2.0, 4.0),
            0,
            [RGBSpectrum::default(); 4],
        )
    }

    /// Ray starting one unit in front of the quad's plane and heading
    /// straight at raw coordinates (a, b) along the (u, v) axes.
    fn ray_towards(q: &Quad, a: Float, b: Float) -> Ray {
        let (u_axis, v_axis) = q.orientation.uv_axes();
        let fixed = q.orientation.fixed_axis();
        let n = q.normal();

        let mut target = Vector3f::zero();
        target[fixed] = q.k;
        target[u_axis] = a;
        target[v_axis] = b;
        let target = Point3f::from(target);
        let o = target + n;
        Ray::new(o, target - o)
    }

    fn orientation_strategy() -> impl Strategy<Value = Orientation> {
        prop::sample::select(Orientation::ALL.to_vec())
    }

    #[test]
    fn ray_parallel_to_plane_misses() {
        for o in Orientation::ALL {
            let q = unit_quad(o, 0.0);
            let (u_axis, _) = o.uv_axes();
            let mut d = Vector3f::zero();
            d[u_axis] = 1.0;
            let mut origin = Vector3f::zero();
            origin[u_axis] = -5.0;
            let r = Ray::new(Point3f::from(origin), d);
            assert!(q.hit(&r, 0.0, INFINITY).is_none());
        }
    }

    #[test]
    fn ray_starting_on_plane_respects_t_min() {
        let q = unit_quad(Orientation::Back, 0.0);
        let r = Ray::new(Point3::new(2.0, 3.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(q.hit(&r, 0.001, INFINITY).is_none());
        assert!(q.hit(&r, 0.0, INFINITY).is_some());
    }

    #[test]
    fn hit_beyond_t_max_is_rejected() {
        let q = unit_quad(Orientation::Floor, 0.0);
        let r = ray_towards(&q, 2.0, 3.0);
        assert!(q.hit(&r, 0.0, 0.5).is_none());
        let h = q.hit(&r, 0.0, 1.0).unwrap();
        assert_eq!(h.t, 1.0);
    }

    #[test]
    fn boundary_points_are_inclusive() {
        for o in Orientation::ALL {
            let q = unit_quad(o, 1.0);
            let corner = q.hit(&ray_towards(&q, 1.0, 2.0), 0.0, INFINITY).unwrap();
            assert_eq!((corner.u, corner.v), (0.0, 0.0));
            let corner = q.hit(&ray_towards(&q, 3.0, 4.0), 0.0, INFINITY).unwrap();
            assert_eq!((corner.u, corner.v), (1.0, 1.0));
        }
    }

    #[test]
    fn back_wall_visual_frame_matches_raw_frame() {
        let mut q = unit_quad(Orientation::Back, 0.0);
        q.add_color(Corner::BottomLeft, RGBSpectrum::new(1.0), 1.0);

        let h = q.hit(&ray_towards(&q, 1.0, 2.0), 0.0, INFINITY).unwrap();
        assert_eq!(q.get_color(h.u, h.v), RGBSpectrum::new(1.0));
        assert_eq!(q.get_color(1.0, 1.0), RGBSpectrum::new(0.0));
    }

    #[test]
    fn left_wall_mirrors_u() {
        let mut q = unit_quad(Orientation::Left, 0.0);
        q.add_color(Corner::BottomLeft, RGBSpectrum::new(1.0), 1.0);

        // Seen from inside (looking towards -x) left is towards +z.
        assert_eq!(q.get_color(1.0, 0.0), RGBSpectrum::new(1.0));
        assert_eq!(q.get_color(0.0, 0.0), RGBSpectrum::new(0.0));
    }

    #[test]
    fn add_color_averages_contributions() {
        let mut q = unit_quad(Orientation::Right, 0.0);
        q.add_color(Corner::TopRight, RGBSpectrum::new(1.0), 1.0);
        q.add_color(Corner::TopRight, RGBSpectrum::new(0.0), 3.0);
        assert!(approx_eq!(
            f32,
            q.corner_color(Corner::TopRight)[0],
            0.25,
            epsilon = 1e-6
        ));
        assert!(q.corner_color(Corner::BottomLeft).is_black());
    }

    #[test]
    fn centre_lies_on_plane() {
        for o in Orientation::ALL {
            let q = unit_quad(o, 7.0);
            let c = q.centre();
            assert_eq!(c[o.fixed_axis()], 7.0);
            let (u_axis, v_axis) = o.uv_axes();
            assert_eq!((c[u_axis], c[v_axis]), (2.0, 3.0));
        }
        assert_eq!(unit_quad(Orientation::Back, 0.0).area(), 4.0);
    }

    proptest! {
        #[test]
        fn inside_points_hit_with_uv_in_unit_square(
            o in orientation_strategy(),
            a in 1.001..2.999f32,
            b in 2.001..3.999f32,
        ) {
            let q = unit_quad(o, 1.0);
            let h = q.hit(&ray_towards(&q, a, b), 0.0, INFINITY);
            prop_assert!(h.is_some());
            let h = h.unwrap();
            prop_assert!((0.0..=1.0).contains(&h.u));
            prop_assert!((0.0..=1.0).contains(&h.v));
            prop_assert!(approx_eq!(f32, h.t, 1.0, epsilon = 1e-5));
        }

        #[test]
        fn outside_points_miss(
            o in orientation_strategy(),
            a in 3.01..10.0f32,
            b in -10.0..10.0f32,
        ) {
            let q = unit_quad(o, 1.0);
            prop_assert!(q.hit(&ray_towards(&q, a, b), 0.0, INFINITY).is_none());
            prop_assert!(q.hit(&ray_towards(&q, b, -a), 0.0, INFINITY).is_none());
        }

        #[test]
        fn uniform_corners_give_uniform_color(
            o in orientation_strategy(),
            c in 0.0..10.0f32,
            u in 0.0..=1.0f32,
            v in 0.0..=1.0f32,
        ) {
            let q = Quad::new(o, 0.0, (0.0, 1.0), (0.0, 1.0), 0, [RGBSpectrum::new(c); 4]);
            let color = q.get_color(u, v);
            for i in 0..RGB_SAMPLES {
                prop_assert!(approx_eq!(f32, color[i], c, epsilon = 1e-4));
            }
        }
    }
}
