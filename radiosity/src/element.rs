//! Radiosity elements

use super::hemicube::*;
use core_lib::geometry::*;
use core_lib::matrix::*;
use core_lib::pbrt::*;
use shapes::ElemIndex;

/// The form-factor view of a quad: its centre, normal and a hemicube that
/// enumerates the directions it sees.
#[derive(Clone, Debug)]
pub struct Element {
    /// Surface normal.
    pub n: Vector3f,

    /// Centre of the owning quad.
    pub p: Point3f,

    /// Element index.
    pub i: ElemIndex,

    /// Ray generator.
    hemicube: Hemicube,
}

impl Element {
    /// Create a new element.
    ///
    /// * `n`          - Surface normal.
    /// * `p`          - Centre of the owning quad.
    /// * `i`          - Element index.
    /// * `resolution` - Hemicube resolution along each top face axis.
    pub fn new(n: Vector3f, p: Point3f, i: ElemIndex, resolution: usize) -> Self {
        let hemicube = Hemicube::new(&n, &p, resolution, resolution);
        Self { n, p, i, hemicube }
    }

    /// Returns the next hemicube ray or `None` once all have been generated.
    pub fn get_ray(&mut self) -> Option<Ray> {
        self.hemicube.next()
    }

    /// Returns true once all hemicube rays have been generated.
    pub fn is_exhausted(&self) -> bool {
        self.hemicube.is_exhausted()
    }

    /// Accumulate the delta form factor carried by a hemicube ray into
    /// `ffm[(self.i, j.i)]`. Nothing is added when the receiver faces away
    /// from this element or the ray is degenerate.
    ///
    /// * `ray` - Ray generated by this element that hit `j`.
    /// * `j`   - The receiving element.
    /// * `ffm` - Form-factor matrix.
    pub fn calc_ff(&self, ray: &Ray, j: &ElementRef, ffm: &mut Matrix) {
        let r2 = ray.d.length_squared();
        if !(r2 > 0.0) {
            return;
        }

        let ij = ray.d / r2.sqrt();
        let cos_i = self.hemicube.up().dot(&ij);
        let cos_j = j.n.dot(&-ij);
        if cos_i <= 0.0 || cos_j <= 0.0 {
            return;
        }

        let delta = cos_i * cos_j * self.hemicube.da() / (PI * r2);
        if delta.is_finite() {
            ffm[(self.i, j.i)] += delta;
        }
    }
}

/// The parts of an element a ray hit needs to report.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElementRef {
    /// Surface normal.
    pub n: Vector3f,

    /// Centre of the owning quad.
    pub p: Point3f,

    /// Element index.
    pub i: ElemIndex,
}

impl From<&Element> for ElementRef {
    /// Create an `ElementRef` from an element.
    ///
    /// * `e` - The element.
    fn from(e: &Element) -> Self {
        Self {
            n: e.n,
            p: e.p,
            i: e.i,
        }
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

    fn floor_element(i: ElemIndex) -> Element {
        Element::new(Vector3::new(0.0, 1.0, 0.0), Point3::zero(), i, 4)
    }

    #[test]
    fn back_facing_receiver_leaves_matrix_unchanged() {
        let e = floor_element(0);
        let ray = Ray::new(Point3::zero(), Vector3::new(0.0, 2.0, 0.0));
        let j = ElementRef {
            n: Vector3::new(0.0, 1.0, 0.0),
            p: Point3::new(0.0, 2.0, 0.0),
            i: 1,
        };
        let mut ffm = Matrix::zeros(2);
        e.calc_ff(&ray, &j, &mut ffm);
        assert_eq!(ffm, Matrix::zeros(2));
    }

    #[test]
    fn facing_receiver_gets_delta_form_factor() {
        let e = floor_element(0);
        let ray = Ray::new(Point3::zero(), Vector3::new(0.0, 2.0, 0.0));
        let j = ElementRef {
            n: Vector3::new(0.0, -1.0, 0.0),
            p: Point3::new(0.0, 2.0, 0.0),
            i: 1,
        };
        let mut ffm = Matrix::zeros(2);
        e.calc_ff(&ray, &j, &mut ffm);
        e.calc_ff(&ray, &j, &mut ffm);

        // da = 4 / 16, r^2 = 4, both cosines 1.
        let expected = 2.0 * 0.25 / (PI * 4.0);
        assert!(approx_eq!(f32, ffm[(0, 1)], expected, epsilon = 1e-7));
        assert_eq!(ffm[(1, 0)], 0.0);
        assert_eq!(ffm[(0, 0)], 0.0);
    }

    #[test]
    fn zero_length_ray_is_ignored() {
        let e = floor_element(0);
        let ray = Ray::new(Point3::zero(), Vector3::zero());
        let j = ElementRef {
            n: Vector3::new(0.0, -1.0, 0.0),
            p: Point3::zero(),
            i: 0,
        };
        let mut ffm = Matrix::zeros(1);
        e.calc_ff(&ray, &j, &mut ffm);
        assert_eq!(ffm[(0, 0)], 0.0);
    }

    #[test]
    fn get_ray_exhausts() {
        let mut e = floor_element(3);
        let mut count = 0;
        while let Some(r) = e.get_ray() {
            assert_eq!(r.o, e.p);
            count += 1;
        }
        assert_eq!(count, hemicube_ray_count(4, 4));
        assert!(e.is_exhausted());
        assert!(e.get_ray().is_none());
    }

    #[test]
    fn element_ref_copies_identity() {
        let e = Element::new(Vector3::new(-1.0, 0.0, 0.0), Point3::new(5.0, 1.0, 2.0), 7, 2);
        let r = ElementRef::from(&e);
        assert_eq!(r.n, e.n);
        assert_eq!(r.p, e.p);
        assert_eq!(r.i, 7);
    }

    prop_compose! {
        fn any_direction()(x in -5.0..5.0f32, y in -5.0..5.0f32, z in -5.0..5.0f32)
            -> Vector3f {
            Vector3::new(x, y, z)
        }
    }

    proptest! {
        #[test]
        fn never_writes_negative_entries(d in any_direction(), n in any_direction()) {
            let e = floor_element(0);
            let ray = Ray::new(Point3::zero(), d);
            let j = ElementRef { n, p: Point3::zero(), i: 0 };
            let mut ffm = Matrix::zeros(1);
            e.calc_ff(&ray, &j, &mut ffm);
            prop_assert!(ffm[(0, 0)] >= 0.0);
            prop_assert!(ffm[(0, 0)].is_finite());
        }
    }
}
