//! Canvas

use core_lib::geometry::*;
use core_lib::pbrt::*;

/// Maps an output raster onto a rectangle in world space (the view quad) and
/// hands out one world space sample point per pixel.
///
/// Pixels are visited row by row starting at the highest row index, so the
/// top row of the image (highest `v`) comes first and each row runs left to
/// right. This is the row-major order of a PPM body.
#[derive(Clone, Debug)]
pub struct Canvas {
    /// Horizontal basis vector of the view quad.
    x: Vector3f,

    /// Vertical basis vector of the view quad.
    y: Vector3f,

    /// Lower left corner of the view quad.
    origin: Point3f,

    /// Gap between samples; half of it shifts samples to pixel centres.
    cg: Float,

    /// Half-gap shift along `x`.
    shift_x: Vector3f,

    /// Half-gap shift along `y`.
    shift_y: Vector3f,

    /// Raster width in pixels.
    tx: usize,

    /// Raster height in pixels.
    ty: usize,

    /// World space width of the view quad.
    wx: Float,

    /// World space height of the view quad.
    wy: Float,

    /// Column of the next sample.
    px: usize,

    /// Row of the next sample; negative once the raster is exhausted.
    py: i64,

    /// Pixel of the current sample.
    current: (usize, usize),
}

impl Canvas {
    /// Create a new canvas.
    ///
    /// * `x`      - Horizontal basis vector of the view quad.
    /// * `y`      - Vertical basis vector of the view quad.
    /// * `origin` - Lower left corner of the view quad.
    /// * `tx`     - Raster width in pixels.
    /// * `ty`     - Raster height in pixels.
    /// * `wx`     - World space width of the view quad.
    /// * `wy`     - World space height of the view quad.
    /// * `cg`     - Gap between samples.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: Vector3f,
        y: Vector3f,
        origin: Point3f,
        tx: usize,
        ty: usize,
        wx: Float,
        wy: Float,
        cg: Float,
    ) -> Self {
        if tx == 0 || ty == 0 {
            warn!("Canvas {}x{} has no pixels", tx, ty);
        }

        Self {
            x,
            y,
            origin,
            cg,
            shift_x: x * (cg * 0.5),
            shift_y: y * (cg * 0.5),
            tx,
            ty,
            wx,
            wy,
            px: 0,
            py: ty as i64 - 1,
            current: (0, 0),
        }
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.tx
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.ty
    }

    /// Advance to the next pixel. Returns false once every pixel has been
    /// visited; it keeps returning false afterwards.
    pub fn not_finished_writing(&mut self) -> bool {
        if self.py < 0 || self.tx == 0 {
            return false;
        }
        if self.px >= self.tx {
            self.px = 0;
            self.py -= 1;
            if self.py < 0 {
                return false;
            }
        }
        self.current = (self.px, self.py as usize);
        self.px += 1;
        true
    }

    /// Returns the (column, row) of the current sample.
    pub fn pixel(&self) -> (usize, usize) {
        self.current
    }

    /// Returns the world space position of the current sample.
    pub fn get_p_sample(&self) -> Point3f {
        let (u, v) = self.conv_text_to_uv(self.current.0, self.current.1);
        let (px, py) = self.conv_uv_to_world(u, v);
        self.origin + px + py + self.shift_x + self.shift_y
    }

    /// Returns a ray that starts at the current sample and points away from
    /// the eye.
    ///
    /// * `eye` - Eye position.
    pub fn generate_ray(&self, eye: &Point3f) -> Ray {
        let p = self.get_p_sample();
        Ray::new(p, p - *eye)
    }

    /// Convert integer pixel coordinates to normalized [0, 1) coordinates.
    ///
    /// * `u` - Column.
    /// * `v` - Row.
    fn conv_text_to_uv(&self, u: usize, v: usize) -> (Float, Float) {
        (u as Float / self.tx as Float, v as Float / self.ty as Float)
    }

    /// Convert normalized coordinates to world space offsets along the basis
    /// vectors.
    ///
    /// * `u` - Horizontal coordinate.
    /// * `v` - Vertical coordinate.
    fn conv_uv_to_world(&self, u: Float, v: Float) -> (Vector3f, Vector3f) {
        (
            self.x * (u * (self.wx - self.cg)),
            self.y * (v * (self.wy - self.cg)),
        )
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn canvas(tx: usize, ty: usize) -> Canvas {
        Canvas::new(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 5.0),
            tx,
            ty,
            5.0,
            5.0,
            0.5,
        )
    }

    #[test]
    fn visits_every_pixel_once_from_the_top_row() {
        let mut c = canvas(4, 3);
        let mut rows = vec![];
        let mut cols = vec![];
        while c.not_finished_writing() {
            let (px, py) = c.pixel();
            cols.push(px);
            rows.push(py);
        }
        assert_eq!(rows, vec![2, 2, 2, 2, 1, 1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(cols, vec![0, 1, 2, 3, 0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn stays_finished() {
        let mut c = canvas(2, 1);
        assert!(c.not_finished_writing());
        assert!(c.not_finished_writing());
        assert!(!c.not_finished_writing());
        assert!(!c.not_finished_writing());
    }

    #[test]
    fn empty_raster_produces_no_samples() {
        assert!(!canvas(0, 3).not_finished_writing());
        assert!(!canvas(3, 0).not_finished_writing());
    }

    #[test]
    fn first_sample_is_shifted_by_half_gap() {
        let mut c = canvas(4, 3);
        assert!(c.not_finished_writing());
        let p = c.get_p_sample();
        // Top row: v = 2/3 of (5.0 - 0.5) plus 0.25 shift.
        assert!(approx_eq!(f32, p.x, 0.25, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.y, 3.25, epsilon = 1e-5));
        assert_eq!(p.z, 5.0);
    }

    #[test]
    fn samples_stay_inside_view_quad() {
        let mut c = canvas(16, 9);
        while c.not_finished_writing() {
            let p = c.get_p_sample();
            assert!(p.x > 0.0 && p.x < 5.0);
            assert!(p.y > 0.0 && p.y < 5.0);
        }
    }

    #[test]
    fn generated_ray_points_away_from_eye() {
        let mut c = canvas(1, 1);
        assert!(c.not_finished_writing());
        let eye = Point3::new(0.25, 0.25, 10.0);
        let r = c.generate_ray(&eye);
        assert_eq!(r.o, c.get_p_sample());
        assert_eq!(r.d, Vector3::new(0.0, 0.0, -5.0));
    }
}
