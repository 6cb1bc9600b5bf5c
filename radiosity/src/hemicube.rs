//! Hemicube ray generation

use core_lib::geometry::*;
use core_lib::pbrt::*;

/// Primary up vector used to build the hemicube frame.
const HEMICUBE_UP: Vector3f = Vector3 {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};

/// Fallback up vector for normals colinear with `HEMICUBE_UP`.
const HEMICUBE_OTHER_UP: Vector3f = Vector3 {
    x: 0.0,
    y: 0.0,
    z: 1.0,
};

/// Number of hemicube faces.
pub const HEMICUBE_FACES: usize = 5;

/// Faces of the hemicube in the order they are sampled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HemicubeFace {
    Top = 0,
    Right = 1,
    Left = 2,
    Front = 3,
    Back = 4,
}

impl HemicubeFace {
    /// All faces in sampling order.
    pub const ALL: [HemicubeFace; HEMICUBE_FACES] = [
        HemicubeFace::Top,
        HemicubeFace::Right,
        HemicubeFace::Left,
        HemicubeFace::Front,
        HemicubeFace::Back,
    ];
}

/// Returns the number of rays a hemicube with the given resolution produces.
///
/// * `xc` - Pixels along x.
/// * `yc` - Pixels along y of the top face.
pub fn hemicube_ray_count(xc: usize, yc: usize) -> usize {
    xc * yc + 4 * xc * (yc / 2)
}

/// A unit hemicube placed over a surface point. It generates one ray per
/// hemicube pixel: the full top face first, then the upper halves of the
/// right, left, front and back faces, each in raster order (x fastest).
///
/// The cursor only moves forward. Once every face has been sampled the
/// hemicube keeps returning `None`.
#[derive(Clone, Debug)]
pub struct Hemicube {
    /// Tangent.
    u: Vector3f,

    /// Unit surface normal.
    v: Vector3f,

    /// Bitangent.
    w: Vector3f,

    /// Centre of the hemicube base.
    p: Point3f,

    /// Lower corner of each face in `HemicubeFace` order.
    corners: [Point3f; HEMICUBE_FACES],

    /// Face being sampled; `HEMICUBE_FACES` once exhausted.
    face: usize,

    /// Pixel column.
    x: usize,

    /// Pixel row.
    y: usize,

    /// Pixels along x.
    xc: usize,

    /// Pixels along y of the top face.
    yc: usize,

    /// Offset to the centre of a pixel along x, in face units.
    half_pw: Float,

    /// Offset to the centre of a pixel along y, in face units.
    half_ph: Float,

    /// Area of one pixel.
    da: Float,
}

impl Hemicube {
    /// Create a hemicube over a surface point.
    ///
    /// * `n`  - Surface normal; must not be zero.
    /// * `p`  - Surface point.
    /// * `xc` - Pixels along x.
    /// * `yc` - Pixels along y of the top face; side faces use `yc / 2` rows.
    pub fn new(n: &Vector3f, p: &Point3f, xc: usize, yc: usize) -> Self {
        let v = n.normalize();
        if v.has_nans() {
            warn!("Hemicube::new(): Degenerate normal {:?} at {:?}", n, p);
        }
        let mut c = HEMICUBE_UP.cross(&v);
        if c.length_squared() < 1e-12 {
            c = HEMICUBE_OTHER_UP.cross(&v);
        }
        let u = c.normalize();
        let w = v.cross(&u);

        let p = *p;
        let corners = [
            p + v - u - w,
            p + u - w,
            p - u + w,
            p - u - w,
            p + u + w,
        ];

        let (half_pw, half_ph, da) = if xc > 0 && yc > 0 {
            (
                1.0 / xc as Float,
                1.0 / yc as Float,
                4.0 / (xc * yc) as Float,
            )
        } else {
            (0.0, 0.0, 0.0)
        };

        Self {
            u,
            v,
            w,
            p,
            corners,
            face: 0,
            x: 0,
            y: 0,
            xc,
            yc,
            half_pw,
            half_ph,
            da,
        }
    }

    /// Returns the tangent frame (u, v, w) where v is the unit normal.
    pub fn frame(&self) -> (Vector3f, Vector3f, Vector3f) {
        (self.u, self.v, self.w)
    }

    /// Returns the unit normal.
    pub fn up(&self) -> Vector3f {
        self.v
    }

    /// Returns the area of a single hemicube pixel.
    pub fn da(&self) -> Float {
        self.da
    }

    /// Returns true once all rays have been generated.
    pub fn is_exhausted(&self) -> bool {
        self.face >= HEMICUBE_FACES
    }

    /// Returns the number of rows sampled on a face.
    ///
    /// * `face` - Face index.
    fn rows(&self, face: usize) -> usize {
        if face == HemicubeFace::Top as usize {
            self.yc
        } else {
            self.yc / 2
        }
    }

    /// Returns the basis vectors spanning a face.
    ///
    /// * `face` - Face index.
    fn basis(&self, face: usize) -> (Vector3f, Vector3f) {
        match HemicubeFace::ALL[face] {
            HemicubeFace::Top => (self.u, self.w),
            HemicubeFace::Right => (self.w, self.v),
            HemicubeFace::Left => (-self.w, self.v),
            HemicubeFace::Front => (self.u, self.v),
            HemicubeFace::Back => (-self.u, self.v),
        }
    }
}

impl Iterator for Hemicube {
    type Item = Ray;

    /// Returns the ray through the next hemicube pixel.
    fn next(&mut self) -> Option<Ray> {
        loop {
            if self.is_exhausted() {
                return None;
            }
            if self.x >= self.xc {
                self.x = 0;
                self.y += 1;
            }
            if self.y < self.rows(self.face) && self.xc > 0 {
                break;
            }
            self.face += 1;
            self.x = 0;
            self.y = 0;
        }

        let nx = 2.0 * (self.x as Float / self.xc as Float) + self.half_pw;
        let ny = 2.0 * (self.y as Float / self.yc as Float) + self.half_ph;
        let (a, b) = self.basis(self.face);
        let target = self.corners[self.face] + a * nx + b * ny;
        self.x += 1;

        Some(Ray::new(self.p, target - self.p))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
