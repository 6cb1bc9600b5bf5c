//! Enclosure faces

use super::mapping::*;
use super::scene_config::FaceDesc;
use core_lib::image_io::*;
use core_lib::pbrt::*;
use core_lib::spectrum::*;
use itertools::iproduct;
use shapes::{ElemIndex, Orientation, Quad};

/// Number of texels per quad edge in a debug raster.
pub const DEBUG_TEXELS: usize = 4;

/// A grid of quads sharing an orientation and a material.
#[derive(Clone, Debug)]
pub struct Face {
    /// Name used for debug dumps.
    pub name: &'static str,

    /// Orientation of every quad on the face.
    pub orientation: Orientation,

    /// Reflectance.
    pub reflectance: RGBSpectrum,

    /// Radiant exitance.
    pub emission: RGBSpectrum,

    /// Number of quad rows.
    rows: usize,

    /// Number of quad columns.
    cols: usize,

    /// Quad indices in visual row-major order; row 0 is the bottom row.
    grid: Vec<ElemIndex>,

    /// Neighbourhood of every quad in `grid` order.
    mappings: Vec<Mapping>,
}

impl Face {
    /// Create the quads of a face and append them to `quads`. Quads are
    /// numbered consecutively from `quads.len()`.
    ///
    /// * `desc`  - Placement and materials of the face.
    /// * `quads` - All quads created so far.
    pub fn new(desc: &FaceDesc, quads: &mut Vec<Quad>) -> Result<Self, String> {
        for (axis, extent) in [("u", desc.u_extent), ("v", desc.v_extent)] {
            if !(extent.0 < extent.1 && extent.0.is_finite() && extent.1.is_finite()) {
                return Err(format!(
                    "Face::new(): Face '{}' has an empty {} extent {:?}",
                    desc.name, axis, extent
                ));
            }
        }

        let (rows, cols) = (desc.rows, desc.cols);
        let (flip_u, flip_v) = desc.orientation.flips();

        // Cell edges are shared by neighbours so the subdivision has no gaps.
        let edge = |extent: (Float, Float), n: usize, i: usize| -> Float {
            extent.0 + (extent.1 - extent.0) * (i as Float / n as Float)
        };
        let range = |extent: (Float, Float), n: usize, i: usize, flip: bool| -> (Float, Float) {
            if flip {
                (edge(extent, n, n - i - 1), edge(extent, n, n - i))
            } else {
                (edge(extent, n, i), edge(extent, n, i + 1))
            }
        };

        let mut grid = Vec::with_capacity(rows * cols);
        for (row, col) in iproduct!(0..rows, 0..cols) {
            let index = quads.len();
            quads.push(Quad::new(
                desc.orientation,
                desc.k,
                range(desc.u_extent, cols, col, flip_u),
                range(desc.v_extent, rows, row, flip_v),
                index,
                [RGBSpectrum::default(); 4],
            ));
            grid.push(index);
        }

        let mut face = Self {
            name: desc.name,
            orientation: desc.orientation,
            reflectance: desc.reflectance,
            emission: desc.emission,
            rows,
            cols,
            grid,
            mappings: vec![],
        };
        face.mappings = face.generate_mappings();
        debug!("Face '{}': {}x{} quads at k = {}", face.name, cols, rows, desc.k);
        Ok(face)
    }

    /// Returns the quad indices in visual row-major order.
    pub fn quads(&self) -> &[ElemIndex] {
        &self.grid
    }

    /// Returns the neighbourhood of every quad.
    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    /// Returns the quad at a grid cell or `None` outside the face.
    ///
    /// * `col` - Column from the left.
    /// * `row` - Row from the bottom.
    pub fn quad_at(&self, col: isize, row: isize) -> Option<ElemIndex> {
        let (rows, cols) = (self.rows as isize, self.cols as isize);
        if col < 0 || row < 0 || col >= cols || row >= rows {
            None
        } else {
            Some(self.grid[(row * cols + col) as usize])
        }
    }

    fn generate_mappings(&self) -> Vec<Mapping> {
        iproduct!(0..self.rows as isize, 0..self.cols as isize)
            .filter_map(|(row, col)| {
                let mut m = Mapping::new(self.quad_at(col, row)?);
                for slot in Slot::NEIGHBOURS {
                    let (dc, dr) = slot.offset();
                    if let Some(q) = self.quad_at(col + dc, row + dr) {
                        m.set(slot, q);
                    }
                }
                Some(m)
            })
            .collect()
    }

    /// Spread the radiosity of every quad of the face over the corners of
    /// its neighbourhood.
    ///
    /// * `quads` - All quads.
    /// * `r`     - Red radiosity per element.
    /// * `g`     - Green radiosity per element.
    /// * `b`     - Blue radiosity per element.
    pub fn add_radiosities(
        &self,
        quads: &mut [Quad],
        r: &[Float],
        g: &[Float],
        b: &[Float],
    ) -> Result<(), String> {
        let n = r.len().min(g.len()).min(b.len()).min(quads.len());
        if let Some(k) = self.grid.iter().find(|&&k| k >= n) {
            return Err(format!(
                "Face::add_radiosities(): Face '{}' needs element {} but only {} values are available",
                self.name, k, n
            ));
        }

        for m in self.mappings.iter() {
            let k = m.k();
            m.add_color(quads, RGBSpectrum::from_rgb(r[k], g[k], b[k]));
        }
        Ok(())
    }

    /// Returns a raster of the face in its visual frame with
    /// `DEBUG_TEXELS` x `DEBUG_TEXELS` texels per quad, top row first.
    ///
    /// * `quads` - All quads.
    pub fn debug_raster(&self, quads: &[Quad]) -> (Vec<RGBSpectrum>, usize, usize) {
        let width = self.cols * DEBUG_TEXELS;
        let height = self.rows * DEBUG_TEXELS;
        let texel = DEBUG_TEXELS as Float;
        let pixels = iproduct!((0..height).rev(), 0..width)
            .map(|(y, x)| {
                let q = &quads[self.grid[(y / DEBUG_TEXELS) * self.cols + x / DEBUG_TEXELS]];
                let s = ((x % DEBUG_TEXELS) as Float + 0.5) / texel;
                let t = ((y % DEBUG_TEXELS) as Float + 0.5) / texel;
                q.get_visual_color(s, t)
            })
            .collect();
        (pixels, width, height)
    }

    /// Write the debug raster of the face to an image file.
    ///
    /// * `quads` - All quads.
    /// * `path`  - Output file; the extension selects the format.
    pub fn debug_print(&self, quads: &[Quad], path: &str) -> Result<(), String> {
        let (pixels, width, height) = self.debug_raster(quads);
        write_image(path, &pixels, width, height)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use core_lib::geometry::*;
    use float_cmp::*;
    use shapes::Corner;

    fn grid_desc(orientation: Orientation, rows: usize, cols: usize) -> FaceDesc {
        FaceDesc {
            name: "test",
            orientation,
            k: 0.0,
            u_extent: (0.0, 2.0),
            v_extent: (0.0, 2.0),
            rows,
            cols,
            reflectance: RGBSpectrum::new(0.5),
            emission: RGBSpectrum::default(),
        }
    }

    fn desc(orientation: Orientation, patches: usize) -> FaceDesc {
        grid_desc(orientation, patches, patches)
    }

    #[test]
    fn quads_are_numbered_from_existing_count() {
        let mut quads = vec![];
        let a = Face::new(&desc(Orientation::Back, 2), &mut quads).unwrap();
        let b = Face::new(&desc(Orientation::Floor, 3), &mut quads).unwrap();
        assert_eq!(quads.len(), 13);
        assert_eq!(a.quads(), &[0, 1, 2, 3]);
        assert_eq!(b.quads().first(), Some(&4));
        for (i, q) in quads.iter().enumerate() {
            assert_eq!(q.index, i);
        }
    }

    #[test]
    fn quads_tile_the_face() {
        let mut quads = vec![];
        Face::new(&desc(Orientation::Left, 4), &mut quads).unwrap();
        let area: Float = quads.iter().map(|q| q.area()).sum();
        assert!(approx_eq!(f32, area, 4.0, epsilon = 1e-5));
        for q in quads.iter() {
            assert_eq!(q.normal(), Vector3::new(1.0, 0.0, 0.0));
        }
    }

    #[test]
    fn grid_follows_visual_frame() {
        // Left wall u runs along z and is mirrored: column 0 sits at high z.
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Left, 2), &mut quads).unwrap();
        let bottom_left = &quads[face.quad_at(0, 0).unwrap()];
        let top_right = &quads[face.quad_at(1, 1).unwrap()];
        assert_eq!(bottom_left.u_range, (1.0, 2.0));
        assert_eq!(bottom_left.v_range, (0.0, 1.0));
        assert_eq!(top_right.u_range, (0.0, 1.0));
        assert_eq!(top_right.v_range, (1.0, 2.0));
    }

    #[test]
    fn every_mapping_is_centred_on_its_quad() {
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Ceiling, 3), &mut quads).unwrap();
        for (m, q) in face.mappings().iter().zip(face.quads()) {
            assert_eq!(m.k(), *q);
        }
        let counts: Vec<_> = face.mappings().iter().map(|m| m.iter().count()).collect();
        assert_eq!(counts, [4, 6, 4, 6, 9, 6, 4, 6, 4]);
    }

    #[test]
    fn single_quad_face_has_no_neighbours() {
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Back, 1), &mut quads).unwrap();
        assert_eq!(face.mappings().len(), 1);
        assert_eq!(face.mappings()[0].iter().count(), 1);
        assert!(face.quad_at(-1, 0).is_none());
        assert!(face.quad_at(0, 1).is_none());
    }

    #[test]
    fn add_radiosities_averages_shared_corners() {
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Back, 2), &mut quads).unwrap();
        // Bottom row bright, top row dark.
        let r = [1.0, 1.0, 0.0, 0.0];
        face.add_radiosities(&mut quads, &r, &r, &r).unwrap();

        let bl = &quads[face.quad_at(0, 0).unwrap()];
        assert_eq!(bl.corner_color(Corner::BottomLeft), RGBSpectrum::new(1.0));
        assert_eq!(bl.corner_color(Corner::TopLeft), RGBSpectrum::new(0.5));
        assert_eq!(bl.corner_color(Corner::TopRight), RGBSpectrum::new(0.5));

        let tr = &quads[face.quad_at(1, 1).unwrap()];
        assert!(tr.corner_color(Corner::TopRight).is_black());
        assert_eq!(tr.corner_color(Corner::BottomLeft), RGBSpectrum::new(0.5));
    }

    #[test]
    fn uniform_radiosity_stays_uniform() {
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Floor, 3), &mut quads).unwrap();
        let r = [0.25; 9];
        face.add_radiosities(&mut quads, &r, &r, &r).unwrap();
        for q in quads.iter() {
            for c in Corner::ALL {
                let [x, _, _] = q.corner_color(c).to_rgb();
                assert!(approx_eq!(f32, x, 0.25, epsilon = 1e-6));
            }
        }
    }

    #[test]
    fn debug_raster_puts_top_row_first() {
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Back, 2), &mut quads).unwrap();
        let r = [0.0, 0.0, 1.0, 1.0];
        for m in face.mappings() {
            // Paint each quad flat so texels show the owning quad.
            let k = m.k();
            for c in Corner::ALL {
                quads[k].add_color(c, RGBSpectrum::new(r[k]), 1.0);
            }
        }
        let (pixels, w, h) = face.debug_raster(&quads);
        assert_eq!((w, h), (2 * DEBUG_TEXELS, 2 * DEBUG_TEXELS));
        assert_eq!(pixels.len(), w * h);
        assert_eq!(pixels[0], RGBSpectrum::new(1.0));
        assert!(pixels[w * h - 1].is_black());
    }

    #[test]
    fn debug_print_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f_test.ppm");
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Back, 2), &mut quads).unwrap();
        face.debug_print(&quads, path.to_str().unwrap()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("P3\n8 8\n255\n"));
    }

    #[test]
    fn rows_and_columns_may_differ() {
        let mut quads = vec![];
        let face = Face::new(&grid_desc(Orientation::Back, 2, 3), &mut quads).unwrap();
        assert_eq!(quads.len(), 6);
        assert!(face.quad_at(2, 1).is_some());
        assert!(face.quad_at(0, 2).is_none());

        let right = &quads[face.quad_at(2, 0).unwrap()];
        assert!(approx_eq!(f32, right.u_range.0, 4.0 / 3.0, epsilon = 1e-6));
        assert_eq!(right.u_range.1, 2.0);
        assert_eq!(right.v_range, (0.0, 1.0));

        let counts: Vec<_> = face.mappings().iter().map(|m| m.iter().count()).collect();
        assert_eq!(counts, [4, 6, 4, 4, 6, 4]);

        let (pixels, w, h) = face.debug_raster(&quads);
        assert_eq!((w, h), (3 * DEBUG_TEXELS, 2 * DEBUG_TEXELS));
        assert_eq!(pixels.len(), w * h);
    }

    #[test]
    fn empty_extent_is_an_error() {
        let mut quads = vec![];
        let mut d = desc(Orientation::Ceiling, 2);
        d.u_extent = (1.0, 1.0);
        assert!(Face::new(&d, &mut quads).is_err());
        assert!(quads.is_empty());
    }

    #[test]
    fn short_radiosity_vectors_are_an_error() {
        let mut quads = vec![];
        let face = Face::new(&desc(Orientation::Back, 2), &mut quads).unwrap();
        let r = [1.0; 3];
        let full = [1.0; 4];
        assert!(face.add_radiosities(&mut quads, &r, &full, &full).is_err());
        assert!(face.add_radiosities(&mut quads, &full, &full, &r).is_err());
        for q in quads.iter() {
            assert!(q.corner_color(Corner::TopRight).is_black());
        }
    }
}
