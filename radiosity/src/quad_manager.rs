//! Scene container

use super::element::*;
use super::face::*;
use super::scene_config::*;
use core_lib::geometry::*;
use core_lib::matrix::*;
use core_lib::pbrt::*;
use core_lib::spectrum::*;
use indicatif::ProgressBar;
use itertools::izip;
use shapes::{ElemIndex, Quad};
use std::path::Path;

/// Minimum ray parameter used when tracing from a surface.
pub const RAY_T_MIN: Float = 0.001;

/// Owns every quad, element and face of the scene.
pub struct QuadManager {
    /// Quads indexed by element index.
    quads: Vec<Quad>,

    /// Elements indexed by element index.
    elements: Vec<Element>,

    /// Faces in build order.
    faces: Vec<Face>,
}

impl QuadManager {
    /// Build the enclosure and its emitter.
    ///
    /// * `config` - Scene configuration.
    pub fn new(config: &SceneConfig) -> Result<Self, String> {
        let mut quads = vec![];
        let faces = config
            .faces()
            .iter()
            .map(|desc| Face::new(desc, &mut quads))
            .collect::<Result<Vec<Face>, String>>()?;

        let elements = quads
            .iter()
            .map(|q| Element::new(q.normal(), q.centre(), q.index, config.resolution))
            .collect();

        info!(
            "Built {} faces with {} quads (hemicube resolution {})",
            faces.len(),
            quads.len(),
            config.resolution
        );

        Ok(Self {
            quads,
            elements,
            faces,
        })
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.quads.len()
    }

    /// Returns true if the scene has no elements.
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Returns all quads indexed by element index.
    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Returns all faces.
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Returns the nearest quad hit in [t_min, t_max]. On equal parameters
    /// the quad created last wins.
    ///
    /// * `r`     - The ray.
    /// * `t_min` - Minimum ray parameter.
    /// * `t_max` - Maximum ray parameter.
    pub fn nearest_hit(&self, r: &Ray, t_min: Float, t_max: Float) -> Option<(ElemIndex, HitRecord)> {
        let mut closest = t_max;
        let mut result = None;
        for q in self.quads.iter() {
            if let Some(h) = q.hit(r, t_min, closest) {
                closest = h.t;
                result = Some((q.index, h));
            }
        }
        result
    }

    /// Returns the colour seen along a ray or black if nothing is hit.
    ///
    /// * `r`     - The ray.
    /// * `t_min` - Minimum ray parameter.
    /// * `t_max` - Maximum ray parameter.
    pub fn get_color(&self, r: &Ray, t_min: Float, t_max: Float) -> RGBSpectrum {
        match self.nearest_hit(r, t_min, t_max) {
            Some((i, h)) => self.quads[i].get_color(h.u, h.v),
            None => RGBSpectrum::default(),
        }
    }

    /// Returns the element seen along a ray.
    ///
    /// * `r`     - The ray.
    /// * `t_min` - Minimum ray parameter.
    /// * `t_max` - Maximum ray parameter.
    pub fn request_element(&self, r: &Ray, t_min: Float, t_max: Float) -> Option<ElementRef> {
        self.nearest_hit(r, t_min, t_max)
            .map(|(i, _)| ElementRef::from(&self.elements[i]))
    }

    /// Returns the form-factor matrix. Each element's hemicube is consumed,
    /// so calling this again yields a zero matrix.
    pub fn calc_ff(&mut self) -> Matrix {
        self.calc_ff_with_progress(&ProgressBar::hidden())
    }

    /// Returns the form-factor matrix and reports progress per element.
    ///
    /// * `progress` - Progress bar.
    pub fn calc_ff_with_progress(&mut self, progress: &ProgressBar) -> Matrix {
        let n = self.elements.len();
        let mut ffm = Matrix::zeros(n);
        let mut hits = 0_usize;
        let mut misses = 0_usize;

        for i in 0..n {
            while let Some(ray) = self.elements[i].get_ray() {
                match self.request_element(&ray, RAY_T_MIN, INFINITY) {
                    Some(j) => {
                        self.elements[i].calc_ff(&ray, &j, &mut ffm);
                        hits += 1;
                    }
                    None => misses += 1,
                }
            }
            progress.inc(1);
        }

        progress.finish_and_clear();
        debug!("Form factors: {} hemicube hits, {} misses", hits, misses);
        ffm
    }

    /// Returns the reflectance of every element.
    pub fn reflectances(&self) -> Vec<RGBSpectrum> {
        self.per_element(|f| f.reflectance)
    }

    /// Returns the emission of every element.
    pub fn emissions(&self) -> Vec<RGBSpectrum> {
        self.per_element(|f| f.emission)
    }

    fn per_element<F>(&self, value: F) -> Vec<RGBSpectrum>
    where
        F: Fn(&Face) -> RGBSpectrum,
    {
        let mut v = vec![RGBSpectrum::default(); self.quads.len()];
        for f in self.faces.iter() {
            let c = value(f);
            for &i in f.quads() {
                v[i] = c;
            }
        }
        v
    }

    /// Spread per element radiosity over the quad corners of every face and
    /// optionally write a debug raster of each face.
    ///
    /// * `r`        - Red radiosity per element.
    /// * `g`        - Green radiosity per element.
    /// * `b`        - Blue radiosity per element.
    /// * `dump_dir` - Directory for `f_<face>.ppm` rasters.
    pub fn move_radiosities(
        &mut self,
        r: &[Float],
        g: &[Float],
        b: &[Float],
        dump_dir: Option<&Path>,
    ) -> Result<(), String> {
        let n = self.quads.len();
        if r.len() != n || g.len() != n || b.len() != n {
            return Err(format!(
                "QuadManager::move_radiosities(): Expected {} values per channel, got {}, {}, {}",
                n,
                r.len(),
                g.len(),
                b.len()
            ));
        }

        if let Some((i, _)) = izip!(r, g, b)
            .enumerate()
            .find(|(_, (r, g, b))| !RGBSpectrum::from_rgb(**r, **g, **b).is_finite())
        {
            warn!("Non-finite radiosity for element {}", i);
        }

        for f in self.faces.iter() {
            f.add_radiosities(&mut self.quads, r, g, b)?;
        }

        if let Some(dir) = dump_dir {
            for f in self.faces.iter() {
                let path = dir.join(format!("f_{}.ppm", f.name));
                let path = path.to_string_lossy();
                f.debug_print(&self.quads, &path)?;
                info!("Wrote '{}'", path);
            }
        }

        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
