//! Scene configuration

use core_lib::app::Options;
use core_lib::pbrt::*;
use core_lib::spectrum::*;
use shapes::Orientation;

/// Default edge length of the enclosure.
pub const DEFAULT_SIZE: Float = 5.0;

/// Default number of quads along each face edge.
pub const DEFAULT_PATCHES: usize = 8;

/// Default hemicube resolution.
pub const DEFAULT_RESOLUTION: usize = 64;

/// Edge length of the emitter relative to the enclosure.
pub const EMITTER_FRACTION: Float = 0.3;

/// Distance of the emitter below the ceiling.
pub const EMITTER_OFFSET: Float = 0.01;

/// Layout and materials of the enclosure.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    /// Edge length of the cubic enclosure.
    pub size: Float,

    /// Number of quads along each face edge.
    pub patches: usize,

    /// Hemicube resolution along each top face axis.
    pub resolution: usize,

    /// Also build the front wall.
    pub closed: bool,

    /// Edge length of the square emitter.
    pub emitter_size: Float,

    /// Distance of the emitter below the ceiling.
    pub emitter_offset: Float,

    /// Radiant exitance of the emitter.
    pub emission: RGBSpectrum,

    /// Reflectance of the left wall.
    pub left_reflectance: RGBSpectrum,

    /// Reflectance of the right wall.
    pub right_reflectance: RGBSpectrum,

    /// Reflectance of every other wall.
    pub wall_reflectance: RGBSpectrum,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            patches: DEFAULT_PATCHES,
            resolution: DEFAULT_RESOLUTION,
            closed: false,
            emitter_size: DEFAULT_SIZE * EMITTER_FRACTION,
            emitter_offset: EMITTER_OFFSET,
            emission: RGBSpectrum::new(15.0),
            left_reflectance: RGBSpectrum::from_rgb(0.63, 0.06, 0.04),
            right_reflectance: RGBSpectrum::from_rgb(0.14, 0.45, 0.09),
            wall_reflectance: RGBSpectrum::new(0.73),
        }
    }
}

impl From<&Options> for SceneConfig {
    /// Create a `SceneConfig` from command line options.
    ///
    /// * `options` - The options.
    fn from(options: &Options) -> Self {
        Self {
            size: options.size,
            patches: options.patches,
            resolution: options.resolution(),
            closed: options.closed,
            emitter_size: options.size * EMITTER_FRACTION,
            ..Self::default()
        }
        .sanitized()
    }
}

/// Placement and materials of one face of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct FaceDesc {
    /// Name used for debug dumps.
    pub name: &'static str,

    /// Orientation of every quad on the face.
    pub orientation: Orientation,

    /// Offset of the face plane along the fixed axis.
    pub k: Float,

    /// Bounds along the u axis.
    pub u_extent: (Float, Float),

    /// Bounds along the v axis.
    pub v_extent: (Float, Float),

    /// Number of quad rows (bottom to top in the visual frame).
    pub rows: usize,

    /// Number of quad columns (left to right in the visual frame).
    pub cols: usize,

    /// Reflectance.
    pub reflectance: RGBSpectrum,

    /// Radiant exitance.
    pub emission: RGBSpectrum,
}

impl SceneConfig {
    /// Returns a copy with every value replaced by a usable default when it
    /// would produce an empty or degenerate face.
    pub fn sanitized(&self) -> Self {
        let mut c = self.clone();
        if !(c.size > 0.0 && c.size.is_finite()) {
            warn!("Invalid enclosure size {}, using {}", c.size, DEFAULT_SIZE);
            c.size = DEFAULT_SIZE;
        }
        if c.patches == 0 {
            warn!("Invalid patch count 0, using 1");
            c.patches = 1;
        }
        if !(c.emitter_size > 0.0 && c.emitter_size < c.size) {
            let emitter_size = c.size * EMITTER_FRACTION;
            warn!("Invalid emitter size {}, using {}", c.emitter_size, emitter_size);
            c.emitter_size = emitter_size;
        }
        if !(c.emitter_offset > 0.0 && c.emitter_offset < c.size) {
            let emitter_offset = EMITTER_OFFSET.min(0.5 * c.size);
            warn!("Invalid emitter offset {}, using {}", c.emitter_offset, emitter_offset);
            c.emitter_offset = emitter_offset;
        }
        c
    }

    /// Returns the faces of the enclosure followed by the emitter.
    pub fn faces(&self) -> Vec<FaceDesc> {
        let config = self.sanitized();
        let s = config.size;
        let wall = |name, orientation, k, reflectance| FaceDesc {
            name,
            orientation,
            k,
            u_extent: (0.0, s),
            v_extent: (0.0, s),
            rows: config.patches,
            cols: config.patches,
            reflectance,
            emission: RGBSpectrum::default(),
        };

        let mut faces = vec![
            wall("back", Orientation::Back, 0.0, config.wall_reflectance),
            wall("left", Orientation::Left, 0.0, config.left_reflectance),
            wall("floor", Orientation::Floor, 0.0, config.wall_reflectance),
            wall("right", Orientation::Right, s, config.right_reflectance),
            wall("ceiling", Orientation::Ceiling, s, config.wall_reflectance),
        ];
        if config.closed {
            faces.push(wall("front", Orientation::Front, s, config.wall_reflectance));
        }

        let lo = 0.5 * (s - config.emitter_size);
        let hi = 0.5 * (s + config.emitter_size);
        faces.push(FaceDesc {
            name: "emitter",
            orientation: Orientation::Ceiling,
            k: s - config.emitter_offset,
            u_extent: (lo, hi),
            v_extent: (lo, hi),
            rows: config.patches,
            cols: config.patches,
            reflectance: RGBSpectrum::default(),
            emission: config.emission,
        });

        faces
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
