//! Final image rendering

use super::quad_manager::*;
use super::scene_config::SceneConfig;
use cameras::Canvas;
use core_lib::geometry::*;
use core_lib::pbrt::*;
use core_lib::spectrum::*;
use indicatif::ProgressBar;

/// Returns a canvas covering the open front of the enclosure and an eye
/// placed in front of it, looking in along -z.
///
/// * `config` - Scene configuration.
/// * `width`  - Image width in pixels.
/// * `height` - Image height in pixels.
pub fn front_view(config: &SceneConfig, width: usize, height: usize) -> (Canvas, Point3f) {
    let s = config.size;
    let cg = if width > 0 { s / width as Float } else { 0.0 };
    let canvas = Canvas::new(
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, s),
        width,
        height,
        s,
        s,
        cg,
    );
    let eye = Point3::new(0.5 * s, 0.5 * s, 2.0 * s);
    (canvas, eye)
}

/// Trace one ray per canvas pixel and return the colours in canvas order,
/// top row first.
///
/// * `scene`    - The scene.
/// * `canvas`   - Canvas to walk.
/// * `eye`      - Eye position.
/// * `progress` - Progress bar advanced once per row.
pub fn render(scene: &QuadManager, canvas: &mut Canvas, eye: &Point3f, progress: &ProgressBar) -> Vec<RGBSpectrum> {
    let width = canvas.width();
    let mut pixels = Vec::with_capacity(width * canvas.height());

    while canvas.not_finished_writing() {
        let ray = canvas.generate_ray(eye);
        pixels.push(scene.get_color(&ray, RAY_T_MIN, INFINITY));
        if pixels.len() % width == 0 {
            progress.inc(1);
        }
    }

    progress.finish_and_clear();
    debug!("Rendered {} pixels", pixels.len());
    pixels
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
