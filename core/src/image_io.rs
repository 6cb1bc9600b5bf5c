//! Image I/O

use crate::spectrum::*;
use image::*;
use regex::Regex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::result::Result;
use std::sync::OnceLock;

/// Streams pixels into a plain-text (P3) PPM file. The header is written when
/// the file is created, so a writer only exists for a file that was opened
/// successfully.
pub struct PpmWriter {
    /// Buffered output file.
    out: BufWriter<File>,

    /// Output file path used in error messages.
    path: String,

    /// Number of pixels the header promises.
    expected: usize,

    /// Number of pixels written so far.
    written: usize,
}

impl PpmWriter {
    /// Create the output file and write the PPM header.
    ///
    /// * `path`   - Output file path.
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn create(path: &str, width: usize, height: usize) -> Result<Self, String> {
        let file = File::create(path).map_err(|e| format!("PpmWriter::create(): Error opening PPM file '{path}': {e}"))?;
        let mut out = BufWriter::new(file);

        write!(out, "P3\n{width} {height}\n255\n")
            .map_err(|e| format!("PpmWriter::create(): Error writing PPM header '{path}': {e}"))?;

        Ok(Self {
            out,
            path: path.to_string(),
            expected: width * height,
            written: 0,
        })
    }

    /// Write the next pixel in row-major order.
    ///
    /// * `c` - Pixel colour.
    pub fn write_color(&mut self, c: &RGBSpectrum) -> Result<(), String> {
        let [r, g, b] = c.to_rgb8();
        writeln!(self.out, "{r} {g} {b}")
            .map_err(|e| format!("PpmWriter::write_color(): Error writing PPM pixel '{}': {e}", self.path))?;
        self.written += 1;
        Ok(())
    }

    /// Flush the file and verify the pixel count matches the header.
    pub fn finish(mut self) -> Result<(), String> {
        self.out
            .flush()
            .map_err(|e| format!("PpmWriter::finish(): Error flushing PPM file '{}': {e}", self.path))?;

        if self.written != self.expected {
            return Err(format!(
                "PpmWriter::finish(): '{}' has {} pixels but header declares {}",
                self.path, self.written, self.expected
            ));
        }
        Ok(())
    }
}

/// Write the output image to given path.
///
/// * `path`   - Output file path.
/// * `pixels` - Pixels in row-major order, top row first.
/// * `width`  - Image width in pixels.
/// * `height` - Image height in pixels.
pub fn write_image(path: &str, pixels: &[RGBSpectrum], width: usize, height: usize) -> Result<(), String> {
    if pixels.len() != width * height {
        return Err(format!(
            "write_image(): {} pixels do not fill a {width}x{height} image",
            pixels.len()
        ));
    }

    match get_extension_from_filename(path) {
        Some(".ppm") => write_ppm(path, pixels, width, height),
        Some(".png") => write_8_bit(path, pixels, width, height, ImageFormat::Png),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension. This will match the last occurrence of a period
/// followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").unwrap())
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
}

/// Writes the image in plain-text PPM format.
///
/// * `path`   - Output file path.
/// * `pixels` - Pixels in row-major order.
/// * `width`  - Image width.
/// * `height` - Image height.
fn write_ppm(path: &str, pixels: &[RGBSpectrum], width: usize, height: usize) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let mut writer = PpmWriter::create(path, width, height)?;
    for p in pixels {
        writer.write_color(p)?;
    }
    writer.finish()
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `pixels`       - Pixels in row-major order.
/// * `width`        - Image width.
/// * `height`       - Image height.
/// * `image_format` - Image format.
fn write_8_bit(
    path: &str,
    pixels: &[RGBSpectrum],
    width: usize,
    height: usize,
    image_format: ImageFormat,
) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let mut imgbuf = ImageBuffer::new(width as u32, height as u32);
    for (offset, p) in pixels.iter().enumerate() {
        let x = (offset % width) as u32;
        let y = (offset / width) as u32;
        imgbuf.put_pixel(x, y, Rgb(p.to_rgb8()));
    }

    match imgbuf.save_with_format(String::from(path), image_format) {
        Ok(()) => Ok(()),
        Err(err) => Err(format!("Error saving output image {path}: {err}.")),
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn extension_is_last_suffix() {
        assert_eq!(get_extension_from_filename("a/b.c/out.ppm"), Some(".ppm"));
        assert_eq!(get_extension_from_filename("out"), None);
    }

    #[test]
    fn ppm_has_header_and_one_triple_per_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        let path = path.to_str().unwrap();

        let pixels = vec![
            RGBSpectrum::new(0.0),
            RGBSpectrum::new(1.0),
            RGBSpectrum::from_rgb(1.0, 0.0, 0.0),
            RGBSpectrum::from_rgb(0.0, 0.0, 1.0),
            RGBSpectrum::new(0.0),
            RGBSpectrum::new(2.0),
        ];
        write_image(path, &pixels, 3, 2).unwrap();

        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "P3");
        assert_eq!(lines[1], "3 2");
        assert_eq!(lines[2], "255");
        assert_eq!(lines.len(), 3 + 6);
        assert_eq!(lines[3], "0 0 0");
        assert_eq!(lines[5], "255 0 0");
        assert_eq!(lines[8], "255 255 255");
    }

    #[test]
    fn failed_open_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.ppm");
        assert!(PpmWriter::create(path.to_str().unwrap(), 1, 1).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn finish_rejects_short_body() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.ppm");
        let mut writer = PpmWriter::create(path.to_str().unwrap(), 2, 1).unwrap();
        writer.write_color(&RGBSpectrum::new(0.5)).unwrap();
        assert!(writer.finish().is_err());
    }

    #[test]
    fn mismatched_pixel_count_is_rejected() {
        assert!(write_image("unused.ppm", &[RGBSpectrum::default()], 2, 2).is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        assert!(write_image("out.bmp", &[RGBSpectrum::default()], 1, 1).is_err());
    }
}
