//! Application related stuff

use crate::pbrt::Float;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

/// System wide options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Options {
    /// Edge length of the enclosure.
    #[arg(
        long = "size",
        short = 's',
        value_name = "FLOAT",
        default_value_t = 5.0,
        help = "Edge length of the cubic enclosure."
    )]
    pub size: Float,

    /// Number of quads along each edge of an enclosure face.
    #[arg(
        long = "patches",
        short = 'n',
        value_name = "NUM",
        default_value_t = 8,
        help = "Number of quads along each edge of an enclosure face."
    )]
    pub patches: usize,

    /// Hemicube resolution in pixels along each edge of the top face.
    #[arg(
        long = "resolution",
        short = 'r',
        value_name = "NUM",
        default_value_t = 64,
        help = "Hemicube resolution in pixels along each edge of the top face."
    )]
    resolution: usize,

    /// Width of the rendered image.
    #[arg(long, value_name = "NUM", default_value_t = 256, help = "Width of the rendered image.")]
    pub width: usize,

    /// Height of the rendered image.
    #[arg(long, value_name = "NUM", default_value_t = 256, help = "Height of the rendered image.")]
    pub height: usize,

    /// Path to the image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "radiosity.ppm",
        help = "Write the final image to the given filename (.ppm or .png)."
    )]
    pub image_file: String,

    /// Directory for the per-face debug rasters.
    #[arg(
        long = "dump-dir",
        short = 'd',
        value_name = "DIR",
        default_value = ".",
        help = "Write a debug raster of every enclosure face to the given directory."
    )]
    pub dump_dir: String,

    /// Close the front of the enclosure.
    #[arg(long, help = "Also build the front wall so the enclosure is fully closed.")]
    pub closed: bool,

    /// Suppress all text output other than error messages.
    #[arg(long, help = "Suppress all text output other than error messages.")]
    pub quiet: bool,
}

impl Options {
    /// Returns the hemicube resolution. Side faces sample half the rows of
    /// the top face so the resolution is rounded up to an even number.
    pub fn resolution(&self) -> usize {
        match self.resolution {
            0 => {
                warn!("Invalid hemicube resolution 0, using 2");
                2
            }
            n if n % 2 == 1 => {
                warn!("Hemicube resolution {} is odd, using {}", n, n + 1);
                n + 1
            }
            n => n,
        }
    }
}

/// Create a progress bar for a task with the given number of steps.
///
/// * `total` - Number of steps.
/// * `quiet` - Hide the progress bar.
pub fn create_progress_reporter(total: u64, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let style = ProgressStyle::with_template("{msg} [{elapsed_precise}] {wide_bar} {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    ProgressBar::new(total).with_style(style)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let options = Options::parse_from(["radiosity"]);
        assert_eq!(options.size, 5.0);
        assert_eq!(options.patches, 8);
        assert_eq!(options.resolution(), 64);
        assert_eq!(options.image_file, "radiosity.ppm");
        assert_eq!(options.dump_dir, ".");
        assert!(!options.closed);
    }

    #[test]
    fn odd_resolution_is_rounded_up() {
        let options = Options::parse_from(["radiosity", "-r", "9"]);
        assert_eq!(options.resolution(), 10);
    }

    #[test]
    fn zero_resolution_is_replaced() {
        let options = Options::parse_from(["radiosity", "--resolution", "0"]);
        assert_eq!(options.resolution(), 2);
    }
}
