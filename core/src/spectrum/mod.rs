//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;
