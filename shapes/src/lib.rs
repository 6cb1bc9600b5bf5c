//! Shapes

mod orientation;
mod quad;

// Re-export
pub use orientation::*;
pub use quad::*;
