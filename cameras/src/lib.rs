//! Camera

#[macro_use]
extern crate log;

mod canvas;

// Re-export
pub use canvas::*;
