//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod app;
pub mod geometry;
pub mod image_io;
pub mod matrix;
pub mod pbrt;
pub mod spectrum;
