//! Radiosity

#[macro_use]
extern crate log;

mod element;
mod face;
mod hemicube;
mod mapping;
mod quad_manager;
mod render;
mod scene_config;
mod solver;

// Re-export
pub use element::*;
pub use face::*;
pub use hemicube::*;
pub use mapping::*;
pub use quad_manager::*;
pub use render::*;
pub use scene_config::*;
pub use solver::*;
