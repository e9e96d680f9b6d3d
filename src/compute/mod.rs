//! Compute module - Rendering, target loading and evolution.

mod canvas;
mod target;

pub mod evolution;

pub use canvas::*;
pub use target::*;
