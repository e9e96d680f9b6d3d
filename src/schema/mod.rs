//! Schema module - Configuration and genome types for circle evolution.

mod config;
mod evolution;

pub use config::*;
pub use evolution::*;
