//! Bubbles - Evolutionary image approximation with colored circles.
//!
//! A population of genomes, each an ordered list of colored circles, is
//! evolved toward a target image. Fitness is the sum of squared channel
//! differences between a genome's rendering and the target.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Configuration, circle and progress types
//! - `compute`: Rendering, target loading and the evolutionary search
//!
//! # Example
//!
//! ```rust,no_run
//! use bubbles::{
//!     schema::EvolutionConfig,
//!     compute::{load_target, evolution::{EvolutionEngine, GenerationArchive}},
//! };
//!
//! let config = EvolutionConfig::default();
//! let target = load_target("target.png", config.canvas.width, config.canvas.height, false)
//!     .unwrap();
//!
//! let mut archive = GenerationArchive::new(&config.output).unwrap();
//! let mut engine = EvolutionEngine::new(config, target).unwrap();
//! let result = engine.run();
//!
//! archive.save_final(&result.best, engine.evaluator().canvas()).unwrap();
//! println!("Best fitness after {} generations: {}",
//!     result.stats.generations, result.stats.best_fitness);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, GenerationArchive, Individual};
pub use compute::{Canvas, load_target};
pub use schema::{Circle, EvolutionConfig};
