//! Evolutionary search for circle genomes that approximate a target image.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Fitness** (`fitness`): render a genome and sum squared channel
//!   differences against the target (lower is better)
//! - **Genome Operations** (`genome`): random circles, chunked crossover,
//!   delete-then-add mutation
//! - **Population** (`population`): group breeding, truncation, best extraction
//! - **Search** (`search`): the fixed-length generation loop
//! - **Archive** (`archive`): per-generation snapshots on disk
//!
//! # Example
//!
//! ```rust,no_run
//! use bubbles::compute::evolution::EvolutionEngine;
//! use bubbles::schema::EvolutionConfig;
//! use image::{Rgb, RgbImage};
//!
//! let config = EvolutionConfig::default();
//! let target = RgbImage::from_pixel(512, 512, Rgb([40, 90, 160]));
//!
//! let mut engine = EvolutionEngine::new(config, target).unwrap();
//! let result = engine.run_with_callback(|report| {
//!     println!("Generation {}: best fitness = {}",
//!         report.generation, report.best.fitness());
//! });
//!
//! println!("Best genome has {} circles", result.best.len());
//! ```

mod archive;
mod fitness;
mod genome;
mod population;
mod search;

pub use archive::{ArchiveError, GenerationArchive};
pub use fitness::{FitnessEvaluator, squared_difference};
pub use genome::{GenomeRng, MutationOutcome};
pub use population::{GrowthStats, Individual, Population, admits, breed};
pub use search::{EvolutionEngine, EvolutionError, EvolutionResult, GenerationReport};
