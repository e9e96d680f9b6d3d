//! Genome and progress types for circle evolution.
//!
//! These are the plain-data types shared between the evolution engine,
//! the generation archive and callers that observe a run.

use serde::{Deserialize, Serialize};

// ============================================================================
// Genome Types
// ============================================================================

/// A single colored disk.
///
/// Circles are values: they are created, copied or dropped, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    /// Center as (column, row) in canvas pixels.
    pub center: (u32, u32),
    /// Radius in pixels.
    pub radius: u32,
    /// RGB fill color.
    pub color: [u8; 3],
}

/// Exported genome, written next to generation snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeExport {
    /// Where the genome came from.
    pub metadata: GenomeMetadata,
    /// Circles in painter's order.
    pub circles: Vec<Circle>,
}

/// Metadata for an exported genome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeMetadata {
    /// Generation index, `None` for the final result.
    pub generation: Option<usize>,
    /// Fitness (sum of squared channel differences).
    pub fitness: u64,
    /// Number of circles.
    pub circle_count: usize,
    /// Canvas width the genome was scored on.
    pub width: u32,
    /// Canvas height the genome was scored on.
    pub height: u32,
}

// ============================================================================
// Progress and Result Types
// ============================================================================

/// Progress snapshot of a running engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionProgress {
    /// Generations completed so far.
    pub generation: usize,
    /// Total generations planned.
    pub total_generations: usize,
    /// Current population size.
    pub population_size: usize,
    /// Lowest fitness in the current population.
    pub best_fitness: Option<u64>,
    /// Average fitness of the current population.
    pub avg_fitness: f64,
    /// Fitness evaluations performed so far.
    pub evaluations: u64,
    /// Current phase.
    pub phase: EvolutionPhase,
}

/// Per-generation statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best (lowest) fitness per generation.
    pub best_fitness: Vec<u64>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Children admitted into the population per generation.
    pub children_admitted: Vec<usize>,
    /// Circle count of the best genome per generation.
    pub best_circle_count: Vec<usize>,
}

/// Phase of the evolution driver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum EvolutionPhase {
    /// Building and scoring the initial population.
    #[default]
    Initializing,
    /// Running generation rounds.
    Evolving,
    /// All configured generations have run.
    Finished,
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Total generations run.
    pub generations: usize,
    /// Total fitness evaluations performed.
    pub total_evaluations: u64,
    /// Best fitness achieved.
    pub best_fitness: u64,
    /// Average fitness of the final population.
    pub final_avg_fitness: f64,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Evaluations per second.
    pub evaluations_per_second: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle(center: (u32, u32), radius: u32) -> Circle {
        Circle {
            center,
            radius,
            color: [10, 20, 30],
        }
    }

    #[test]
    fn test_export_serialization() {
        let export = GenomeExport {
            metadata: GenomeMetadata {
                generation: Some(3),
                fitness: 42,
                circle_count: 1,
                width: 16,
                height: 16,
            },
            circles: vec![circle((2, 3), 4)],
        };
        let json = serde_json::to_string(&export).unwrap();
        let parsed: GenomeExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.circles, export.circles);
        assert_eq!(parsed.metadata.generation, Some(3));
    }
}
