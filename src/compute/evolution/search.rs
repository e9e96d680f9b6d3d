//! Evolution driver: initial population and the fixed-length generation loop.

use std::convert::Infallible;
use std::time::Instant;

use image::RgbImage;
use log::{debug, info};
use rayon::prelude::*;

use crate::schema::{
    EvolutionConfig, EvolutionConfigError, EvolutionHistory, EvolutionPhase, EvolutionProgress,
    EvolutionStats,
};

use super::fitness::FitnessEvaluator;
use super::genome::GenomeRng;
use super::population::{GrowthStats, Individual, Population};

/// Errors raised when constructing an engine.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] EvolutionConfigError),
    #[error("Target is {actual_width}x{actual_height}, canvas is {width}x{height}")]
    TargetShape {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Summary of one completed generation round.
#[derive(Debug, Clone)]
pub struct GenerationReport<'a> {
    /// Zero-based index of the round.
    pub generation: usize,
    /// Best individual after the shrink phase.
    pub best: &'a Individual,
    /// Average fitness after the shrink phase.
    pub avg_fitness: f64,
    /// Population size after the shrink phase.
    pub population_size: usize,
    /// Growth phase statistics.
    pub growth: GrowthStats,
}

/// Final result of an evolution run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best individual of the final population.
    pub best: Individual,
    /// Statistics from the run.
    pub stats: EvolutionStats,
    /// Per-generation history.
    pub history: EvolutionHistory,
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    population: Population,
    history: EvolutionHistory,
    generation: usize,
    phase: EvolutionPhase,
}

impl EvolutionEngine {
    /// Create a new evolution engine for `target`.
    ///
    /// Fails if the configuration is invalid or the target does not have
    /// the configured canvas dimensions.
    pub fn new(config: EvolutionConfig, target: RgbImage) -> Result<Self, EvolutionError> {
        config.validate()?;

        let (width, height) = (config.canvas.width, config.canvas.height);
        if target.dimensions() != (width, height) {
            return Err(EvolutionError::TargetShape {
                width,
                height,
                actual_width: target.width(),
                actual_height: target.height(),
            });
        }

        let rng = match config.random_seed {
            Some(seed) => GenomeRng::new(seed),
            None => GenomeRng::random(),
        };
        let evaluator = FitnessEvaluator::new(target, config.canvas.background);
        let population = Population::new(
            Vec::new(),
            config.population.size,
            config.population.group_size,
        );

        Ok(Self {
            config,
            rng,
            evaluator,
            population,
            history: EvolutionHistory::default(),
            generation: 0,
            phase: EvolutionPhase::Initializing,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// The fitness evaluator (and through it, the target and canvas).
    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }

    /// The current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current phase.
    pub fn phase(&self) -> EvolutionPhase {
        self.phase
    }

    /// Per-generation history so far.
    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    /// Initialize the population.
    ///
    /// Circles are drawn sequentially from the seeded generator; scoring
    /// runs in parallel since it only reads the target.
    pub fn initialize(&mut self) {
        self.phase = EvolutionPhase::Initializing;
        self.generation = 0;
        self.history = EvolutionHistory::default();

        let genomes: Vec<_> = (0..self.config.population.size)
            .map(|_| {
                self.rng
                    .random_circles(self.evaluator.target(), &self.config.constraints)
            })
            .collect();

        let evaluator = &self.evaluator;
        let members: Vec<Individual> = genomes
            .into_par_iter()
            .map(|circles| evaluator.evaluate(circles))
            .collect();

        self.population = Population::new(
            members,
            self.config.population.size,
            self.config.population.group_size,
        );
        self.phase = EvolutionPhase::Evolving;

        info!(
            "Initialized {} individuals, best fitness {}",
            self.population.len(),
            self.population.best().map_or(0, |b| b.fitness())
        );
    }

    /// Run a single generation round: grow, shrink, extract the best.
    ///
    /// Initializes first if needed.
    pub fn step_generation(&mut self) -> GenerationReport<'_> {
        if self.population.is_empty() {
            self.initialize();
        }

        let growth = self.population.grow(
            &mut self.rng,
            &self.evaluator,
            &self.config.constraints,
            &self.config.mutation,
        );
        self.population.shrink();

        let generation = self.generation;
        self.generation += 1;
        if self.generation >= self.config.population.generations {
            self.phase = EvolutionPhase::Finished;
        }

        let avg_fitness = self.population.avg_fitness();
        let population_size = self.population.len();
        let best = self
            .population
            .best()
            .expect("population is non-empty after initialization");

        self.history.best_fitness.push(best.fitness());
        self.history.avg_fitness.push(avg_fitness);
        self.history.children_admitted.push(growth.children_admitted);
        self.history.best_circle_count.push(best.len());

        info!(
            "Generation {}: best fitness {} ({} circles), avg {:.1}",
            generation,
            best.fitness(),
            best.len(),
            avg_fitness
        );

        GenerationReport {
            generation,
            best,
            avg_fitness,
            population_size,
            growth,
        }
    }

    /// Get current progress.
    pub fn progress(&self) -> EvolutionProgress {
        EvolutionProgress {
            generation: self.generation,
            total_generations: self.config.population.generations,
            population_size: self.population.len(),
            best_fitness: self.population.best().map(|b| b.fitness()),
            avg_fitness: self.population.avg_fitness(),
            evaluations: self.evaluator.evaluations(),
            phase: self.phase,
        }
    }

    /// Run evolution, reporting every generation to a fallible callback.
    ///
    /// Always runs the configured number of generations unless the
    /// callback fails, in which case the error is returned immediately.
    pub fn try_run_with_callback<F, E>(&mut self, mut callback: F) -> Result<EvolutionResult, E>
    where
        F: FnMut(&GenerationReport<'_>) -> Result<(), E>,
    {
        let start_time = Instant::now();

        self.initialize();

        for _ in 0..self.config.population.generations {
            let report = self.step_generation();
            callback(&report)?;
        }
        self.phase = EvolutionPhase::Finished;

        let elapsed = start_time.elapsed().as_secs_f64();
        let total_evaluations = self.evaluator.evaluations();
        let best = self
            .population
            .best()
            .cloned()
            .expect("population is non-empty after initialization");

        debug!(
            "Evolution finished after {} generations in {:.2}s",
            self.generation, elapsed
        );

        Ok(EvolutionResult {
            stats: EvolutionStats {
                generations: self.generation,
                total_evaluations,
                best_fitness: best.fitness(),
                final_avg_fitness: self.population.avg_fitness(),
                elapsed_seconds: elapsed,
                evaluations_per_second: total_evaluations as f64 / elapsed.max(1e-9),
            },
            best,
            history: self.history.clone(),
        })
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> EvolutionResult
    where
        F: FnMut(&GenerationReport<'_>),
    {
        let result: Result<EvolutionResult, Infallible> = self.try_run_with_callback(|report| {
            callback(report);
            Ok(())
        });
        match result {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> EvolutionResult {
        self.run_with_callback(|_| {})
    }
}
