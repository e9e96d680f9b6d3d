//! Quick evolution performance test

use bubbles::{
    EvolutionConfig, EvolutionEngine,
    schema::{CanvasConfig, GenomeConstraints, PopulationConfig},
};
use image::{Rgb, RgbImage};
use std::time::Instant;

fn gradient_target(size: u32) -> RgbImage {
    RgbImage::from_fn(size, size, |x, y| {
        let r = (x * 255 / size.max(1)) as u8;
        let g = (y * 255 / size.max(1)) as u8;
        Rgb([r, g, 255 - r / 2])
    })
}

fn main() {
    println!("=== Evolution Performance Test ===\n");

    // Test different canvas sizes
    for canvas_size in [64, 128, 256] {
        println!("Canvas size: {}x{}", canvas_size, canvas_size);

        let config = EvolutionConfig {
            canvas: CanvasConfig {
                width: canvas_size,
                height: canvas_size,
                ..Default::default()
            },
            population: PopulationConfig {
                size: 12,
                generations: 10,
                group_size: 4,
            },
            constraints: GenomeConstraints {
                circle_count_bounds: (50, 200),
                radius_bounds: (2, (canvas_size / 50).max(2)),
            },
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = match EvolutionEngine::new(config, gradient_target(canvas_size)) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("  Error: {}", e);
                continue;
            }
        };
        let result = engine.run();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!("  Generations:    {}", result.stats.generations);
        println!("  Evaluations:    {}", total_evals);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Evals/sec:      {:.1}", evals_per_sec);
        println!("  Best fitness:   {}", result.stats.best_fitness);
        println!("  Best circles:   {}", result.best.len());
        println!();
    }

    println!("=== Scalability Test (fixed 128x128 canvas) ===\n");

    // Test different population sizes
    for pop_size in [8, 16, 32, 64] {
        let config = EvolutionConfig {
            canvas: CanvasConfig {
                width: 128,
                height: 128,
                ..Default::default()
            },
            population: PopulationConfig {
                size: pop_size,
                generations: 5,
                group_size: 4,
            },
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = match EvolutionEngine::new(config, gradient_target(128)) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Population {}: {}", pop_size, e);
                continue;
            }
        };
        let result = engine.run();
        let elapsed = start.elapsed();

        let total_evals = result.stats.total_evaluations;
        let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

        println!(
            "Population {}: {} evals in {:.2}s ({:.1} evals/sec)",
            pop_size,
            total_evals,
            elapsed.as_secs_f64(),
            evals_per_sec
        );
    }
}
