//! Bubbles CLI - Evolve a circle painting of a target image.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use bubbles::{
    compute::{
        evolution::{ArchiveError, EvolutionEngine, GenerationArchive},
        load_target,
    },
    schema::EvolutionConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <target-image> [config.json]", args[0]);
        eprintln!();
        eprintln!("Evolve a population of circle paintings toward a target image.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  target-image  Image to approximate (PNG, JPEG or BMP)");
        eprintln!("  config.json   Evolution configuration (default: built-in)");
        eprintln!();
        eprintln!("Print the default configuration with --example.");
        std::process::exit(1);
    }

    let target_path = PathBuf::from(&args[1]);

    // Load configuration
    let config: EvolutionConfig = match args.get(2) {
        Some(path) => {
            let config_str = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading config file: {}", e);
                std::process::exit(1);
            });
            serde_json::from_str(&config_str).unwrap_or_else(|e| {
                eprintln!("Error parsing config: {}", e);
                std::process::exit(1);
            })
        }
        None => EvolutionConfig::default(),
    };

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let target = load_target(
        &target_path,
        config.canvas.width,
        config.canvas.height,
        config.canvas.fit_target,
    )
    .unwrap_or_else(|e| {
        eprintln!("Error loading target {}: {}", target_path.display(), e);
        std::process::exit(1);
    });

    let mut archive = GenerationArchive::new(&config.output).unwrap_or_else(|e| {
        eprintln!(
            "Error creating output directory {}: {}",
            config.output.directory.display(),
            e
        );
        std::process::exit(1);
    });

    println!("Bubbles Evolution");
    println!("=================");
    println!("Canvas: {}x{}", config.canvas.width, config.canvas.height);
    println!(
        "Population: {} (groups of {})",
        config.population.size, config.population.group_size
    );
    println!("Generations: {}", config.population.generations);
    println!(
        "Circles: {}-{}, radius {}-{}",
        config.constraints.circle_count_bounds.0,
        config.constraints.circle_count_bounds.1,
        config.constraints.radius_bounds.0,
        config.constraints.radius_bounds.1
    );
    println!("Output: {}", archive.output_dir().display());
    println!();

    let mut engine = EvolutionEngine::new(config, target).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let canvas = engine.evaluator().canvas().clone();
    let start = Instant::now();

    let result = engine.try_run_with_callback(|report| -> Result<(), ArchiveError> {
        archive.save_generation(report.generation, report.best, &canvas)?;
        println!(
            "  Generation {}: best={} ({} circles), avg={:.0}, admitted={}, {:.1}s",
            report.generation,
            report.best.fitness(),
            report.best.len(),
            report.avg_fitness,
            report.growth.children_admitted,
            start.elapsed().as_secs_f32()
        );
        Ok(())
    });

    let result = result.unwrap_or_else(|e| {
        eprintln!("Error writing snapshot: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = archive.save_final(&result.best, &canvas) {
        eprintln!("Error writing final result: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("Final result:");
    println!("  Best fitness: {}", result.stats.best_fitness);
    println!("  Circles: {}", result.best.len());
    println!("  Evaluations: {}", result.stats.total_evaluations);
    println!(
        "  Time: {:.2}s ({:.1} evaluations/s)",
        result.stats.elapsed_seconds, result.stats.evaluations_per_second
    );
}

fn print_example_config() {
    let config = EvolutionConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing example config: {}", e);
            std::process::exit(1);
        }
    }
}
