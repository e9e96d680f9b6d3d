//! Configuration types for circle evolution runs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Largest accepted canvas side. Rendering works in `i32` pixel coordinates.
pub const MAX_CANVAS_SIDE: u32 = 1 << 15;

/// Top-level configuration for an evolution run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Canvas dimensions and background.
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Population and generation settings.
    #[serde(default)]
    pub population: PopulationConfig,
    /// Genome constraints (circle count and radius bounds).
    #[serde(default)]
    pub constraints: GenomeConstraints,
    /// Mutation parameters.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Where and how generation snapshots are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

/// Canvas the genomes are rendered onto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Canvas width in pixels.
    #[serde(default = "default_canvas_side")]
    pub width: u32,
    /// Canvas height in pixels.
    #[serde(default = "default_canvas_side")]
    pub height: u32,
    /// Background color every render starts from.
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    /// Resize the target to the canvas instead of rejecting a size mismatch.
    #[serde(default)]
    pub fit_target: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_side(),
            height: default_canvas_side(),
            background: default_background(),
            fit_target: false,
        }
    }
}

fn default_canvas_side() -> u32 {
    512
}
fn default_background() -> [u8; 3] {
    [255, 255, 255]
}

/// Population and generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Nominal population size, restored by every shrink phase.
    #[serde(default = "default_population_size")]
    pub size: usize,
    /// Number of generation rounds to run.
    #[serde(default = "default_generations")]
    pub generations: usize,
    /// Size of the groups the population is split into for breeding.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            generations: default_generations(),
            group_size: default_group_size(),
        }
    }
}

fn default_population_size() -> usize {
    12
}
fn default_generations() -> usize {
    10
}
fn default_group_size() -> usize {
    4
}

/// Bounds applied when creating circles and genomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenomeConstraints {
    /// Inclusive range for the circle count of a freshly created genome.
    #[serde(default = "default_circle_count_bounds")]
    pub circle_count_bounds: (usize, usize),
    /// Inclusive range for circle radii in pixels.
    #[serde(default = "default_radius_bounds")]
    pub radius_bounds: (u32, u32),
}

impl Default for GenomeConstraints {
    fn default() -> Self {
        Self {
            circle_count_bounds: default_circle_count_bounds(),
            radius_bounds: default_radius_bounds(),
        }
    }
}

fn default_circle_count_bounds() -> (usize, usize) {
    (50, 200)
}
fn default_radius_bounds() -> (u32, u32) {
    // max radius is one fiftieth of the default canvas width
    (5, 10)
}

/// Mutation parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Upper bound on the share of circles removed by one mutation (0.0-1.0).
    #[serde(default = "default_delete_fraction")]
    pub delete_fraction: f64,
    /// Number of circles added, as multiples of the number deleted.
    /// Kept around 1.0 so genomes grow slowly.
    #[serde(default = "default_add_ratio_bounds")]
    pub add_ratio_bounds: (f64, f64),
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            delete_fraction: default_delete_fraction(),
            add_ratio_bounds: default_add_ratio_bounds(),
        }
    }
}

fn default_delete_fraction() -> f64 {
    0.1
}
fn default_add_ratio_bounds() -> (f64, f64) {
    (0.5, 1.5)
}

/// Generation snapshot output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the snapshots are written to.
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    /// Image file extension; selects the encoder.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Also write the best genome's circles as JSON next to each image.
    #[serde(default)]
    pub export_genomes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            extension: default_extension(),
            export_genomes: false,
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_extension() -> String {
    "png".to_string()
}

// ============================================================================
// Validation
// ============================================================================

/// Evolution configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionConfigError {
    #[error("Canvas dimensions must lie in [1, 32768]")]
    InvalidDimensions,
    #[error("Population size must be at least 1")]
    EmptyPopulation,
    #[error("Group size must be at least 1")]
    InvalidGroupSize,
    #[error("Genomes need at least 2 circles, got a minimum of {0}")]
    TooFewCircles(usize),
    #[error("Invalid parameter bounds: {0}")]
    InvalidBounds(String),
    #[error("Delete fraction {0} must lie in [0, 1]")]
    InvalidDeleteFraction(f64),
    #[error("Output extension must not be empty")]
    MissingExtension,
}

impl EvolutionConfig {
    /// Validate evolution configuration.
    pub fn validate(&self) -> Result<(), EvolutionConfigError> {
        let sides = 1..=MAX_CANVAS_SIDE;
        if !sides.contains(&self.canvas.width) || !sides.contains(&self.canvas.height) {
            return Err(EvolutionConfigError::InvalidDimensions);
        }

        if self.population.size == 0 {
            return Err(EvolutionConfigError::EmptyPopulation);
        }
        if self.population.group_size == 0 {
            return Err(EvolutionConfigError::InvalidGroupSize);
        }

        let (min_circles, max_circles) = self.constraints.circle_count_bounds;
        if min_circles < 2 {
            return Err(EvolutionConfigError::TooFewCircles(min_circles));
        }
        if min_circles > max_circles {
            return Err(EvolutionConfigError::InvalidBounds(format!(
                "circle count min ({}) > max ({})",
                min_circles, max_circles
            )));
        }

        let (min_radius, max_radius) = self.constraints.radius_bounds;
        if min_radius > max_radius {
            return Err(EvolutionConfigError::InvalidBounds(format!(
                "radius min ({}) > max ({})",
                min_radius, max_radius
            )));
        }
        let longest_side = self.canvas.width.max(self.canvas.height);
        if max_radius > longest_side {
            return Err(EvolutionConfigError::InvalidBounds(format!(
                "radius max ({}) exceeds the longest canvas side ({})",
                max_radius, longest_side
            )));
        }

        let fraction = self.mutation.delete_fraction;
        if !(0.0..=1.0).contains(&fraction) {
            return Err(EvolutionConfigError::InvalidDeleteFraction(fraction));
        }

        let (add_min, add_max) = self.mutation.add_ratio_bounds;
        if !add_min.is_finite() || !add_max.is_finite() || add_min < 0.0 || add_min > add_max {
            return Err(EvolutionConfigError::InvalidBounds(format!(
                "add ratio min ({}) must be non-negative and <= max ({})",
                add_min, add_max
            )));
        }

        if self.output.extension.trim().is_empty() {
            return Err(EvolutionConfigError::MissingExtension);
        }

        Ok(())
    }
}
