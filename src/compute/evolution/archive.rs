//! Generation archive for writing best individuals to disk.

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use log::info;

use crate::compute::Canvas;
use crate::schema::{GenomeExport, GenomeMetadata, OutputConfig};

use super::population::Individual;

/// Errors raised while writing snapshots.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to export genome: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes the best individual of each generation, and the final result,
/// into an output directory.
#[derive(Debug, Clone)]
pub struct GenerationArchive {
    output_dir: PathBuf,
    extension: String,
    export_genomes: bool,
    saved: Vec<PathBuf>,
}

impl GenerationArchive {
    /// Create the archive, creating its output directory if needed.
    pub fn new(config: &OutputConfig) -> io::Result<Self> {
        fs::create_dir_all(&config.directory)?;
        Ok(Self {
            output_dir: config.directory.clone(),
            extension: config.extension.trim_start_matches('.').to_string(),
            export_genomes: config.export_genomes,
            saved: Vec::new(),
        })
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Every file written so far, in order.
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Save the best individual of generation `index` as `best_iter{index}`.
    pub fn save_generation(
        &mut self,
        index: usize,
        best: &Individual,
        canvas: &Canvas,
    ) -> Result<PathBuf, ArchiveError> {
        self.save(&format!("best_iter{}", index), Some(index), best, canvas)
    }

    /// Save the final result as `final`.
    pub fn save_final(
        &mut self,
        best: &Individual,
        canvas: &Canvas,
    ) -> Result<PathBuf, ArchiveError> {
        let path = self.save("final", None, best, canvas)?;
        info!("Saved final result to {}", path.display());
        Ok(path)
    }

    fn save(
        &mut self,
        stem: &str,
        generation: Option<usize>,
        best: &Individual,
        canvas: &Canvas,
    ) -> Result<PathBuf, ArchiveError> {
        let path = self.output_dir.join(format!("{}.{}", stem, self.extension));
        canvas.render(best.circles()).save(&path)?;
        self.saved.push(path.clone());

        if self.export_genomes {
            let export = GenomeExport {
                metadata: GenomeMetadata {
                    generation,
                    fitness: best.fitness(),
                    circle_count: best.len(),
                    width: canvas.width(),
                    height: canvas.height(),
                },
                circles: best.circles().to_vec(),
            };
            let json_path = self.output_dir.join(format!("{}.json", stem));
            let writer = BufWriter::new(File::create(&json_path)?);
            serde_json::to_writer_pretty(writer, &export)?;
            self.saved.push(json_path);
        }

        Ok(path)
    }
}
