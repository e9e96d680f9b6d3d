//! Fitness evaluation against a fixed target image.
//!
//! Fitness is the sum over all pixels and channels of the squared
//! difference between a rendered genome and the target. Lower is better;
//! zero means a pixel-perfect match.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbImage;

use crate::compute::Canvas;
use crate::schema::Circle;

use super::population::Individual;

/// Renders genomes and scores them against the target.
#[derive(Debug)]
pub struct FitnessEvaluator {
    target: Arc<RgbImage>,
    canvas: Canvas,
    evaluations: AtomicU64,
}

impl FitnessEvaluator {
    /// Create an evaluator for `target`, rendering onto `background`.
    pub fn new(target: RgbImage, background: [u8; 3]) -> Self {
        let canvas = Canvas::new(target.width(), target.height(), background);
        Self {
            target: Arc::new(target),
            canvas,
            evaluations: AtomicU64::new(0),
        }
    }

    /// The target image.
    #[inline]
    pub fn target(&self) -> &RgbImage {
        &self.target
    }

    /// The canvas used for rendering.
    #[inline]
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Number of scores computed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations.load(Ordering::Relaxed)
    }

    /// Render `circles` and compute their fitness.
    pub fn score(&self, circles: &[Circle]) -> u64 {
        let rendered = self.canvas.render(circles);
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        squared_difference(&rendered, &self.target)
    }

    /// Build a scored individual from `circles`.
    pub fn evaluate(&self, circles: Vec<Circle>) -> Individual {
        let fitness = self.score(&circles);
        Individual::from_scored(circles, fitness)
    }
}

/// Sum of squared per-channel differences between two equally sized images.
///
/// Images of different dimensions are a programming error.
pub fn squared_difference(a: &RgbImage, b: &RgbImage) -> u64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    a.as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = x.abs_diff(y) as u64;
            d * d
        })
        .sum()
}
