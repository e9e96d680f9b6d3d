//! Raster canvas for rendering circle genomes.
//!
//! Circles are drawn as hard-edged disks in painter's order onto a
//! background-filled RGB image. No anti-aliasing.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use log::trace;

use crate::schema::Circle;

/// Fixed-size canvas that renders circle collections.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    background: [u8; 3],
}

impl Canvas {
    /// Create a new canvas.
    pub fn new(width: u32, height: u32, background: [u8; 3]) -> Self {
        Self {
            width,
            height,
            background,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Render circles in order; later circles cover earlier ones.
    pub fn render(&self, circles: &[Circle]) -> RgbImage {
        let mut image = RgbImage::from_pixel(self.width, self.height, Rgb(self.background));
        for circle in circles {
            match self.disk(circle) {
                Some((center, radius)) => {
                    draw_filled_circle_mut(&mut image, center, radius, Rgb(circle.color))
                }
                None => trace!("skipping circle outside drawable range: {:?}", circle),
            }
        }
        image
    }

    /// Center and radius in signed drawing coordinates.
    ///
    /// A disk centered on the canvas with a radius of `width + height`
    /// already covers every pixel, so larger radii are clamped to that.
    /// Returns `None` when the disk does not fit `i32` coordinates.
    fn disk(&self, circle: &Circle) -> Option<((i32, i32), i32)> {
        let (cx, cy) = circle.center;
        let mut radius = circle.radius;
        if cx < self.width && cy < self.height {
            radius = radius.min(self.width.saturating_add(self.height));
        }
        let reach = |c: u32| i64::from(c) + i64::from(radius) <= i64::from(i32::MAX);
        if !reach(cx) || !reach(cy) {
            return None;
        }
        Some(((cx as i32, cy as i32), radius as i32))
    }
}
