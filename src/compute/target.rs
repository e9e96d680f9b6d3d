//! Target image loading.

use std::path::Path;

use image::RgbImage;
use image::imageops::FilterType;
use log::{debug, warn};

/// Errors raised while loading a target image.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Failed to decode target image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Target is {actual_width}x{actual_height}, canvas is {width}x{height}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// Decode an image file into an RGB buffer of exactly `width`x`height`.
///
/// With `fit` set, a differently sized image is resized to the canvas;
/// otherwise a size mismatch is an error.
pub fn load_target<P: AsRef<Path>>(
    path: P,
    width: u32,
    height: u32,
    fit: bool,
) -> Result<RgbImage, TargetError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgb8();
    let (actual_width, actual_height) = image.dimensions();
    debug!(
        "Decoded target {} ({}x{})",
        path.display(),
        actual_width,
        actual_height
    );

    if (actual_width, actual_height) == (width, height) {
        return Ok(image);
    }

    if !fit {
        return Err(TargetError::DimensionMismatch {
            width,
            height,
            actual_width,
            actual_height,
        });
    }

    warn!(
        "Resizing target from {}x{} to {}x{}",
        actual_width, actual_height, width, height
    );
    Ok(image::imageops::resize(
        &image,
        width,
        height,
        FilterType::Lanczos3,
    ))
}
