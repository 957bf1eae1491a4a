//! Downscaling of captured photos before upload.
//!
//! All functions return new `DecodedImage` instances without modifying the input.

use super::{CaptureError, DecodedImage, FilterType};

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `CaptureError::InvalidDimensions` for a zero target size and
/// `CaptureError::CorruptedFile` if the pixel buffer does not match the
/// image dimensions.
pub fn resize(
    image: &DecodedImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<DecodedImage, CaptureError> {
    if width == 0 || height == 0 {
        return Err(CaptureError::InvalidDimensions { width, height });
    }

    // Fast path: if dimensions match, just clone
    if image.width == width && image.height == height {
        return Ok(image.clone());
    }

    let rgb_image = image
        .to_rgb_image()
        .ok_or_else(|| CaptureError::CorruptedFile("Failed to create RgbImage".to_string()))?;

    let resized = image::imageops::resize(&rgb_image, width, height, filter.to_image_filter());

    Ok(DecodedImage::from_rgb_image(resized))
}

/// Shrink an image to fit inside `max_width x max_height`, preserving aspect
/// ratio.
///
/// Images already inside the box are returned unchanged; this never
/// upscales.
///
/// # Errors
///
/// Returns `CaptureError::InvalidDimensions` if either bound is zero.
pub fn resize_to_fit(
    image: &DecodedImage,
    max_width: u32,
    max_height: u32,
    filter: FilterType,
) -> Result<DecodedImage, CaptureError> {
    if max_width == 0 || max_height == 0 {
        return Err(CaptureError::InvalidDimensions {
            width: max_width,
            height: max_height,
        });
    }

    if image.width <= max_width && image.height <= max_height {
        return Ok(image.clone());
    }

    let (new_width, new_height) =
        calculate_fit_dimensions(image.width, image.height, max_width, max_height);

    resize(image, new_width, new_height, filter)
}

/// Calculate dimensions that fit within the bounds while preserving aspect ratio.
fn calculate_fit_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = (width as f64 * scale).round() as u32;
    let new_height = (height as f64 * scale).round() as u32;

    (
        new_width.clamp(1, max_width),
        new_height.clamp(1, max_height),
    )
}


// ============================================================================
// Property-Based Tests
// ============================================================================
