//! Guide box to photo pixel crop mapping.
//!
//! The camera preview is rendered with "cover" scaling: the upright photo is
//! scaled uniformly until it fills the screen and the overflow on one axis is
//! cut off equally on both sides. The user aligns the document with the
//! on-screen guide box, so the pixels to keep are the guide box pushed back
//! through that cover transform.
//!
//! # Coordinate System
//!
//! - Screen rectangles are in screen points, origin top-left
//! - Crop rectangles are in upright photo pixels, origin top-left
//! - Landscape sensor orientations swap the raw width and height first

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capture::{DecodedImage, SensorOrientation};
use crate::geometry::{ScreenGeometry, ScreenRect};

/// Errors produced by crop planning and pixel cropping.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CropError {
    /// Photo dimensions must be positive.
    #[error("Invalid photo dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The rectangle does not fit inside the image.
    #[error("Crop rectangle {rect:?} exceeds {width}x{height} image")]
    OutOfBounds {
        rect: CropRectangle,
        width: u32,
        height: u32,
    },

    /// The rectangle has zero width or height.
    #[error("Crop rectangle is empty")]
    EmptyRegion,
}

/// Top-left corner of a crop rectangle in photo pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelOffset {
    pub x: u32,
    pub y: u32,
}

/// Size of a crop rectangle in photo pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// Pixel rectangle to extract from an upright photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRectangle {
    pub offset: PixelOffset,
    pub size: PixelSize,
}

impl CropRectangle {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            offset: PixelOffset { x, y },
            size: PixelSize { width, height },
        }
    }

    /// The whole `width x height` frame.
    pub fn full_frame(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.offset.x as u64 + self.size.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.offset.y as u64 + self.size.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.size.width == 0 || self.size.height == 0
    }

    /// Check whether the rectangle lies within a `width x height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }
}

/// How a capture is turned into the image that gets uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// Keep only the region under the guide box (plus safety margin).
    #[default]
    GuideCrop,
    /// Keep the whole frame; only resizing is applied.
    FullFrame,
}

impl CaptureMode {
    /// Plan the crop for a photo under this mode.
    ///
    /// # Errors
    ///
    /// Returns `CropError::InvalidDimensions` if either dimension is zero.
    pub fn plan(
        self,
        photo_width: u32,
        photo_height: u32,
        orientation: SensorOrientation,
        geometry: &ScreenGeometry,
    ) -> Result<CropRectangle, CropError> {
        match self {
            CaptureMode::GuideCrop => {
                compute_crop_rect(photo_width, photo_height, orientation, geometry)
            }
            CaptureMode::FullFrame => {
                let (width, height) = upright_dimensions(photo_width, photo_height, orientation)?;
                Ok(CropRectangle::full_frame(width, height))
            }
        }
    }
}

/// Uniform scale and overflow of a cover-scaled preview.
///
/// `offset_x`/`offset_y` are the screen points of scaled photo cut off on the
/// left/top edge; `scale` converts screen points to photo pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CoverTransform {
    /// Cover-fit an upright `photo_width x photo_height` photo to the screen.
    pub fn fit(photo_width: f64, photo_height: f64, geometry: &ScreenGeometry) -> Self {
        let photo_aspect = photo_height / photo_width;

        if photo_aspect > geometry.preview_aspect_ratio() {
            // Photo is relatively taller: width fills, top/bottom overflow
            let scale = photo_width / geometry.screen_width();
            Self {
                scale,
                offset_x: 0.0,
                offset_y: (photo_height / scale - geometry.screen_height()) / 2.0,
            }
        } else {
            // Photo is relatively wider: height fills, left/right overflow
            let scale = photo_height / geometry.screen_height();
            Self {
                scale,
                offset_x: (photo_width / scale - geometry.screen_width()) / 2.0,
                offset_y: 0.0,
            }
        }
    }

    /// Map a screen rectangle to rounded photo pixel coordinates.
    ///
    /// Returns `(x, y, width, height)`; values may be negative or exceed the
    /// photo and still need clamping.
    pub fn map_rect(&self, rect: &ScreenRect) -> (i64, i64, i64, i64) {
        (
            ((rect.x + self.offset_x) * self.scale).round() as i64,
            ((rect.y + self.offset_y) * self.scale).round() as i64,
            (rect.width * self.scale).round() as i64,
            (rect.height * self.scale).round() as i64,
        )
    }
}

/// Compute the photo pixel rectangle under the (margin-expanded) guide box.
///
/// `photo_width`/`photo_height` are the raw capture dimensions; landscape
/// orientations are swapped to their upright size before mapping.
///
/// The result always lies inside the upright photo, whatever the aspect
/// mismatch between photo and screen.
///
/// # Errors
///
/// Returns `CropError::InvalidDimensions` if either dimension is zero.
///
/// # Example
///
/// ```
/// use passcam_core::geometry::{GuideLayout, ScreenGeometry};
/// use passcam_core::capture::SensorOrientation;
/// use passcam_core::transform::compute_crop_rect;
///
/// let geometry = ScreenGeometry::new(375.0, 812.0, &GuideLayout::default()).unwrap();
/// let rect = compute_crop_rect(3024, 4032, SensorOrientation::Portrait, &geometry).unwrap();
/// assert!(rect.fits_within(3024, 4032));
/// ```
pub fn compute_crop_rect(
    photo_width: u32,
    photo_height: u32,
    orientation: SensorOrientation,
    geometry: &ScreenGeometry,
) -> Result<CropRectangle, CropError> {
    let (width, height) = upright_dimensions(photo_width, photo_height, orientation)?;

    let cover = CoverTransform::fit(width as f64, height as f64, geometry);
    let (crop_x, crop_y, crop_width, crop_height) = cover.map_rect(&geometry.expanded_guide());

    let (x, final_width) = clamp_span(crop_x, crop_width, width as i64);
    let (y, final_height) = clamp_span(crop_y, crop_height, height as i64);

    Ok(CropRectangle::new(x, y, final_width, final_height))
}

fn upright_dimensions(
    photo_width: u32,
    photo_height: u32,
    orientation: SensorOrientation,
) -> Result<(u32, u32), CropError> {
    if photo_width == 0 || photo_height == 0 {
        return Err(CropError::InvalidDimensions {
            width: photo_width,
            height: photo_height,
        });
    }
    Ok(orientation.upright_dimensions(photo_width, photo_height))
}

/// Clamp a `[start, start + len)` span into `[0, bound)`.
///
/// The start is pulled back so an in-range length keeps its size; a span
/// longer than the bound shrinks to it.
fn clamp_span(start: i64, len: i64, bound: i64) -> (u32, u32) {
    let len = len.max(0);
    let start = start.clamp(0, (bound - len).max(0));
    let len = len.min(bound - start);
    (start as u32, len as u32)
}

/// Copy the pixels of `rect` out of an upright image.
///
/// # Errors
///
/// Returns `CropError::EmptyRegion` for a zero-sized rectangle and
/// `CropError::OutOfBounds` if it does not fit inside the image.
pub fn apply_crop_rect(
    image: &DecodedImage,
    rect: &CropRectangle,
) -> Result<DecodedImage, CropError> {
    if rect.is_empty() {
        return Err(CropError::EmptyRegion);
    }
    if !rect.fits_within(image.width, image.height) {
        return Err(CropError::OutOfBounds {
            rect: *rect,
            width: image.width,
            height: image.height,
        });
    }

    // Fast path: full frame returns a clone
    if rect.size.width == image.width && rect.size.height == image.height {
        return Ok(image.clone());
    }

    let src_stride = image.width as usize * 3;
    let row_len = rect.size.width as usize * 3;
    let left = rect.offset.x as usize * 3;
    let mut output = Vec::with_capacity(row_len * rect.size.height as usize);

    // Copy pixel data row by row
    for row in 0..rect.size.height as usize {
        let start = (rect.offset.y as usize + row) * src_stride + left;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    Ok(DecodedImage::new(rect.size.width, rect.size.height, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GuideLayout;

    fn iphone_x() -> ScreenGeometry {
        ScreenGeometry::new(375.0, 812.0, &GuideLayout::default()).unwrap()
    }

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.push(v); // R
                pixels.push(v); // G
                pixels.push(v); // B
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_passport_on_12mp_portrait() {
        let rect = compute_crop_rect(3024, 4032, SensorOrientation::Portrait, &iphone_x()).unwrap();

        assert!(rect.fits_within(3024, 4032));
        assert_eq!(rect, CropRectangle::new(590, 1367, 1843, 1298));

        let ratio = rect.size.width as f64 / rect.size.height as f64;
        assert!((ratio - 1.42).abs() < 0.01, "ratio was {}", ratio);
    }

    #[test]
    fn test_crop_is_horizontally_centered() {
        let rect = compute_crop_rect(3024, 4032, SensorOrientation::Portrait, &iphone_x()).unwrap();

        let left = rect.offset.x as i64;
        let right = 3024 - rect.right() as i64;
        assert!((left - right).abs() <= 1);
    }

    #[test]
    fn test_tiny_photo_is_clamped() {
        let rect = compute_crop_rect(100, 100, SensorOrientation::Portrait, &iphone_x()).unwrap();

        assert!(rect.size.width <= 100);
        assert!(rect.size.height <= 100);
        assert!(rect.fits_within(100, 100));
    }

    #[test]
    fn test_oversized_guide_clamps_to_full_photo() {
        // A huge margin overshoots every edge
        let geometry = iphone_x().with_safety_margin(5.0).unwrap();
        let rect = compute_crop_rect(3024, 4032, SensorOrientation::Portrait, &geometry).unwrap();

        assert_eq!(rect.offset.x, 0);
        assert_eq!(rect.size.width, 3024);
        assert!(rect.fits_within(3024, 4032));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let geometry = iphone_x();
        assert_eq!(
            compute_crop_rect(0, 4032, SensorOrientation::Portrait, &geometry),
            Err(CropError::InvalidDimensions {
                width: 0,
                height: 4032
            })
        );
        assert!(compute_crop_rect(3024, 0, SensorOrientation::LandscapeLeft, &geometry).is_err());
    }

    #[test]
    fn test_matching_aspect_has_no_overflow() {
        let geometry = iphone_x();
        let cover = CoverTransform::fit(750.0, 1624.0, &geometry);

        assert_eq!(cover.offset_x, 0.0);
        assert_eq!(cover.offset_y, 0.0);
        assert_eq!(cover.scale, 2.0);
    }

    #[test]
    fn test_tall_photo_overflows_vertically() {
        let geometry = ScreenGeometry::new(400.0, 400.0, &GuideLayout::default()).unwrap();
        let cover = CoverTransform::fit(1000.0, 2000.0, &geometry);

        assert_eq!(cover.scale, 2.5);
        assert_eq!(cover.offset_x, 0.0);
        assert_eq!(cover.offset_y, 200.0);
    }

    #[test]
    fn test_wide_photo_overflows_horizontally() {
        let geometry = iphone_x();
        let cover = CoverTransform::fit(3024.0, 4032.0, &geometry);

        assert!(cover.offset_y == 0.0);
        assert!(cover.offset_x > 0.0);
        assert!((cover.scale - 4032.0 / 812.0).abs() < 1e-12);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let geometry = iphone_x();

        let portrait = compute_crop_rect(3024, 4032, SensorOrientation::Portrait, &geometry).unwrap();
        let left = compute_crop_rect(4032, 3024, SensorOrientation::LandscapeLeft, &geometry).unwrap();
        let right = compute_crop_rect(4032, 3024, SensorOrientation::LandscapeRight, &geometry).unwrap();
        let unrotated = compute_crop_rect(4032, 3024, SensorOrientation::Portrait, &geometry).unwrap();

        assert_eq!(left, portrait);
        assert_eq!(right, portrait);
        assert_ne!(unrotated, portrait);
        assert!(unrotated.fits_within(4032, 3024));
    }

    #[test]
    fn test_safety_margin_grows_rectangle() {
        let geometry = iphone_x();
        let sizes: Vec<PixelSize> = [0.0, 0.05, 0.1]
            .iter()
            .map(|&margin| {
                compute_crop_rect(
                    3024,
                    4032,
                    SensorOrientation::Portrait,
                    &geometry.with_safety_margin(margin).unwrap(),
                )
                .unwrap()
                .size
            })
            .collect();

        assert!(sizes[0].width < sizes[1].width && sizes[1].width < sizes[2].width);
        assert!(sizes[0].height < sizes[1].height && sizes[1].height < sizes[2].height);
    }

    #[test]
    fn test_full_frame_mode() {
        let geometry = iphone_x();
        let rect = CaptureMode::FullFrame
            .plan(4032, 3024, SensorOrientation::LandscapeRight, &geometry)
            .unwrap();

        assert_eq!(rect, CropRectangle::full_frame(3024, 4032));
        assert!(CaptureMode::FullFrame
            .plan(0, 10, SensorOrientation::Portrait, &geometry)
            .is_err());
    }

    #[test]
    fn test_guide_crop_mode_matches_calculator() {
        let geometry = iphone_x();
        let planned = CaptureMode::GuideCrop
            .plan(3024, 4032, SensorOrientation::Portrait, &geometry)
            .unwrap();
        let direct = compute_crop_rect(3024, 4032, SensorOrientation::Portrait, &geometry).unwrap();
        assert_eq!(planned, direct);
    }

    #[test]
    fn test_capture_mode_serde() {
        let mode: CaptureMode = serde_json::from_str("\"full-frame\"").unwrap();
        assert_eq!(mode, CaptureMode::FullFrame);
        assert_eq!(
            serde_json::to_string(&CaptureMode::GuideCrop).unwrap(),
            "\"guide-crop\""
        );
    }

    #[test]
    fn test_crop_rectangle_json_shape() {
        let json = serde_json::to_value(CropRectangle::new(1, 2, 3, 4)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"offset": {"x": 1, "y": 2}, "size": {"width": 3, "height": 4}})
        );
    }

    #[test]
    fn test_clamp_span() {
        assert_eq!(clamp_span(10, 20, 100), (10, 20));
        assert_eq!(clamp_span(-5, 20, 100), (0, 20));
        assert_eq!(clamp_span(90, 20, 100), (80, 20));
        assert_eq!(clamp_span(-50, 300, 100), (0, 100));
        assert_eq!(clamp_span(5, -3, 100), (5, 0));
    }

    #[test]
    fn test_apply_crop_rect_pixels() {
        let img = test_image(10, 10);
        let result = apply_crop_rect(&img, &CropRectangle::new(3, 3, 4, 4)).unwrap();

        assert_eq!(result.width, 4);
        assert_eq!(result.height, 4);
        // First pixel should be from (3, 3): (3 * 10 + 3) % 256 = 33
        assert_eq!(&result.pixels[0..3], &[33, 33, 33]);
        // Last pixel should be from (6, 6): 66
        assert_eq!(result.pixels[result.pixels.len() - 1], 66);
    }

    #[test]
    fn test_apply_crop_rect_full_frame() {
        let img = test_image(20, 10);
        let result = apply_crop_rect(&img, &CropRectangle::full_frame(20, 10)).unwrap();
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_apply_crop_rect_out_of_bounds() {
        let img = test_image(10, 10);
        let result = apply_crop_rect(&img, &CropRectangle::new(8, 0, 4, 4));
        assert!(matches!(result, Err(CropError::OutOfBounds { .. })));
    }

    #[test]
    fn test_apply_crop_rect_empty() {
        let img = test_image(10, 10);
        let result = apply_crop_rect(&img, &CropRectangle::new(2, 2, 0, 4));
        assert_eq!(result.unwrap_err(), CropError::EmptyRegion);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
