//! Crop planning and pixel cropping for captured photos.
//!
//! # Pipeline Position
//!
//! After capture, a photo goes through:
//! 1. Crop planning ([`CaptureMode::plan`], [`compute_crop_rect`])
//! 2. Pixel crop on the upright image ([`apply_crop_rect`])
//! 3. Resize and JPEG encode for upload
//!
//! # Coordinate System
//!
//! - Crop rectangles are integer pixels in the upright photo
//! - Origin is the top-left corner

mod crop;

pub use crop::{
    apply_crop_rect, compute_crop_rect, CaptureMode, CoverTransform, CropError, CropRectangle,
    PixelOffset, PixelSize,
};
