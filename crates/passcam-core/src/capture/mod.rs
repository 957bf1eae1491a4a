//! Captured photo handling.
//!
//! This module provides functionality for:
//! - Describing a photo produced by the capture device ([`CapturedPhoto`])
//! - Reading stored dimensions and EXIF orientation without a full decode
//! - Decoding photos upright (EXIF orientation applied)
//! - Downscaling photos before upload
//!
//! # Orientation
//!
//! Capture devices report dimensions of the raw sensor frame. A photo taken
//! with the sensor rotated a quarter turn is stored landscape and displayed
//! portrait, so its width and height swap once oriented. Crop rectangles are
//! always expressed in the upright space.

mod jpeg;
mod resize;
mod types;

pub use jpeg::{decode_photo, read_photo_metadata};
pub use resize::{resize, resize_to_fit};
pub use types::{
    CaptureError, CapturedPhoto, DecodedImage, ExifOrientation, FilterType, PhotoMetadata,
    SensorOrientation,
};
