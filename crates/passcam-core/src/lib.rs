//! Passcam Core - guide-box capture library
//!
//! This crate provides the pure logic behind passcam's document camera:
//! mapping the on-screen guide box onto a captured photo, decoding and
//! cropping that photo, and the message protocol spoken with the hosted
//! web page.
//!
//! # Module Structure
//!
//! - `geometry` - Screen and guide box geometry
//! - `capture` - Captured photo metadata, decoding and resizing
//! - `transform` - Crop rectangle calculation and pixel cropping
//! - `encode` - JPEG encoding
//! - `bridge` - Page message envelopes and the ready/ack handshake

pub mod bridge;
pub mod capture;
pub mod encode;
pub mod geometry;
pub mod transform;

pub use bridge::{BridgeChannel, InboundMessage, OutboundMessage, UploadResult};
pub use capture::{CapturedPhoto, DecodedImage, SensorOrientation};
pub use geometry::{GuideLayout, ScreenGeometry, ScreenRect};
pub use transform::{apply_crop_rect, compute_crop_rect, CaptureMode, CropError, CropRectangle};

/// Decode a photo, cut out the planned region and re-encode it as JPEG.
///
/// This is the whole in-memory crop step: orientation is taken from the
/// photo's EXIF data and the crop is planned with `mode` on `geometry`.
///
/// # Errors
///
/// Returns the first error from decoding, planning, cropping or encoding.
pub fn crop_photo_jpeg(
    bytes: &[u8],
    mode: CaptureMode,
    geometry: &ScreenGeometry,
    quality: u8,
) -> Result<(CropRectangle, Vec<u8>), ProcessError> {
    let metadata = capture::read_photo_metadata(bytes)?;
    let rect = mode.plan(
        metadata.width,
        metadata.height,
        metadata.orientation(),
        geometry,
    )?;
    let image = capture::decode_photo(bytes)?;
    let cropped = apply_crop_rect(&image, &rect)?;
    let jpeg = encode::encode_image_jpeg(&cropped, quality)?;
    Ok((rect, jpeg))
}

/// Any failure of the in-memory processing steps.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Capture(#[from] capture::CaptureError),
    #[error(transparent)]
    Crop(#[from] CropError),
    #[error(transparent)]
    Encode(#[from] encode::EncodeError),
}
