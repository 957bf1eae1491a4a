//! WASM bindings for crop planning and in-browser photo cropping.
//!
//! A web camera feature can use these to reproduce the native crop exactly:
//! compute the rectangle from the capture's dimensions, or hand over the
//! captured JPEG and get the cropped JPEG back.

use crate::types::{orientation_from_str, JsCropRectangle, JsScreenGeometry};
use passcam_core::transform::{self, CaptureMode};
use passcam_core::{crop_photo_jpeg, ProcessError};
use wasm_bindgen::prelude::*;

/// Compute the photo pixel rectangle under the guide box.
///
/// # Arguments
///
/// * `geometry` - Screen geometry the preview was shown on
/// * `photo_width` / `photo_height` - Raw capture dimensions
/// * `orientation` - `portrait`, `portrait-upside-down`, `landscape-left`
///   or `landscape-right`
///
/// # Example (TypeScript)
///
/// ```typescript
/// const rect = compute_crop_rect(geometry, 3024, 4032, 'portrait');
/// ctx.drawImage(bitmap, rect.x, rect.y, rect.width, rect.height, 0, 0, rect.width, rect.height);
/// ```
#[wasm_bindgen]
pub fn compute_crop_rect(
    geometry: &JsScreenGeometry,
    photo_width: u32,
    photo_height: u32,
    orientation: &str,
) -> Result<JsCropRectangle, JsValue> {
    plan(geometry, photo_width, photo_height, orientation).map_err(|e| JsValue::from_str(&e))
}

/// Crop a captured JPEG to the guide box (or keep the full frame) and
/// re-encode it.
///
/// Orientation is read from the photo's EXIF data.
#[wasm_bindgen]
pub fn crop_photo(
    bytes: &[u8],
    geometry: &JsScreenGeometry,
    full_frame: bool,
    quality: u8,
) -> Result<Vec<u8>, JsValue> {
    crop_bytes(bytes, geometry, full_frame, quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn plan(
    geometry: &JsScreenGeometry,
    photo_width: u32,
    photo_height: u32,
    orientation: &str,
) -> Result<JsCropRectangle, String> {
    let orientation = orientation_from_str(orientation)?;
    transform::compute_crop_rect(photo_width, photo_height, orientation, geometry.geometry())
        .map(JsCropRectangle::from)
        .map_err(|e| e.to_string())
}

fn crop_bytes(
    bytes: &[u8],
    geometry: &JsScreenGeometry,
    full_frame: bool,
    quality: u8,
) -> Result<Vec<u8>, ProcessError> {
    let mode = if full_frame {
        CaptureMode::FullFrame
    } else {
        CaptureMode::GuideCrop
    };
    crop_photo_jpeg(bytes, mode, geometry.geometry(), quality).map(|(_, jpeg)| jpeg)
}
