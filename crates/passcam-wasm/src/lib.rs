//! Passcam WASM - WebAssembly bindings for passcam
//!
//! This crate lets a browser camera feature use the same guide-box crop as
//! the native shell, so photos taken on the web and in the app are cut
//! identically.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible geometry and rectangle wrappers
//! - `crop` - Crop planning and in-browser JPEG cropping
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsScreenGeometry, compute_crop_rect, crop_photo } from '@passcam/wasm';
//!
//! await init();
//!
//! const geometry = new JsScreenGeometry(window.innerWidth, window.innerHeight);
//! const bytes = new Uint8Array(await blob.arrayBuffer());
//! const jpeg = crop_photo(bytes, geometry, false, 70);
//! ```

use wasm_bindgen::prelude::*;

mod crop;
mod types;

pub use crop::{compute_crop_rect, crop_photo};
pub use types::{JsCropRectangle, JsScreenGeometry};

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
