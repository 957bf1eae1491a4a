//! JPEG encoding of processed photos.
//!
//! Uploads and local hand-offs are always JPEG; quality is configurable
//! (the capture flow uses 70 after downscaling).

mod jpeg;

pub use jpeg::{encode_image_jpeg, encode_jpeg, EncodeError};
