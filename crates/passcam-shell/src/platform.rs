//! Platform collaborators.
//!
//! Camera access, the webview, share sheets and alerts belong to the host
//! platform. The shell drives them through these traits so the capture and
//! export flows can run against real bindings or in-memory fakes.

use std::future::Future;
use std::path::{Path, PathBuf};

use passcam_core::bridge::UploadResult;
use passcam_core::capture::CapturedPhoto;
use passcam_core::transform::CropRectangle;

use crate::config::ResizeOptions;
use crate::error::ShellError;

/// Settings for a single shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaptureOptions {
    /// Fire the flash
    pub flash: bool,
}

/// The device camera.
pub trait CaptureDevice: Send + Sync {
    /// Take one photo.
    ///
    /// Fails with `ShellError::PermissionDenied` or
    /// `ShellError::DeviceUnavailable`.
    fn take_photo(
        &self,
        options: CaptureOptions,
    ) -> impl Future<Output = Result<CapturedPhoto, ShellError>> + Send;
}

/// A JPEG written by [`ImageService::resize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizedImage {
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    pub width: u32,
    pub height: u32,
}

/// File-based crop and resize.
pub trait ImageService: Send + Sync {
    /// Cut `rect` out of the upright photo at `source`, returning the new file.
    fn crop(
        &self,
        source: &Path,
        rect: &CropRectangle,
    ) -> impl Future<Output = Result<PathBuf, ShellError>> + Send;

    /// Downscale and JPEG-compress the image at `source`.
    fn resize(
        &self,
        source: &Path,
        options: &ResizeOptions,
    ) -> impl Future<Output = Result<ResizedImage, ShellError>> + Send;
}

/// The image upload endpoint.
pub trait Uploader: Send + Sync {
    fn upload(
        &self,
        jpeg: Vec<u8>,
        filename: &str,
    ) -> impl Future<Output = Result<UploadResult, ShellError>> + Send;
}

/// What to hand to the platform share sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareRequest {
    pub path: PathBuf,
    pub mime_type: String,
    pub title: String,
    pub subject: String,
    pub filename: String,
    /// Offer "Save to Files" where the platform supports it
    pub save_to_files: bool,
}

/// Share/export affordance.
pub trait ShareSink: Send + Sync {
    /// Resolves once the sheet is dismissed; `ShellError::ShareCancelled`
    /// when the user backs out.
    fn share(&self, request: &ShareRequest) -> impl Future<Output = Result<(), ShellError>> + Send;
}

/// Evaluates script in the hosted page. Fire and forget.
pub trait ScriptInjector: Send + Sync {
    fn inject(&self, script: &str);
}

/// Blocking user-facing alert.
pub trait Alerter: Send + Sync {
    fn alert(&self, title: &str, message: &str);
}
