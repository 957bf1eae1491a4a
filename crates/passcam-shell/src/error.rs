//! Errors surfaced by the native shell.

use passcam_core::capture::CaptureError;
use passcam_core::encode::EncodeError;
use passcam_core::transform::CropError;
use passcam_core::ProcessError;
use thiserror::Error;

/// Every way a capture, export or upload can fail.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The capture reported unusable dimensions.
    #[error("Invalid photo dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Camera access was refused.
    #[error("Camera permission denied")]
    PermissionDenied,

    /// No usable camera.
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// Crop, resize or encode failed.
    #[error("Image processing failed: {0}")]
    ProcessingFailed(String),

    /// The compressed photo is still over the upload limit.
    #[error("Image is too large after compression ({size} bytes, limit {limit} bytes)")]
    PayloadTooLarge { size: u64, limit: u64 },

    /// Network error, non-2xx status or unusable response body.
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// A page message carried data that could not be used.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// The user dismissed the share sheet.
    #[error("Share cancelled by user")]
    ShareCancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// True for outcomes the user chose; these are logged, never alerted.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ShellError::ShareCancelled)
    }

    /// Title of the blocking alert shown for this error.
    pub fn alert_title(&self) -> &'static str {
        match self {
            ShellError::PermissionDenied | ShellError::DeviceUnavailable(_) => "Camera Error",
            ShellError::UploadFailed(_) => "Upload Error",
            ShellError::PayloadTooLarge { .. } => "Image Too Large",
            _ => "Processing Error",
        }
    }
}

impl From<CropError> for ShellError {
    fn from(err: CropError) -> Self {
        match err {
            CropError::InvalidDimensions { width, height } => {
                ShellError::InvalidDimensions { width, height }
            }
            other => ShellError::ProcessingFailed(other.to_string()),
        }
    }
}

impl From<CaptureError> for ShellError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::InvalidDimensions { width, height } => {
                ShellError::InvalidDimensions { width, height }
            }
            other => ShellError::ProcessingFailed(other.to_string()),
        }
    }
}

impl From<EncodeError> for ShellError {
    fn from(err: EncodeError) -> Self {
        ShellError::ProcessingFailed(err.to_string())
    }
}

impl From<ProcessError> for ShellError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Capture(e) => e.into(),
            ProcessError::Crop(e) => e.into(),
            ProcessError::Encode(e) => e.into(),
        }
    }
}
