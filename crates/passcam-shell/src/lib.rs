//! Native host for passcam.
//!
//! Wraps a webview that renders the passport flow and owns everything the
//! page cannot do itself:
//!
//! - Capture: take a photo, crop it to the on-screen guide box, resize and
//!   upload it, then report the result to the page ([`pipeline`])
//! - PDF export: save a page-generated PDF and open the share sheet
//!   ([`export`])
//! - The message bridge and its handshake ([`host`])
//!
//! Platform facilities are abstracted behind the traits in [`platform`].

pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod images;
pub mod pipeline;
pub mod platform;
pub mod upload;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, ResizeOptions, ShellConfig, DEFAULT_MAX_UPLOAD_BYTES};
pub use error::ShellError;
pub use export::{sanitize_filename, PdfExporter};
pub use host::{Host, Platform};
pub use images::LocalImageService;
pub use pipeline::{CapturePipeline, ShutterOutcome};
pub use platform::{
    Alerter, CaptureDevice, CaptureOptions, ImageService, ResizedImage, ScriptInjector,
    ShareRequest, ShareSink, Uploader,
};
pub use upload::{parse_upload_response, HttpUploader};
