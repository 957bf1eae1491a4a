//! The capture → crop → resize → upload flow run on each shutter press.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use passcam_core::bridge::UploadResult;
use passcam_core::geometry::ScreenGeometry;
use passcam_core::transform::CaptureMode;
use tracing::{debug, info, warn};

use crate::config::{ResizeOptions, ShellConfig};
use crate::error::ShellError;
use crate::platform::{CaptureDevice, CaptureOptions, ImageService, Uploader};

/// What a shutter press led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutterOutcome {
    Uploaded(UploadResult),
    /// Another capture was still in flight.
    Ignored,
}

/// Clears the processing flag when the run ends, however it ends.
struct ProcessingGate<'a>(&'a AtomicBool);

impl<'a> ProcessingGate<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ProcessingGate<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// An intermediate image that is deleted when dropped.
struct ScratchFile(PathBuf);

impl ScratchFile {
    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.0) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.0.display(), error = %e, "failed to remove scratch file"),
        }
    }
}

/// Runs one capture at a time.
pub struct CapturePipeline<D, I, U> {
    device: D,
    images: I,
    uploader: U,
    geometry: ScreenGeometry,
    mode: CaptureMode,
    resize: ResizeOptions,
    max_upload_bytes: u64,
    processing: AtomicBool,
}

impl<D, I, U> CapturePipeline<D, I, U>
where
    D: CaptureDevice,
    I: ImageService,
    U: Uploader,
{
    pub fn new(
        device: D,
        images: I,
        uploader: U,
        geometry: ScreenGeometry,
        config: &ShellConfig,
    ) -> Self {
        Self {
            device,
            images,
            uploader,
            geometry,
            mode: config.capture_mode,
            resize: config.resize.clone(),
            max_upload_bytes: config.max_upload_bytes,
            processing: AtomicBool::new(false),
        }
    }

    pub fn geometry(&self) -> &ScreenGeometry {
        &self.geometry
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Handle a shutter press.
    ///
    /// A press while a capture is running does nothing and returns
    /// `ShutterOutcome::Ignored`. Errors are returned once and never retried.
    /// The cropped and resized intermediates are removed whether or not the
    /// run succeeds; the captured photo itself is left to the device.
    pub async fn on_shutter(&self, options: CaptureOptions) -> Result<ShutterOutcome, ShellError> {
        let Some(_gate) = ProcessingGate::acquire(&self.processing) else {
            debug!("shutter pressed while processing, ignoring");
            return Ok(ShutterOutcome::Ignored);
        };

        self.run(options).await.map(ShutterOutcome::Uploaded)
    }

    async fn run(&self, options: CaptureOptions) -> Result<UploadResult, ShellError> {
        info!(mode = ?self.mode, flash = options.flash, "starting capture");

        let photo = self.device.take_photo(options).await?;
        debug!(
            path = %photo.path.display(),
            width = photo.width,
            height = photo.height,
            orientation = ?photo.orientation,
            "photo taken"
        );

        let rect = self
            .mode
            .plan(photo.width, photo.height, photo.orientation, &self.geometry)?;

        let cropped = match self.mode {
            CaptureMode::GuideCrop => {
                let cropped = self.images.crop(&photo.path, &rect).await?;
                debug!(?rect, path = %cropped.display(), "photo cropped to guide box");
                Some(ScratchFile(cropped))
            }
            CaptureMode::FullFrame => None,
        };
        let source = cropped
            .as_ref()
            .map_or(photo.path.as_path(), ScratchFile::path);

        let resized = self.images.resize(source, &self.resize).await?;
        drop(cropped);
        let upload_file = ScratchFile(resized.path.clone());
        info!(
            width = resized.width,
            height = resized.height,
            bytes = resized.size,
            "image resized"
        );

        if resized.size > self.max_upload_bytes {
            return Err(ShellError::PayloadTooLarge {
                size: resized.size,
                limit: self.max_upload_bytes,
            });
        }

        let jpeg = tokio::fs::read(upload_file.path()).await?;
        let filename = resized
            .path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("capture.jpg")
            .to_string();
        drop(upload_file);

        let result = self.uploader.upload(jpeg, &filename).await?;
        info!(upload_id = %result.upload_id, "upload complete");
        Ok(result)
    }
}
