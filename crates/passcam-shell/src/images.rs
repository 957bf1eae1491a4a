//! File-based crop and resize on top of `passcam-core`.

use std::path::{Path, PathBuf};

use passcam_core::capture::{decode_photo, resize_to_fit};
use passcam_core::encode::encode_image_jpeg;
use passcam_core::transform::{apply_crop_rect, CropRectangle};
use tracing::debug;
use uuid::Uuid;

use crate::config::{ResizeOptions, ShellConfig};
use crate::error::ShellError;
use crate::platform::{ImageService, ResizedImage};

/// Quality of the intermediate cropped JPEG; the final compression happens
/// in `resize`.
const CROP_QUALITY: u8 = 95;

/// [`ImageService`] that decodes, transforms and re-encodes files locally.
///
/// Work runs on the blocking thread pool; outputs are written to `work_dir`
/// under fresh random names.
#[derive(Debug, Clone)]
pub struct LocalImageService {
    work_dir: PathBuf,
}

impl LocalImageService {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    /// Write outputs to the configured `work_dir`.
    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.work_dir.clone())
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    fn output_path(&self, prefix: &str) -> PathBuf {
        self.work_dir.join(format!("{}-{}.jpg", prefix, Uuid::new_v4()))
    }
}

impl ImageService for LocalImageService {
    async fn crop(&self, source: &Path, rect: &CropRectangle) -> Result<PathBuf, ShellError> {
        let source = source.to_path_buf();
        let rect = *rect;
        let work_dir = self.work_dir.clone();
        let target = self.output_path("crop");

        run_blocking(move || {
            let image = decode_photo(&std::fs::read(&source)?)?;
            let cropped = apply_crop_rect(&image, &rect)?;
            let jpeg = encode_image_jpeg(&cropped, CROP_QUALITY)?;

            std::fs::create_dir_all(&work_dir)?;
            std::fs::write(&target, jpeg)?;
            debug!(path = %target.display(), ?rect, "cropped photo written");
            Ok(target)
        })
        .await
    }

    async fn resize(
        &self,
        source: &Path,
        options: &ResizeOptions,
    ) -> Result<ResizedImage, ShellError> {
        let source = source.to_path_buf();
        let options = options.clone();
        let work_dir = self.work_dir.clone();
        let target = self.output_path("upload");

        run_blocking(move || {
            let image = decode_photo(&std::fs::read(&source)?)?;
            let resized = resize_to_fit(
                &image,
                options.max_width,
                options.max_height,
                options.filter,
            )?;
            let jpeg = encode_image_jpeg(&resized, options.quality)?;

            std::fs::create_dir_all(&work_dir)?;
            std::fs::write(&target, &jpeg)?;
            Ok(ResizedImage {
                path: target,
                size: jpeg.len() as u64,
                width: resized.width,
                height: resized.height,
            })
        })
        .await
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T, ShellError>
where
    F: FnOnce() -> Result<T, ShellError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ShellError::ProcessingFailed(format!("image task failed: {}", e)))?
}
