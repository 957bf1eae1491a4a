//! In-memory platform fakes shared by the shell's unit tests.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use passcam_core::bridge::UploadResult;
use passcam_core::capture::{CapturedPhoto, SensorOrientation};
use passcam_core::geometry::{GuideLayout, ScreenGeometry};
use passcam_core::transform::CropRectangle;

use crate::config::ResizeOptions;
use crate::error::ShellError;
use crate::platform::{
    Alerter, CaptureDevice, CaptureOptions, ImageService, ResizedImage, ScriptInjector,
    ShareRequest, ShareSink, Uploader,
};

/// 375x812 points, the reference phone screen.
pub fn geometry() -> ScreenGeometry {
    ScreenGeometry::new(375.0, 812.0, &GuideLayout::default()).unwrap()
}

#[derive(Debug, Clone)]
enum DeviceBehavior {
    Photo(CapturedPhoto),
    Slow(CapturedPhoto),
    Denied,
}

/// Camera fake; records the options of every shot.
#[derive(Debug, Clone)]
pub struct FakeDevice {
    behavior: DeviceBehavior,
    shots: Arc<Mutex<Vec<CaptureOptions>>>,
}

impl FakeDevice {
    fn with(behavior: DeviceBehavior) -> Self {
        Self {
            behavior,
            shots: Arc::default(),
        }
    }

    pub fn photo(width: u32, height: u32, orientation: SensorOrientation) -> Self {
        Self::with(DeviceBehavior::Photo(CapturedPhoto::new(
            width,
            height,
            orientation,
            "/camera/photo.jpg",
        )))
    }

    /// Portrait photo stored at `path`.
    pub fn file(path: &Path, width: u32, height: u32) -> Self {
        Self::with(DeviceBehavior::Photo(CapturedPhoto::new(
            width,
            height,
            SensorOrientation::Portrait,
            path,
        )))
    }

    /// Portrait photo delivered after a short delay.
    pub fn slow_photo(width: u32, height: u32) -> Self {
        Self::with(DeviceBehavior::Slow(CapturedPhoto::new(
            width,
            height,
            SensorOrientation::Portrait,
            "/camera/photo.jpg",
        )))
    }

    pub fn failing() -> Self {
        Self::with(DeviceBehavior::Denied)
    }

    pub fn shots(&self) -> Vec<CaptureOptions> {
        self.shots.lock().unwrap().clone()
    }
}

impl CaptureDevice for FakeDevice {
    async fn take_photo(&self, options: CaptureOptions) -> Result<CapturedPhoto, ShellError> {
        self.shots.lock().unwrap().push(options);
        match &self.behavior {
            DeviceBehavior::Photo(photo) => Ok(photo.clone()),
            DeviceBehavior::Slow(photo) => {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(photo.clone())
            }
            DeviceBehavior::Denied => Err(ShellError::PermissionDenied),
        }
    }
}

/// Records crop rectangles and writes a resize output of a fixed size.
#[derive(Debug, Clone)]
pub struct FakeImages {
    dir: PathBuf,
    output_size: usize,
    crops: Arc<Mutex<Vec<CropRectangle>>>,
    resizes: Arc<Mutex<usize>>,
}

impl FakeImages {
    pub fn new(dir: &Path, output_size: usize) -> Self {
        Self {
            dir: dir.to_path_buf(),
            output_size,
            crops: Arc::default(),
            resizes: Arc::default(),
        }
    }

    pub fn crops(&self) -> Vec<CropRectangle> {
        self.crops.lock().unwrap().clone()
    }

    pub fn resizes(&self) -> usize {
        *self.resizes.lock().unwrap()
    }
}

impl ImageService for FakeImages {
    async fn crop(&self, _source: &Path, rect: &CropRectangle) -> Result<PathBuf, ShellError> {
        self.crops.lock().unwrap().push(*rect);
        Ok(self.dir.join("cropped.jpg"))
    }

    async fn resize(
        &self,
        _source: &Path,
        options: &ResizeOptions,
    ) -> Result<ResizedImage, ShellError> {
        *self.resizes.lock().unwrap() += 1;
        let path = self.dir.join("upload.jpg");
        std::fs::write(&path, vec![0xAB; self.output_size])?;
        Ok(ResizedImage {
            path,
            size: self.output_size as u64,
            width: options.max_width,
            height: options.max_height,
        })
    }
}

#[derive(Debug, Clone)]
pub struct FakeUploader {
    response: Result<String, String>,
    uploaded: Arc<Mutex<Vec<usize>>>,
}

impl FakeUploader {
    pub fn ok(upload_id: &str) -> Self {
        Self {
            response: Ok(upload_id.to_string()),
            uploaded: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            uploaded: Arc::default(),
        }
    }

    /// Byte length of every accepted upload.
    pub fn uploaded_sizes(&self) -> Vec<usize> {
        self.uploaded.lock().unwrap().clone()
    }
}

impl Uploader for FakeUploader {
    async fn upload(&self, jpeg: Vec<u8>, _filename: &str) -> Result<UploadResult, ShellError> {
        match &self.response {
            Ok(upload_id) => {
                self.uploaded.lock().unwrap().push(jpeg.len());
                Ok(UploadResult {
                    upload_id: upload_id.clone(),
                    image_url: format!("https://cdn.example.test/{}.jpg", upload_id),
                })
            }
            Err(message) => Err(ShellError::UploadFailed(message.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ShareBehavior {
    Complete,
    Cancel,
    Fail,
}

#[derive(Debug, Clone)]
pub struct FakeShare {
    behavior: ShareBehavior,
    requests: Arc<Mutex<Vec<ShareRequest>>>,
}

impl FakeShare {
    fn with(behavior: ShareBehavior) -> Self {
        Self {
            behavior,
            requests: Arc::default(),
        }
    }

    pub fn completing() -> Self {
        Self::with(ShareBehavior::Complete)
    }

    pub fn cancelling() -> Self {
        Self::with(ShareBehavior::Cancel)
    }

    pub fn failing() -> Self {
        Self::with(ShareBehavior::Fail)
    }

    pub fn requests(&self) -> Vec<ShareRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ShareSink for FakeShare {
    async fn share(&self, request: &ShareRequest) -> Result<(), ShellError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.behavior {
            ShareBehavior::Complete => Ok(()),
            ShareBehavior::Cancel => Err(ShellError::ShareCancelled),
            ShareBehavior::Fail => Err(ShellError::DeviceUnavailable("no share target".into())),
        }
    }
}

/// Captures injected scripts.
#[derive(Debug, Clone, Default)]
pub struct RecordingInjector(Arc<Mutex<Vec<String>>>);

impl RecordingInjector {
    pub fn scripts(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Message types of the delivered envelopes, in order.
    pub fn message_types(&self) -> Vec<String> {
        self.scripts()
            .iter()
            .map(|script| {
                let json = script
                    .trim_start_matches("window.postMessage(")
                    .trim_end_matches(", '*'); true;");
                let value: serde_json::Value = serde_json::from_str(json).unwrap();
                value["type"].as_str().unwrap().to_string()
            })
            .collect()
    }
}

impl ScriptInjector for RecordingInjector {
    fn inject(&self, script: &str) {
        self.0.lock().unwrap().push(script.to_string());
    }
}

/// Captures `(title, message)` pairs.
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerter(Arc<Mutex<Vec<(String, String)>>>);

impl RecordingAlerter {
    pub fn alerts(&self) -> Vec<(String, String)> {
        self.0.lock().unwrap().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.alerts().into_iter().map(|(title, _)| title).collect()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, title: &str, message: &str) {
        self.0
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}
