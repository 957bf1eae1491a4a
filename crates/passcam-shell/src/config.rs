//! Shell configuration.
//!
//! Loaded from a JSON document with camelCase keys. Every field has a
//! default, so an empty object is a valid configuration:
//!
//! ```json
//! {
//!   "webviewUrl": "https://app.example.com/user/ocr",
//!   "uploadUrl": "https://api.example.com/upload",
//!   "captureMode": "guide-crop",
//!   "layout": { "widthFraction": 0.9, "aspectRatio": 1.42, "safetyMargin": 0.05 },
//!   "resize": { "maxWidth": 1600, "maxHeight": 1600, "quality": 70 },
//!   "maxUploadBytes": 4194304
//! }
//! ```

use std::path::{Path, PathBuf};

use passcam_core::capture::FilterType;
use passcam_core::geometry::{GeometryError, GuideLayout, ScreenGeometry};
use passcam_core::transform::CaptureMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest JPEG accepted by the upload endpoint.
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Downscale and compression applied before upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality (1-100)
    pub quality: u8,
    pub filter: FilterType,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1600,
            max_height: 1600,
            quality: 70,
            filter: FilterType::Bilinear,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShellConfig {
    /// Page loaded into the webview
    pub webview_url: String,
    /// Multipart upload endpoint
    pub upload_url: String,
    pub capture_mode: CaptureMode,
    pub layout: GuideLayout,
    pub resize: ResizeOptions,
    pub max_upload_bytes: u64,
    /// Where exported PDFs are written before sharing
    pub documents_dir: PathBuf,
    /// Scratch space for cropped and resized photos
    pub work_dir: PathBuf,
}

impl Default for ShellConfig {
    fn default() -> Self {
        let base = std::env::temp_dir().join("passcam");
        Self {
            webview_url: "http://localhost:3000/user/ocr".to_string(),
            upload_url: "http://localhost:3000/api/upload".to_string(),
            capture_mode: CaptureMode::default(),
            layout: GuideLayout::default(),
            resize: ResizeOptions::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            documents_dir: base.join("documents"),
            work_dir: base.join("work"),
        }
    }
}

impl ShellConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ShellConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webview_url.trim().is_empty() {
            return Err(ConfigError::Invalid("webviewUrl must not be empty".into()));
        }
        if self.upload_url.trim().is_empty() {
            return Err(ConfigError::Invalid("uploadUrl must not be empty".into()));
        }
        if self.resize.max_width == 0 || self.resize.max_height == 0 {
            return Err(ConfigError::Invalid(
                "resize.maxWidth and resize.maxHeight must be positive".into(),
            ));
        }
        if !(1..=100).contains(&self.resize.quality) {
            return Err(ConfigError::Invalid(format!(
                "resize.quality must be 1-100, got {}",
                self.resize.quality
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("maxUploadBytes must be positive".into()));
        }
        self.layout.validate()?;
        Ok(())
    }

    /// Build the guide geometry for the current screen.
    pub fn screen_geometry(
        &self,
        screen_width: f64,
        screen_height: f64,
    ) -> Result<ScreenGeometry, ConfigError> {
        Ok(ScreenGeometry::new(
            screen_width,
            screen_height,
            &self.layout,
        )?)
    }
}
