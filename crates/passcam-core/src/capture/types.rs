//! Core types for captured photos.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for reading captured photos.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The bytes are not a recognized image format.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image reports zero width or height.
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// Physical rotation of the sensor relative to the device's natural
/// (portrait) orientation when the photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SensorOrientation {
    #[default]
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
}

impl SensorOrientation {
    pub const ALL: [SensorOrientation; 4] = [
        SensorOrientation::Portrait,
        SensorOrientation::PortraitUpsideDown,
        SensorOrientation::LandscapeLeft,
        SensorOrientation::LandscapeRight,
    ];

    /// Returns true if the raw frame must be rotated a quarter turn to
    /// appear upright, swapping its width and height.
    #[inline]
    pub fn is_landscape(self) -> bool {
        matches!(
            self,
            SensorOrientation::LandscapeLeft | SensorOrientation::LandscapeRight
        )
    }

    /// Dimensions of a raw `width x height` frame once displayed upright.
    #[inline]
    pub fn upright_dimensions(self, width: u32, height: u32) -> (u32, u32) {
        if self.is_landscape() {
            (height, width)
        } else {
            (width, height)
        }
    }

    /// Parse the tag used by capture libraries and the web bridge.
    ///
    /// Accepts both `landscape-left` and `landscapeLeft` spellings.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "portrait" => Some(SensorOrientation::Portrait),
            "portrait-upside-down" | "portraitUpsideDown" => {
                Some(SensorOrientation::PortraitUpsideDown)
            }
            "landscape-left" | "landscapeLeft" => Some(SensorOrientation::LandscapeLeft),
            "landscape-right" | "landscapeRight" => Some(SensorOrientation::LandscapeRight),
            _ => None,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum ExifOrientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl ExifOrientation {
    /// The sensor orientation this tag describes, ignoring mirroring.
    pub fn sensor_orientation(self) -> SensorOrientation {
        match self {
            ExifOrientation::Normal | ExifOrientation::FlipHorizontal => {
                SensorOrientation::Portrait
            }
            ExifOrientation::Rotate180 | ExifOrientation::FlipVertical => {
                SensorOrientation::PortraitUpsideDown
            }
            ExifOrientation::Transpose | ExifOrientation::Rotate90CW => {
                SensorOrientation::LandscapeLeft
            }
            ExifOrientation::Transverse | ExifOrientation::Rotate270CW => {
                SensorOrientation::LandscapeRight
            }
        }
    }
}

impl From<u32> for ExifOrientation {
    fn from(value: u32) -> Self {
        match value {
            1 => ExifOrientation::Normal,
            2 => ExifOrientation::FlipHorizontal,
            3 => ExifOrientation::Rotate180,
            4 => ExifOrientation::FlipVertical,
            5 => ExifOrientation::Transpose,
            6 => ExifOrientation::Rotate90CW,
            7 => ExifOrientation::Transverse,
            8 => ExifOrientation::Rotate270CW,
            _ => ExifOrientation::Normal,
        }
    }
}

/// Header information of a captured photo, read without decoding pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// Stored width in pixels (before orientation correction).
    pub width: u32,
    /// Stored height in pixels (before orientation correction).
    pub height: u32,
    /// EXIF orientation.
    pub exif_orientation: ExifOrientation,
}

impl PhotoMetadata {
    pub fn orientation(&self) -> SensorOrientation {
        self.exif_orientation.sensor_orientation()
    }
}

/// A photo produced by one shutter press.
///
/// Only the dimensions and orientation feed the crop calculator; the pixel
/// data stays at `path` and is owned by the capture subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedPhoto {
    pub width: u32,
    pub height: u32,
    pub orientation: SensorOrientation,
    pub path: PathBuf,
}

impl CapturedPhoto {
    pub fn new(
        width: u32,
        height: u32,
        orientation: SensorOrientation,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            width,
            height,
            orientation,
            path: path.into(),
        }
    }

    /// Dimensions as the photo appears upright.
    pub fn upright_dimensions(&self) -> (u32, u32) {
        self.orientation.upright_dimensions(self.width, self.height)
    }
}

/// A decoded image with RGB pixel data.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    /// Length should be width * height * 3.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for further processing.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
