//! Photo decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{CaptureError, DecodedImage, ExifOrientation, PhotoMetadata};

/// Decode a captured photo, applying EXIF orientation correction.
///
/// The returned pixels are upright, which is the space crop rectangles are
/// expressed in.
///
/// # Errors
///
/// Returns `CaptureError::CorruptedFile` if the bytes cannot be decoded.
pub fn decode_photo(bytes: &[u8]) -> Result<DecodedImage, CaptureError> {
    let orientation = extract_orientation(bytes);
    let img = decode_dynamic(bytes)?;
    let rgb_img = apply_orientation(img, orientation).into_rgb8();
    Ok(DecodedImage::from_rgb_image(rgb_img))
}

/// Read stored dimensions and EXIF orientation without decoding pixels.
///
/// # Errors
///
/// Returns `CaptureError::CorruptedFile` if the header cannot be parsed and
/// `CaptureError::InvalidDimensions` if it reports a zero-sized image.
pub fn read_photo_metadata(bytes: &[u8]) -> Result<PhotoMetadata, CaptureError> {
    let (width, height) = open_reader(bytes)?
        .into_dimensions()
        .map_err(|e| CaptureError::CorruptedFile(e.to_string()))?;

    if width == 0 || height == 0 {
        return Err(CaptureError::InvalidDimensions { width, height });
    }

    Ok(PhotoMetadata {
        width,
        height,
        exif_orientation: extract_orientation(bytes),
    })
}

/// Sniff the container format from the leading bytes.
fn open_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, CaptureError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CaptureError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(CaptureError::InvalidFormat);
    }
    Ok(reader)
}

fn decode_dynamic(bytes: &[u8]) -> Result<DynamicImage, CaptureError> {
    open_reader(bytes)?
        .decode()
        .map_err(|e| CaptureError::CorruptedFile(e.to_string()))
}

/// Returns `ExifOrientation::Normal` if no EXIF data is found or the
/// orientation cannot be determined.
fn extract_orientation(bytes: &[u8]) -> ExifOrientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(ExifOrientation::from)
            .unwrap_or_default(),
        Err(_) => ExifOrientation::Normal,
    }
}

fn apply_orientation(img: DynamicImage, orientation: ExifOrientation) -> DynamicImage {
    match orientation {
        ExifOrientation::Normal => img,
        ExifOrientation::FlipHorizontal => img.fliph(),
        ExifOrientation::Rotate180 => img.rotate180(),
        ExifOrientation::FlipVertical => img.flipv(),
        ExifOrientation::Transpose => img.rotate90().fliph(),
        ExifOrientation::Rotate90CW => img.rotate90(),
        ExifOrientation::Transverse => img.rotate270().fliph(),
        ExifOrientation::Rotate270CW => img.rotate270(),
    }
}
