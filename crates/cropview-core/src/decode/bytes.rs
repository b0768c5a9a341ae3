//! Byte-level image decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use image::ImageReader;

use super::{DecodeError, DecodedImage, Orientation};

/// Decode an image from raw bytes, applying EXIF orientation correction.
///
/// The format is guessed from the byte content (JPEG and PNG are enabled),
/// so the host does not need to know what it picked.
///
/// # Arguments
///
/// * `bytes` - Raw image file bytes
///
/// # Returns
///
/// A `DecodedImage` with RGB pixel data and correct orientation applied.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the bytes are not a recognized
/// image format, `DecodeError::CorruptedData` if decoding fails partway,
/// and `DecodeError::EmptyImage` if the result has zero pixels.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
    // Extract EXIF orientation before decoding; the EXIF block is
    // independent of the pixel stream.
    let orientation = extract_orientation(bytes);

    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedData(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedData(e.to_string()))?;

    let oriented = apply_orientation(img, orientation);
    let decoded = DecodedImage::from_rgb_image(oriented.into_rgb8());

    if decoded.is_empty() {
        return Err(DecodeError::EmptyImage);
    }
    Ok(decoded)
}

/// Extract EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let exif_reader = Reader::new();
    let mut cursor = Cursor::new(bytes);

    match exif_reader.read_from_container(&mut cursor) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Some(value) = field.value.get_uint(0) {
                    return Orientation::from(value);
                }
            }
            Orientation::Normal
        }
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Extract the EXIF orientation value from image bytes (for external use).
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    extract_orientation(bytes)
}
