//! Image decoding WASM bindings.
//!
//! This module exposes the cropview-core decode function to JavaScript.
//! Decoding can take hundreds of milliseconds for large images, so hosts
//! should call it from a Web Worker and post the resulting image back to
//! the session on the interaction thread (see `CropSession`).

use crate::types::JsDecodedImage;
use cropview_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an image from raw bytes.
///
/// The format is guessed from the byte content (JPEG and PNG), and EXIF
/// orientation correction is applied automatically so the image displays
/// upright.
///
/// # Arguments
///
/// * `bytes` - The raw image file bytes as a `Uint8Array`
///
/// # Returns
///
/// A `JsDecodedImage` containing the decoded RGB pixel data, or an error if
/// decoding fails.
///
/// # Errors
///
/// Returns an error if:
/// - The bytes are not a recognized image format
/// - The image data is corrupted or truncated
///
/// # Example
///
/// ```typescript
/// // Inside a Web Worker:
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const image = decode_image(bytes);
/// postMessage({ ticket, width: image.width, height: image.height, pixels: image.pixels() });
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsDecodedImage, JsValue> {
    decode::decode_image(bytes)
        .map(JsDecodedImage::from_decoded)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

// Error paths construct JsValue and are exercised in the core crate's
// decode tests; JsValue cannot be created on non-wasm test targets.
