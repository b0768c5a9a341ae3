//! JavaScript-facing wrapper types.
//!
//! The core crate's types never cross the boundary directly; this module
//! owns the translation. Pixel buffers travel as [`JsDecodedImage`] (an
//! opaque handle whose data stays in WASM memory until asked for), and the
//! source-pixel crop region travels as [`JsCropRegion`], a plain object
//! serialized with `serde_wasm_bindgen`.

use cropview_core::decode::DecodedImage;
use cropview_core::CropRegion;
use wasm_bindgen::prelude::*;

/// Handle to a decoded RGB image held in WASM memory.
///
/// The session hands these out for decoded sources and cropped results.
/// Dimensions are cheap getters; the pixel bytes stay on the Rust side
/// until `pixels()` copies them out, so passing the handle around (e.g.
/// from a decode worker back to the interaction thread) does not touch the
/// buffer. wasm-bindgen's finalizer reclaims the memory when JavaScript
/// drops the handle; `free()` exists for hosts that want the megabytes
/// back immediately.
#[wasm_bindgen]
pub struct JsDecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsDecodedImage {
    /// Build an image handle from dimensions and an RGB buffer
    /// (3 bytes per pixel, row-major, length `width * height * 3`).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsDecodedImage {
        JsDecodedImage {
            width,
            height,
            pixels,
        }
    }

    /// Image width in pixels.
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Length of the pixel buffer in bytes (`width * height * 3`).
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Copy the RGB bytes out to a `Uint8Array`.
    ///
    /// This is the one call that moves pixel data across the boundary;
    /// renderers should call it once per image, not per frame.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Release the buffer now instead of waiting for the finalizer.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsDecodedImage {
    /// Wrap a core image for the trip across the boundary.
    pub(crate) fn from_decoded(img: DecodedImage) -> Self {
        Self {
            width: img.width,
            height: img.height,
            pixels: img.pixels,
        }
    }

    /// Rebuild a core image from this handle.
    ///
    /// Note: This clones the pixel data.
    pub(crate) fn to_decoded(&self) -> DecodedImage {
        DecodedImage {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// Source-pixel crop region as JavaScript sees it:
/// `{ x, y, width, height }`.
///
/// Renderers use this as the `srcOffset`/`srcSize` pair when drawing the
/// source-resolution preview inside the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct JsCropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<CropRegion> for JsCropRegion {
    fn from(region: CropRegion) -> Self {
        Self {
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        }
    }
}
