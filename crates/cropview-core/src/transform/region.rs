//! Source-region computation and pixel extraction.
//!
//! [`compute_source_region`] inverse-maps the viewport-space crop rectangle
//! into integer source-pixel coordinates; [`extract`] copies that region
//! into a freshly allocated buffer. The two are kept separate so the region
//! math stays testable without touching pixel data, and so hosts can run
//! the (CPU-bound) extraction on a worker.

use thiserror::Error;

use crate::decode::DecodedImage;

use super::{CropRect, ViewTransform, Viewport};

/// Error types for crop extraction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CropError {
    /// The requested region does not fit inside the source image.
    ///
    /// Unreachable when the region comes from [`compute_source_region`],
    /// which clamps against image bounds by construction; this exists as a
    /// guard for regions built by hand.
    #[error("crop region {x},{y} {width}x{height} exceeds {image_width}x{image_height} source image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },
}

/// An axis-aligned region in integer source-pixel coordinates.
///
/// Regions produced by [`compute_source_region`] always satisfy
/// `width >= 1`, `height >= 1`, `x + width <= image.width` and
/// `y + height <= image.height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Map the crop rectangle through the current view transform into
/// source-pixel coordinates.
///
/// The rectangle's corners are inverse-mapped axis by axis
/// (`(edge - origin) / scale`, rounded to the nearest pixel) and then
/// clamped, offsets first:
///
/// 1. `x` and `y` are clamped against the full image bounds.
/// 2. `width` and `height` are clamped against the space remaining from
///    `(x, y)`, with a floor of 1 pixel.
///
/// The order matters: clamping the sizes against the *remaining* space
/// guarantees the region never exceeds the image and is always at least
/// 1x1. To keep that floor satisfiable the offsets clamp to the last pixel
/// (`image.width - 1`), not one past it.
///
/// Pure function: identical inputs produce identical regions.
///
/// # Panics
///
/// Debug-asserts that `image` is non-empty; sessions only ever hold decoded
/// (non-empty) images.
pub fn compute_source_region(
    crop_rect: &CropRect,
    transform: &ViewTransform,
    viewport: &Viewport,
    image: &DecodedImage,
) -> CropRegion {
    debug_assert!(!image.is_empty(), "source image must have pixels");

    let origin = transform.image_origin(viewport, image);
    let scale = transform.scale;

    let max_x = image.width.saturating_sub(1) as f64;
    let max_y = image.height.saturating_sub(1) as f64;

    // Ties round to even so a .5 boundary doesn't bias the region one way.
    let x = ((crop_rect.left - origin.x) / scale)
        .round_ties_even()
        .clamp(0.0, max_x) as u32;
    let y = ((crop_rect.top - origin.y) / scale)
        .round_ties_even()
        .clamp(0.0, max_y) as u32;

    let width = ((crop_rect.width / scale).round_ties_even() as u32).clamp(1, image.width - x);
    let height = ((crop_rect.height / scale).round_ties_even() as u32).clamp(1, image.height - y);

    CropRegion {
        x,
        y,
        width,
        height,
    }
}

/// Copy the pixels inside `region` into a newly allocated image.
///
/// # Errors
///
/// Returns [`CropError::OutOfBounds`] if the region does not fit inside the
/// source image. Regions from [`compute_source_region`] are valid by
/// construction, so this is a defensive check only.
pub fn extract(image: &DecodedImage, region: &CropRegion) -> Result<DecodedImage, CropError> {
    let out_of_bounds = CropError::OutOfBounds {
        x: region.x,
        y: region.y,
        width: region.width,
        height: region.height,
        image_width: image.width,
        image_height: image.height,
    };

    if region.width == 0 || region.height == 0 {
        return Err(out_of_bounds);
    }
    let right = region.x.checked_add(region.width).ok_or(out_of_bounds.clone())?;
    let bottom = region.y.checked_add(region.height).ok_or(out_of_bounds.clone())?;
    if right > image.width || bottom > image.height {
        return Err(out_of_bounds);
    }

    let row_bytes = (region.width * 3) as usize;
    let mut output = Vec::with_capacity((region.width * region.height * 3) as usize);

    // Copy row by row; rows are contiguous in the source buffer.
    for y in 0..region.height {
        let src_y = (region.y + y) as usize;
        let src_start = (src_y * image.width as usize + region.x as usize) * 3;
        output.extend_from_slice(&image.pixels[src_start..src_start + row_bytes]);
    }

    Ok(DecodedImage {
        width: region.width,
        height: region.height,
        pixels: output,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
