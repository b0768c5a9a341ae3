//! Viewport-to-image coordinate mapping and crop extraction.
//!
//! This module holds the math that relates what the user sees to what the
//! source image stores:
//!
//! 1. A [`ViewTransform`] (zoom scale + pan offset) positions the image
//!    inside the viewport.
//! 2. A [`CropRect`] sits over the viewport in viewport coordinates.
//! 3. [`compute_source_region`] inverse-maps the rectangle through the
//!    transform into integer source-pixel coordinates.
//! 4. [`extract`] copies exactly that region into a new pixel buffer.
//!
//! # Coordinate System
//!
//! - Viewport coordinates are `f64`, origin at the viewport's top-left.
//! - The scaled image is centered in the viewport and then shifted by pan:
//!   `origin = (viewport.size - image.size * scale) / 2 + pan` per axis.
//! - Source-pixel coordinates are `u32`, origin at the image's top-left.
//! - There is no rotation term; both axes map independently.

mod region;
mod types;
mod view;

pub use region::{compute_source_region, extract, CropError, CropRegion};
pub use types::{CropRect, Vec2, Viewport};
pub use view::{ViewTransform, MAX_SCALE, MIN_SCALE};
