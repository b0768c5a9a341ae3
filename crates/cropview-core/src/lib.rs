//! Cropview Core - Interactive crop engine
//!
//! This crate provides the core logic for an interactive image cropper:
//! decoding source bytes into a pixel buffer, mapping between viewport and
//! source-pixel coordinates while the user pans and zooms, and extracting
//! the pixels under a fixed-size crop rectangle at source resolution.
//!
//! All of the interactive state lives in a [`Session`], which is driven by
//! pre-classified gesture events from the host UI. The host never sees raw
//! coordinate math; it feeds deltas in and receives a cropped image out.

pub mod decode;
pub mod session;
pub mod transform;

pub use session::{DecodeTicket, Session, SessionError, SessionState};
pub use transform::{
    compute_source_region, extract, CropError, CropRect, CropRegion, Vec2, ViewTransform, Viewport,
};

/// Fixed crop dimensions for one session.
///
/// The crop rectangle keeps this size for the whole interaction; only its
/// position changes. Dimensions are in viewport units and must be positive.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CropConfig {
    /// Crop rectangle width in viewport units (must be > 0).
    pub crop_width: f64,
    /// Crop rectangle height in viewport units (must be > 0).
    pub crop_height: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            crop_width: 300.0,
            crop_height: 300.0,
        }
    }
}

impl CropConfig {
    /// Create a config with the given crop dimensions.
    pub fn new(crop_width: f64, crop_height: f64) -> Self {
        Self {
            crop_width,
            crop_height,
        }
    }

    /// Check that both dimensions are finite and positive.
    pub fn is_valid(&self) -> bool {
        self.crop_width.is_finite()
            && self.crop_height.is_finite()
            && self.crop_width > 0.0
            && self.crop_height > 0.0
    }
}
