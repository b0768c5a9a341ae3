//! Pan/zoom state for rendering the image inside the viewport.

use crate::decode::DecodedImage;

use super::{Vec2, Viewport};

/// Minimum zoom scale. One source pixel maps to half a viewport unit.
pub const MIN_SCALE: f64 = 0.5;
/// Maximum zoom scale. One source pixel maps to three viewport units.
pub const MAX_SCALE: f64 = 3.0;

/// Zoom scale and pan offset for drawing the source image in the viewport.
///
/// The scaled image is centered in the viewport and then shifted by the
/// accumulated pan, so the rendered top-left corner is
/// `(viewport.size - image.size * scale) / 2 + pan` per axis.
///
/// Scale is kept within [`MIN_SCALE`]..=[`MAX_SCALE`] on every update. Pan
/// is unconstrained; the image may be pushed entirely off-screen, and the
/// region math clamps against image bounds instead.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewTransform {
    /// Zoom factor mapping one source pixel to viewport units.
    pub scale: f64,
    /// Translation offset accumulated from pan gestures, in viewport units.
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Create an identity transform (scale 1, no pan).
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one pan/zoom gesture step.
    ///
    /// The new scale is `clamp(scale * zoom_factor, MIN_SCALE, MAX_SCALE)`
    /// and the new pan is `pan + pan_delta`. The two updates are
    /// independent, so their order does not matter.
    ///
    /// Zoom factors that are zero, negative or non-finite are ignored for
    /// the scale update (the pan delta is still applied): clamping can
    /// absorb an out-of-range magnitude but not a sign flip, so bad
    /// multipliers are rejected before the multiply.
    pub fn apply_gesture(&mut self, pan_delta: Vec2, zoom_factor: f64) {
        if zoom_factor.is_finite() && zoom_factor > 0.0 {
            self.scale = (self.scale * zoom_factor).clamp(MIN_SCALE, MAX_SCALE);
        }
        self.pan += pan_delta;
    }

    /// Top-left point where the scaled image is drawn, in viewport
    /// coordinates. May be negative when the image overflows the viewport.
    pub fn image_origin(&self, viewport: &Viewport, image: &DecodedImage) -> Vec2 {
        Vec2::new(
            (viewport.width - image.width as f64 * self.scale) / 2.0 + self.pan.x,
            (viewport.height - image.height as f64 * self.scale) / 2.0 + self.pan.y,
        )
    }

    /// Inverse-map a viewport-space point to image-pixel space.
    ///
    /// Each axis maps independently as `(point - origin) / scale`; there is
    /// no rotation term. The result is unclamped and may fall outside the
    /// image.
    pub fn viewport_to_image(&self, point: Vec2, viewport: &Viewport, image: &DecodedImage) -> Vec2 {
        let origin = self.image_origin(viewport, image);
        Vec2::new(
            (point.x - origin.x) / self.scale,
            (point.y - origin.y) / self.scale,
        )
    }
}
