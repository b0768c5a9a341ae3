//! Crop session WASM bindings.
//!
//! JavaScript owns gesture classification, rendering and file picking; this
//! binding owns the interactive state. Events arrive as plain numbers
//! (deltas and factors), and the decode handoff crosses the worker boundary
//! as a bare generation number so tickets survive `postMessage`.
//!
//! # Usage
//!
//! ```typescript
//! const session = new CropSession(canvas.width, canvas.height, 300, 300);
//!
//! // Interaction thread: register interest, decode in a worker.
//! const ticket = session.begin_decode();
//! worker.postMessage({ ticket, bytes });
//!
//! // Worker: const image = decode_image(bytes); post it back with the ticket.
//! // Interaction thread, on worker message:
//! session.deliver_image(msg.ticket, image);   // stale tickets are discarded
//!
//! // Gesture callbacks (already classified by the input layer):
//! session.transform_gesture(pan.dx, pan.dy, zoom);
//! session.crop_drag(drag.dx, drag.dy);
//!
//! // Confirm button:
//! const cropped = session.confirm();
//! ```

use cropview_core::{CropConfig, DecodeTicket, Session, SessionState, Vec2, Viewport};
use wasm_bindgen::prelude::*;

use crate::types::{JsCropRegion, JsDecodedImage};

/// Interactive crop session exposed to JavaScript.
///
/// Wraps the core `Session` and keeps the pending `DecodeTicket` on the
/// Rust side; JavaScript only ever sees its generation number.
#[wasm_bindgen]
pub struct CropSession {
    inner: Session,
    pending: Option<DecodeTicket>,
}

#[wasm_bindgen]
impl CropSession {
    /// Create a session for the given viewport and crop dimensions.
    ///
    /// # Errors
    ///
    /// Rejects non-positive crop dimensions.
    #[wasm_bindgen(constructor)]
    pub fn new(
        viewport_width: f64,
        viewport_height: f64,
        crop_width: f64,
        crop_height: f64,
    ) -> Result<CropSession, JsValue> {
        let session = Session::new(
            Viewport::new(viewport_width, viewport_height),
            CropConfig::new(crop_width, crop_height),
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(CropSession {
            inner: session,
            pending: None,
        })
    }

    /// Register interest in a new decode; returns the ticket number the
    /// decoded image must come back with. A newer call makes all earlier
    /// ticket numbers stale.
    pub fn begin_decode(&mut self) -> u64 {
        let ticket = self.inner.begin_decode();
        let generation = ticket.generation();
        self.pending = Some(ticket);
        generation
    }

    /// Deliver a decoded image for the given ticket number.
    ///
    /// Returns `true` if the image was installed, `false` if the ticket was
    /// stale (the user picked another image in the meantime) and the result
    /// was discarded.
    pub fn deliver_image(&mut self, ticket: u64, image: &JsDecodedImage) -> bool {
        match self.pending.take() {
            Some(t) if t.generation() == ticket => {
                self.inner.finish_decode(t, Ok(image.to_decoded()))
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Report a decode failure for the given ticket number.
    ///
    /// The session stays idle with no image displayed; the user may retry
    /// by re-selecting. Returns `false` for stale tickets.
    pub fn deliver_decode_failure(&mut self, ticket: u64, message: &str) -> bool {
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!("image decode failed: {message}").into());
        #[cfg(not(target_arch = "wasm32"))]
        let _ = message;

        match self.pending.take() {
            Some(t) if t.generation() == ticket => self
                .inner
                .finish_decode(t, Err(cropview_core::decode::DecodeError::InvalidFormat)),
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Whether an image is loaded and the crop UI should be shown.
    pub fn has_image(&self) -> bool {
        self.inner.state() == SessionState::Active
    }

    /// Route a classified pan/zoom gesture step.
    pub fn transform_gesture(&mut self, pan_dx: f64, pan_dy: f64, zoom_factor: f64) {
        self.inner
            .transform_gesture(Vec2::new(pan_dx, pan_dy), zoom_factor);
    }

    /// Route a classified crop-rectangle drag. Returns whether the move was
    /// applied; out-of-bounds moves are rejected and the rectangle stays
    /// put.
    pub fn crop_drag(&mut self, dx: f64, dy: f64) -> bool {
        self.inner.crop_drag(Vec2::new(dx, dy))
    }

    /// Replace the viewport size after a layout change (keeps scale/pan).
    pub fn viewport_resized(&mut self, width: f64, height: f64) {
        self.inner.viewport_resized(Viewport::new(width, height));
    }

    /// Current zoom scale, for rendering.
    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.transform().scale
    }

    /// Current pan offset, for rendering.
    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.transform().pan.x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.transform().pan.y
    }

    /// Crop rectangle position and size, for rendering the overlay.
    #[wasm_bindgen(getter)]
    pub fn crop_left(&self) -> f64 {
        self.inner.crop_rect().left
    }

    #[wasm_bindgen(getter)]
    pub fn crop_top(&self) -> f64 {
        self.inner.crop_rect().top
    }

    #[wasm_bindgen(getter)]
    pub fn crop_width(&self) -> f64 {
        self.inner.crop_rect().width
    }

    #[wasm_bindgen(getter)]
    pub fn crop_height(&self) -> f64 {
        self.inner.crop_rect().height
    }

    /// Source-pixel region currently under the crop rectangle, as a plain
    /// `{ x, y, width, height }` object, or `null` when no image is
    /// loaded.
    ///
    /// This is the region `confirm()` will extract; renderers use it as
    /// the `srcOffset`/`srcSize` pair to draw the source-resolution
    /// preview inside the rectangle.
    pub fn source_region(&self) -> Result<JsValue, JsValue> {
        match self.inner.source_region() {
            Some(region) => serde_wasm_bindgen::to_value(&JsCropRegion::from(region))
                .map_err(|e| JsValue::from_str(&e.to_string())),
            None => Ok(JsValue::NULL),
        }
    }

    /// Extract the pixels under the crop rectangle and complete the
    /// session. Succeeds at most once.
    ///
    /// # Errors
    ///
    /// Errors if no image is loaded or the session already finished.
    pub fn confirm(&mut self) -> Result<JsDecodedImage, JsValue> {
        self.inner
            .confirm()
            .map(JsDecodedImage::from_decoded)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Abandon the session without extracting. Returns `true` the first
    /// time.
    pub fn cancel(&mut self) -> bool {
        self.inner.cancel()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(width: u32, height: u32) -> JsDecodedImage {
        JsDecodedImage::new(width, height, vec![64u8; (width * height * 3) as usize])
    }

    fn session() -> CropSession {
        CropSession::new(1000.0, 1000.0, 300.0, 300.0).unwrap()
    }

    #[test]
    fn test_decode_roundtrip_installs_image() {
        let mut s = session();
        assert!(!s.has_image());

        let ticket = s.begin_decode();
        assert!(s.deliver_image(ticket, &decoded(800, 600)));
        assert!(s.has_image());
    }

    #[test]
    fn test_stale_ticket_discarded() {
        let mut s = session();
        let first = s.begin_decode();
        let second = s.begin_decode();

        assert!(!s.deliver_image(first, &decoded(100, 100)));
        assert!(!s.has_image());

        assert!(s.deliver_image(second, &decoded(200, 200)));
        assert!(s.has_image());
    }

    #[test]
    fn test_gesture_and_drag_state_visible_to_renderer() {
        let mut s = session();
        let ticket = s.begin_decode();
        s.deliver_image(ticket, &decoded(2000, 2000));

        s.transform_gesture(30.0, -10.0, 2.0);
        assert_eq!(s.scale(), 2.0);
        assert_eq!(s.pan_x(), 30.0);
        assert_eq!(s.pan_y(), -10.0);

        assert!(s.crop_drag(350.0, 225.0));
        assert_eq!(s.crop_left(), 350.0);
        assert_eq!(s.crop_top(), 225.0);
        assert_eq!(s.crop_width(), 300.0);

        // Out-of-bounds drag keeps the rectangle in place.
        assert!(!s.crop_drag(500.0, 0.0));
        assert_eq!(s.crop_left(), 350.0);
    }

    #[test]
    fn test_confirm_returns_cropped_image_once() {
        let mut s = session();
        let ticket = s.begin_decode();
        s.deliver_image(ticket, &decoded(2000, 2000));
        s.crop_drag(350.0, 225.0);

        let cropped = s.confirm().unwrap();
        assert_eq!(cropped.width(), 300);
        assert_eq!(cropped.height(), 300);
        assert!(!s.has_image());
    }

    #[test]
    fn test_cancel_once() {
        let mut s = session();
        let ticket = s.begin_decode();
        s.deliver_image(ticket, &decoded(500, 500));

        assert!(s.cancel());
        assert!(!s.cancel());
        assert!(!s.has_image());
    }
}
