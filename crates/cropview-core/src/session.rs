//! Crop session: the interactive state machine.
//!
//! A [`Session`] binds one decoded image, one [`ViewTransform`], one
//! [`CropRect`] and one [`Viewport`] for the lifetime of a crop
//! interaction. The host drives it through pre-classified gesture events
//! (pan/zoom vs. crop drag is decided by the platform's input layer) and a
//! decode-ticket handoff for the image itself.
//!
//! # Threading model
//!
//! All mutation goes through `&mut Session`, so updates are applied
//! sequentially and atomically per event; no two updates can interleave
//! mid-computation. Decoding is the one blocking operation and runs off the
//! interaction thread: the host calls [`Session::begin_decode`], performs
//! the decode wherever it likes, and posts the result back through
//! [`Session::finish_decode`]. A result carrying a stale ticket (the user
//! picked another image in the meantime) is discarded, which is how
//! cancellation is modeled - there is no thread interruption.
//!
//! # Lifecycle
//!
//! ```text
//! Idle --finish_decode(Ok)--> Active --confirm--> Completed
//!   ^                           |
//!   |--finish_decode(Err)       +------cancel---> Cancelled
//! ```
//!
//! `confirm` yields the cropped image exactly once; `cancel` likewise
//! finishes the session exactly once. Either terminal state rejects further
//! events.

use thiserror::Error;

use crate::decode::{DecodeError, DecodedImage};
use crate::transform::{
    compute_source_region, extract, CropError, CropRect, CropRegion, Vec2, ViewTransform, Viewport,
};
use crate::CropConfig;

/// Error types for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The configured crop dimensions are not positive finite numbers.
    #[error("crop dimensions must be positive, got {width}x{height}")]
    InvalidCropSize { width: f64, height: f64 },

    /// Confirm was called with no image loaded.
    #[error("no image has been loaded into the session")]
    NoImage,

    /// The session already completed or was cancelled.
    #[error("session has already finished")]
    Finished,

    /// Extraction failed; unreachable when the region comes from the
    /// session's own state.
    #[error(transparent)]
    Crop(#[from] CropError),
}

/// Lifecycle state of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image loaded (nothing decoded yet, or the last decode failed).
    /// No crop UI is shown; the user may retry by re-selecting.
    Idle,
    /// An image is loaded; gestures and crop drags are accepted.
    Active,
    /// `confirm` ran and delivered the cropped image.
    Completed,
    /// `cancel` ran; no extraction was performed.
    Cancelled,
}

impl SessionState {
    /// True for the two terminal states.
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Cancelled)
    }
}

/// Claim ticket for one in-flight decode.
///
/// Issued by [`Session::begin_decode`] and consumed by
/// [`Session::finish_decode`]. Deliberately neither `Clone` nor `Copy`: a
/// ticket redeems at most once, and only the most recently issued ticket is
/// accepted.
#[derive(Debug)]
pub struct DecodeTicket {
    generation: u64,
}

impl DecodeTicket {
    /// Opaque generation number, for hosts that ferry the ticket across a
    /// serialization boundary (e.g. to a Web Worker and back).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One crop interaction: image + transform + crop rectangle + viewport.
///
/// Created when the user selects an image, destroyed on cancel or
/// completion.
#[derive(Debug)]
pub struct Session {
    config: CropConfig,
    viewport: Viewport,
    transform: ViewTransform,
    crop_rect: CropRect,
    image: Option<DecodedImage>,
    state: SessionState,
    decode_generation: u64,
}

impl Session {
    /// Create a session in the `Idle` state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidCropSize`] if the configured crop
    /// dimensions are not positive finite numbers.
    pub fn new(viewport: Viewport, config: CropConfig) -> Result<Self, SessionError> {
        if !config.is_valid() {
            return Err(SessionError::InvalidCropSize {
                width: config.crop_width,
                height: config.crop_height,
            });
        }
        Ok(Self {
            config,
            viewport,
            transform: ViewTransform::new(),
            crop_rect: CropRect::new(0.0, 0.0, config.crop_width, config.crop_height),
            image: None,
            state: SessionState::Idle,
            decode_generation: 0,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn crop_rect(&self) -> &CropRect {
        &self.crop_rect
    }

    /// The loaded source image, if any.
    pub fn image(&self) -> Option<&DecodedImage> {
        self.image.as_ref()
    }

    /// Register interest in a new decode and get the ticket its result
    /// must carry.
    ///
    /// Any previously issued ticket becomes stale: selecting a new image
    /// cancels interest in the prior pending decode, whose result will be
    /// discarded if it arrives later. The session drops back to `Idle`
    /// (current image and view state cleared) until the decode lands.
    pub fn begin_decode(&mut self) -> DecodeTicket {
        self.decode_generation += 1;
        self.image = None;
        if !self.state.is_finished() {
            self.state = SessionState::Idle;
        }
        DecodeTicket {
            generation: self.decode_generation,
        }
    }

    /// Deliver a decode result.
    ///
    /// Returns `true` if the result was applied, `false` if it was
    /// discarded (stale ticket, or the session already finished). A
    /// successful decode resets the view transform and moves the crop
    /// rectangle back to the viewport's top-left corner; a failed decode
    /// leaves the session in `Idle` with no image ("no image displayed").
    pub fn finish_decode(
        &mut self,
        ticket: DecodeTicket,
        result: Result<DecodedImage, DecodeError>,
    ) -> bool {
        if ticket.generation != self.decode_generation || self.state.is_finished() {
            return false;
        }
        match result {
            Ok(image) if !image.is_empty() => {
                self.transform = ViewTransform::new();
                self.crop_rect =
                    CropRect::new(0.0, 0.0, self.config.crop_width, self.config.crop_height);
                self.image = Some(image);
                self.state = SessionState::Active;
            }
            _ => {
                self.image = None;
                self.state = SessionState::Idle;
            }
        }
        true
    }

    /// Route a pan/zoom gesture to the view transform.
    ///
    /// Ignored unless the session is `Active`: with no image there is
    /// nothing to pan or zoom.
    pub fn transform_gesture(&mut self, pan_delta: Vec2, zoom_factor: f64) {
        if self.state == SessionState::Active {
            self.transform.apply_gesture(pan_delta, zoom_factor);
        }
    }

    /// Route a single-touch drag to the crop rectangle.
    ///
    /// Returns whether the move was applied. A drag that would push the
    /// rectangle outside the viewport is silently rejected and the
    /// rectangle keeps its previous position - a policy decision, not a
    /// failure. Ignored unless the session is `Active`.
    pub fn crop_drag(&mut self, delta: Vec2) -> bool {
        if self.state != SessionState::Active {
            return false;
        }
        self.crop_rect.try_translate(delta, &self.viewport)
    }

    /// Replace the viewport size after a layout change.
    ///
    /// Scale and pan are kept; only the cached size is invalidated. The
    /// crop rectangle is not repositioned - if a shrink leaves it hanging
    /// over the edge, subsequent drags are rejected until the layout grows
    /// again.
    pub fn viewport_resized(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Source-pixel region currently under the crop rectangle.
    ///
    /// This is the same region `confirm` will extract, exposed so hosts
    /// can render the in-rectangle preview at source resolution. Returns
    /// `None` unless the session is `Active`.
    pub fn source_region(&self) -> Option<CropRegion> {
        if self.state != SessionState::Active {
            return None;
        }
        let image = self.image.as_ref()?;
        Some(compute_source_region(
            &self.crop_rect,
            &self.transform,
            &self.viewport,
            image,
        ))
    }

    /// Extract the pixels under the crop rectangle and complete the
    /// session.
    ///
    /// Succeeds at most once: the session transitions to `Completed` and
    /// further calls return [`SessionError::Finished`]. On any error the
    /// session state is untouched - the image is released and the state
    /// advances only after extraction has succeeded.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoImage`] if no image is loaded (`Idle`).
    /// - [`SessionError::Finished`] after completion or cancellation.
    pub fn confirm(&mut self) -> Result<DecodedImage, SessionError> {
        if self.state.is_finished() {
            return Err(SessionError::Finished);
        }
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        let region = compute_source_region(&self.crop_rect, &self.transform, &self.viewport, image);
        let cropped = extract(image, &region)?;
        self.image = None;
        self.state = SessionState::Completed;
        Ok(cropped)
    }

    /// Abandon the session without extracting.
    ///
    /// Returns `true` the first time; once finished, further calls return
    /// `false`.
    pub fn cancel(&mut self) -> bool {
        if self.state.is_finished() {
            return false;
        }
        self.image = None;
        self.state = SessionState::Cancelled;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage {
            width,
            height,
            pixels,
        }
    }

    fn active_session(viewport: Viewport, config: CropConfig, image: DecodedImage) -> Session {
        let mut session = Session::new(viewport, config).unwrap();
        let ticket = session.begin_decode();
        assert!(session.finish_decode(ticket, Ok(image)));
        assert_eq!(session.state(), SessionState::Active);
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.image().is_none());
        assert_eq!(session.crop_rect().width, 300.0);
    }

    #[test]
    fn test_new_session_rejects_bad_config() {
        let result = Session::new(Viewport::new(1000.0, 1000.0), CropConfig::new(0.0, 300.0));
        assert!(matches!(result, Err(SessionError::InvalidCropSize { .. })));
    }

    #[test]
    fn test_decode_handoff_success() {
        let mut session =
            Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();
        let ticket = session.begin_decode();
        assert_eq!(session.state(), SessionState::Idle);

        assert!(session.finish_decode(ticket, Ok(test_image(800, 600))));
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.image().unwrap().width, 800);
    }

    #[test]
    fn test_decode_failure_leaves_session_idle() {
        let mut session =
            Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();
        let ticket = session.begin_decode();

        assert!(session.finish_decode(ticket, Err(DecodeError::InvalidFormat)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.image().is_none());

        // Confirm never yields an image; cancel is still available to reset.
        assert!(matches!(session.confirm(), Err(SessionError::NoImage)));
        assert!(session.cancel());
    }

    #[test]
    fn test_stale_decode_result_is_discarded() {
        let mut session =
            Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();
        let first = session.begin_decode();
        // User picks a different image before the first decode lands.
        let second = session.begin_decode();

        assert!(!session.finish_decode(first, Ok(test_image(100, 100))));
        assert!(session.image().is_none());

        assert!(session.finish_decode(second, Ok(test_image(200, 200))));
        assert_eq!(session.image().unwrap().width, 200);
    }

    #[test]
    fn test_new_image_resets_view_state() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::default(),
            test_image(500, 500),
        );
        session.transform_gesture(Vec2::new(40.0, 40.0), 2.0);
        assert!(session.crop_drag(Vec2::new(120.0, 0.0)));

        let ticket = session.begin_decode();
        assert!(session.finish_decode(ticket, Ok(test_image(300, 300))));

        assert_eq!(session.transform().scale, 1.0);
        assert_eq!(session.transform().pan, Vec2::ZERO);
        assert_eq!(session.crop_rect().left, 0.0);
        assert_eq!(session.crop_rect().top, 0.0);
    }

    #[test]
    fn test_gestures_ignored_while_idle() {
        let mut session =
            Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();
        session.transform_gesture(Vec2::new(10.0, 10.0), 2.0);
        assert_eq!(session.transform().scale, 1.0);
        assert!(!session.crop_drag(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_crop_drag_bounds_policy() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::default(),
            test_image(2000, 2000),
        );

        assert!(session.crop_drag(Vec2::new(350.0, 225.0)));
        let before = *session.crop_rect();

        // Would leave the viewport: rejected, rectangle unchanged.
        assert!(!session.crop_drag(Vec2::new(500.0, 0.0)));
        assert_eq!(*session.crop_rect(), before);
    }

    #[test]
    fn test_confirm_extracts_region_from_current_state() {
        // 1000x1000 viewport, 2000x2000 image, scale 1, crop rect dragged
        // to (350, 225) with size 300x750.
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::new(300.0, 750.0),
            test_image(2000, 2000),
        );
        assert!(session.crop_drag(Vec2::new(350.0, 225.0)));

        let cropped = session.confirm().unwrap();
        assert_eq!(cropped.width, 300);
        assert_eq!(cropped.height, 750);
        // First output pixel comes from source (850, 725).
        let expected = ((725u32 * 2000 + 850) % 256) as u8;
        assert_eq!(cropped.pixels[0], expected);

        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_confirm_succeeds_exactly_once() {
        let mut session = active_session(
            Viewport::new(500.0, 500.0),
            CropConfig::default(),
            test_image(500, 500),
        );

        assert!(session.confirm().is_ok());
        assert!(matches!(session.confirm(), Err(SessionError::Finished)));
    }

    #[test]
    fn test_cancel_finishes_exactly_once() {
        let mut session = active_session(
            Viewport::new(500.0, 500.0),
            CropConfig::default(),
            test_image(500, 500),
        );

        assert!(session.cancel());
        assert_eq!(session.state(), SessionState::Cancelled);
        assert!(!session.cancel());
        assert!(matches!(session.confirm(), Err(SessionError::Finished)));
    }

    #[test]
    fn test_events_after_completion_are_rejected() {
        let mut session = active_session(
            Viewport::new(500.0, 500.0),
            CropConfig::default(),
            test_image(500, 500),
        );
        session.confirm().unwrap();

        session.transform_gesture(Vec2::new(10.0, 0.0), 2.0);
        assert_eq!(session.transform().scale, 1.0);
        assert!(!session.crop_drag(Vec2::new(10.0, 0.0)));

        let ticket = session.begin_decode();
        assert!(!session.finish_decode(ticket, Ok(test_image(100, 100))));
    }

    #[test]
    fn test_viewport_resize_keeps_scale_and_pan() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::default(),
            test_image(2000, 2000),
        );
        session.transform_gesture(Vec2::new(25.0, -10.0), 1.5);

        session.viewport_resized(Viewport::new(800.0, 600.0));
        assert_eq!(session.viewport().width, 800.0);
        assert_eq!(session.transform().scale, 1.5);
        assert_eq!(session.transform().pan, Vec2::new(25.0, -10.0));
    }

    #[test]
    fn test_drags_rejected_after_shrinking_viewport() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::default(),
            test_image(2000, 2000),
        );
        assert!(session.crop_drag(Vec2::new(600.0, 600.0)));

        // Shrink so the rectangle hangs over the edge; it stays put and
        // moves further only once they would fit again.
        session.viewport_resized(Viewport::new(500.0, 500.0));
        assert!(!session.crop_drag(Vec2::new(1.0, 1.0)));
        assert_eq!(session.crop_rect().left, 600.0);
    }

    #[test]
    fn test_confirm_keeps_image_until_extraction_succeeds() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::default(),
            test_image(2000, 2000),
        );

        // Failed confirms must not consume the image or advance the state:
        // the session only moves to Completed once extraction has produced
        // a buffer. Reading the region is pure and changes nothing.
        let region = session.source_region().unwrap();
        assert!(session.image().is_some());
        assert_eq!(session.state(), SessionState::Active);

        let cropped = session.confirm().unwrap();
        assert_eq!(cropped.width, region.width);
        assert_eq!(cropped.height, region.height);
        assert!(session.image().is_none());
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_failed_confirm_leaves_state_untouched() {
        let mut session =
            Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();

        // No image loaded: confirm errors and the session stays Idle and
        // retryable rather than half-finished.
        assert!(matches!(session.confirm(), Err(SessionError::NoImage)));
        assert_eq!(session.state(), SessionState::Idle);

        let ticket = session.begin_decode();
        assert!(session.finish_decode(ticket, Ok(test_image(400, 400))));
        assert_eq!(session.state(), SessionState::Active);
        assert!(session.confirm().is_ok());
    }

    #[test]
    fn test_source_region_matches_confirmed_crop() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::new(300.0, 750.0),
            test_image(2000, 2000),
        );
        assert!(session.crop_drag(Vec2::new(350.0, 225.0)));

        let region = session.source_region().unwrap();
        assert_eq!(region.x, 850);
        assert_eq!(region.y, 725);
        assert_eq!(region.width, 300);
        assert_eq!(region.height, 750);

        let cropped = session.confirm().unwrap();
        assert_eq!(cropped.width, region.width);
        assert_eq!(cropped.height, region.height);
        // Once finished there is no region to preview.
        assert!(session.source_region().is_none());
    }

    #[test]
    fn test_source_region_none_while_idle() {
        let session = Session::new(Viewport::new(1000.0, 1000.0), CropConfig::default()).unwrap();
        assert!(session.source_region().is_none());
    }

    #[test]
    fn test_confirm_after_zoom_halves_region() {
        let mut session = active_session(
            Viewport::new(1000.0, 1000.0),
            CropConfig::new(300.0, 750.0),
            test_image(2000, 2000),
        );
        assert!(session.crop_drag(Vec2::new(350.0, 225.0)));
        session.transform_gesture(Vec2::ZERO, 2.0);

        let cropped = session.confirm().unwrap();
        assert_eq!(cropped.width, 150);
        assert_eq!(cropped.height, 375);
    }
}
