//! Image decoding for Cropview.
//!
//! This module turns raw source bytes (as picked by the host application)
//! into the RGB pixel buffer a crop session works on. The format is guessed
//! from the bytes, and EXIF orientation is applied before the buffer is
//! handed over, so the session always sees upright pixels.
//!
//! # Architecture
//!
//! Decoding is the only potentially slow, blocking step in the system. It is
//! synchronous here; hosts run it off the interaction thread (a Web Worker
//! in the WASM deployment) and hand the result back through the session's
//! decode-ticket protocol.

mod bytes;
mod types;

pub use bytes::{decode_image, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
