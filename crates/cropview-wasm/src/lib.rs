//! Cropview WASM - WebAssembly bindings for the Cropview crop engine
//!
//! This crate exposes the cropview-core functionality to
//! JavaScript/TypeScript applications. The JS side owns the platform glue
//! (file picking, canvas rendering, pointer-event classification); the
//! session state and all coordinate math stay in Rust.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types for image data
//! - `decode` - Image decoding binding (run inside a Web Worker)
//! - `session` - The interactive crop session and its event entry points
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession, decode_image } from '@cropview/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new CropSession(viewport.width, viewport.height, 300, 300);
//! const ticket = session.begin_decode();
//! decodeWorker.postMessage({ ticket, bytes });
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod session;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use session::CropSession;
pub use types::{JsCropRegion, JsDecodedImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
