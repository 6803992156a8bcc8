//! Structured error types for photogrid.
//!
//! The grid core itself never fails (an empty photo list or a zero-sized
//! viewport just renders less). Errors only come from the edges: decoding host
//! input, building DOM nodes, and CLI I/O.

/// All errors that can occur at photogrid's input and output boundaries.
#[derive(Debug, thiserror::Error)]
pub enum PhotoGridError {
    /// Malformed JSON photo list or options.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A `JsValue` could not be converted to or from a Rust type.
    #[error("Value conversion: {0}")]
    Serde(String),

    /// DOM construction or listener registration failed.
    #[error("DOM error: {0}")]
    Dom(String),

    /// Reading a photo list or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A caller-supplied argument was out of range or unparsable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PhotoGridError>;

impl From<serde_wasm_bindgen::Error> for PhotoGridError {
    fn from(e: serde_wasm_bindgen::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<PhotoGridError> for wasm_bindgen::JsValue {
    fn from(e: PhotoGridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
