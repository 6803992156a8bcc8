//! photogrid - infinite pannable photo grid for the web
//!
//! Renders an unbounded 2-D lattice of photographs inside a finite viewport via
//! WebAssembly and plain DOM elements:
//! - Deterministic photo-per-cell assignment from a seeded spatial hash
//! - Bounded cell window that follows the pan offset
//! - Mouse drag, touch and wheel panning with frame coalescing
//! - Click-vs-drag disambiguation and lazy image loading
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { PhotoGridView } from 'photogrid';
//! await init();
//! const grid = new PhotoGridView(container, { seed: 7 });
//! grid.set_photos(photos);
//! grid.set_click_callback((photo) => openModal(photo));
//! ```

pub mod error;
pub mod input;
pub mod layout;
pub mod options;
pub mod render;
pub mod session;
pub mod tiling;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use viewer::PhotoGridView;

pub use error::{PhotoGridError, Result};
pub use layout::GridConfig;
pub use options::GridOptions;
pub use session::{GridSession, TileSnapshot, WindowSnapshot};
pub use tiling::resolve_tile;
pub use types::*;

/// Resolve the cell geometry for a viewport width and return it as JSON
///
/// # Errors
/// Returns an error if the geometry cannot be serialized.
#[wasm_bindgen]
pub fn grid_config_json(width: f64) -> std::result::Result<String, JsValue> {
    serde_json::to_string(&GridConfig::for_viewport_width(width))
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Resolve the cell geometry for a viewport width as a `JsValue`
///
/// # Errors
/// Returns an error if the geometry cannot be serialized.
#[wasm_bindgen]
pub fn grid_config_for_width(width: f64) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&GridConfig::for_viewport_width(width))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Index of the photo shown at `(row, col)` for `seed` in a list of `len` photos.
#[wasm_bindgen]
pub fn tile_index_at(row: i32, col: i32, seed: u32, len: usize) -> Option<usize> {
    tiling::tile_index(
        CellCoordinate::new(i64::from(row), i64::from(col)),
        seed,
        len,
    )
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
