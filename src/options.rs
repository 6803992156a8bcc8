//! Host-supplied tunables.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::{ScrollSettings, CLICK_THRESHOLD_PX, DRAG_SETTLE_MS, WHEEL_SENSITIVITY};
use crate::layout::{DEFAULT_BUFFER_CELLS, MAX_VISIBLE_CELLS, RESIZE_DEBOUNCE_MS};
use crate::render::DEFAULT_TILE_CACHE_CAPACITY;

/// Options accepted by the session and the wasm viewer.
///
/// Every field has a default, so `{}` (or `undefined` from JS) is valid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridOptions {
    /// Extra rings of cells mounted around the viewport.
    pub buffer_cells: u32,
    /// Upper bound on mounted cells.
    pub max_cells: usize,
    pub wheel_sensitivity: f64,
    pub click_threshold_px: f64,
    pub drag_settle_ms: f64,
    pub resize_debounce_ms: f64,
    /// Distance outside the viewport at which images start loading.
    /// `None` means one cell pitch.
    pub lazy_margin_px: Option<f64>,
    pub seed: u32,
    pub tile_cache_capacity: usize,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            buffer_cells: DEFAULT_BUFFER_CELLS,
            max_cells: MAX_VISIBLE_CELLS,
            wheel_sensitivity: WHEEL_SENSITIVITY,
            click_threshold_px: CLICK_THRESHOLD_PX,
            drag_settle_ms: DRAG_SETTLE_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            lazy_margin_px: None,
            seed: 0,
            tile_cache_capacity: DEFAULT_TILE_CACHE_CAPACITY,
        }
    }
}

impl GridOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        let options: GridOptions = serde_json::from_str(json)?;
        Ok(options.sanitized())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_js(value: wasm_bindgen::JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        let options: GridOptions = serde_wasm_bindgen::from_value(value)?;
        Ok(options.sanitized())
    }

    /// Replace values that would break the grid with their defaults.
    ///
    /// `max_cells` is raised to at least one cell, non-finite or negative
    /// tunables fall back, and a zero sensitivity is kept (it disables wheel pan).
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.max_cells = self.max_cells.max(1);
        if !self.wheel_sensitivity.is_finite() || self.wheel_sensitivity < 0.0 {
            self.wheel_sensitivity = defaults.wheel_sensitivity;
        }
        if !self.click_threshold_px.is_finite() || self.click_threshold_px <= 0.0 {
            self.click_threshold_px = defaults.click_threshold_px;
        }
        if !self.drag_settle_ms.is_finite() || self.drag_settle_ms < 0.0 {
            self.drag_settle_ms = defaults.drag_settle_ms;
        }
        if !self.resize_debounce_ms.is_finite() || self.resize_debounce_ms < 0.0 {
            self.resize_debounce_ms = defaults.resize_debounce_ms;
        }
        self.lazy_margin_px = self
            .lazy_margin_px
            .filter(|margin| margin.is_finite() && *margin >= 0.0);
        self
    }

    pub fn scroll_settings(&self) -> ScrollSettings {
        ScrollSettings {
            wheel_sensitivity: self.wheel_sensitivity,
            click_threshold_px: self.click_threshold_px,
            settle_ms: self.drag_settle_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_uses_defaults() {
        let options = GridOptions::from_json("{}");
        assert!(matches!(options, Ok(ref o) if *o == GridOptions::default()));
    }

    #[test]
    fn test_camel_case_fields() {
        let options = GridOptions::from_json(r#"{"bufferCells": 4, "seed": 9, "lazyMarginPx": 120}"#);
        let Ok(options) = options else {
            panic!("options should parse");
        };
        assert_eq!(options.buffer_cells, 4);
        assert_eq!(options.seed, 9);
        assert_eq!(options.lazy_margin_px, Some(120.0));
    }

    #[test]
    fn test_sanitized_clamps_bad_values() {
        let options = GridOptions {
            max_cells: 0,
            click_threshold_px: -1.0,
            drag_settle_ms: f64::NAN,
            lazy_margin_px: Some(f64::INFINITY),
            ..GridOptions::default()
        }
        .sanitized();
        assert_eq!(options.max_cells, 1);
        assert!((options.click_threshold_px - CLICK_THRESHOLD_PX).abs() < f64::EPSILON);
        assert!((options.drag_settle_ms - DRAG_SETTLE_MS).abs() < f64::EPSILON);
        assert_eq!(options.lazy_margin_px, None);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(GridOptions::from_json("{").is_err());
    }
}
