//! Grid geometry and viewport culling.
//!
//! This module handles:
//! - Resolving cell geometry from the viewport width (with resize debounce)
//! - Computing the bounded window of lattice cells to materialize
//! - Mapping viewport points back to lattice cells

mod grid_config;
mod viewport;

pub use grid_config::{GridConfig, ResizeDebouncer, RESIZE_DEBOUNCE_MS};
pub use viewport::{
    cell_rect, compute_visible_cells, hit_test, VisibleWindow, DEFAULT_BUFFER_CELLS,
    MAX_VISIBLE_CELLS,
};
