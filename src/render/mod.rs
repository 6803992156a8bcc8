//! Tile rendering with pluggable surfaces.
//!
//! This module provides:
//! - Tile placement and mount diffing for the visible window (`grid`)
//! - A memo cache for tile resolution (`cache`)
//! - The `TileSurface` trait plus a headless in-memory surface (`backend`)
//! - The DOM surface used in the browser (`dom`, wasm32 only)

pub mod backend;
pub mod cache;
pub mod grid;

#[cfg(target_arch = "wasm32")]
pub mod dom;

pub use backend::{MemorySurface, TileSurface};
pub use cache::{TileCache, TileKey, DEFAULT_TILE_CACHE_CAPACITY};
pub use grid::{container_transform, GridRenderer, LoadState, PlacedTile, RenderPlan, TileRect};

#[cfg(target_arch = "wasm32")]
pub use dom::DomSurface;
