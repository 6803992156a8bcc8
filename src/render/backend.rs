//! Tile surface trait for pluggable presentation backends.
//!
//! A surface receives the renderer's diff and offset updates; it never decides
//! what is visible. The DOM backend (wasm32) positions `<div>`/`<img>` nodes;
//! [`MemorySurface`] keeps the same state in maps for tests and the CLI.

use std::collections::BTreeMap;

use super::grid::{container_transform, LoadState, PlacedTile, RenderPlan};
use crate::error::Result;
use crate::types::{CellCoordinate, ScrollOffset};

/// Operations every presentation backend must implement.
pub trait TileSurface {
    /// Create, update and remove tile nodes according to `plan`.
    fn apply_plan(&mut self, plan: &RenderPlan) -> Result<()>;

    /// Move the whole tile layer; called once per committed offset.
    fn set_offset(&mut self, offset: ScrollOffset);

    /// Start loading the image of each listed (already mounted) tile.
    fn begin_loading(&mut self, cells: &[CellCoordinate]) -> Result<()>;

    /// Reflect a finished load or a failure on one tile.
    fn show_load_state(&mut self, cell: CellCoordinate, state: LoadState);

    /// Remove every node; the surface must be reusable afterwards.
    fn clear(&mut self);
}

/// Headless surface that records what a real backend would show.
#[derive(Debug, Default)]
pub struct MemorySurface {
    tiles: BTreeMap<CellCoordinate, PlacedTile>,
    loading: Vec<CellCoordinate>,
    states: BTreeMap<CellCoordinate, LoadState>,
    transform: String,
    plans_applied: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiles currently on the surface, row-major.
    pub fn tiles(&self) -> impl Iterator<Item = &PlacedTile> {
        self.tiles.values()
    }

    pub fn tile(&self, cell: CellCoordinate) -> Option<&PlacedTile> {
        self.tiles.get(&cell)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Cells whose image load was started, in request order.
    pub fn loading(&self) -> &[CellCoordinate] {
        &self.loading
    }

    /// Load state last shown for `cell`.
    pub fn load_state(&self, cell: CellCoordinate) -> Option<LoadState> {
        self.states.get(&cell).copied()
    }

    /// Last transform string applied to the layer.
    pub fn transform(&self) -> &str {
        &self.transform
    }

    /// Number of non-empty plans applied so far.
    pub fn plans_applied(&self) -> usize {
        self.plans_applied
    }
}

impl TileSurface for MemorySurface {
    fn apply_plan(&mut self, plan: &RenderPlan) -> Result<()> {
        if plan.is_empty() {
            return Ok(());
        }
        for cell in &plan.removed {
            self.tiles.remove(cell);
            self.states.remove(cell);
        }
        for tile in &plan.added {
            self.states.insert(tile.cell, LoadState::Pending);
            self.tiles.insert(tile.cell, tile.clone());
        }
        for tile in &plan.changed {
            if tile.reload {
                self.states.insert(tile.cell, LoadState::Pending);
            }
            self.tiles.insert(tile.cell, tile.clone());
        }
        self.plans_applied += 1;
        Ok(())
    }

    fn set_offset(&mut self, offset: ScrollOffset) {
        self.transform = container_transform(offset);
    }

    fn begin_loading(&mut self, cells: &[CellCoordinate]) -> Result<()> {
        for cell in cells {
            if self.tiles.contains_key(cell) {
                self.states.insert(*cell, LoadState::Loading);
                self.loading.push(*cell);
            }
        }
        Ok(())
    }

    fn show_load_state(&mut self, cell: CellCoordinate, state: LoadState) {
        if let Some(current) = self.states.get_mut(&cell) {
            *current = state;
        }
    }

    fn clear(&mut self) {
        self.tiles.clear();
        self.loading.clear();
        self.states.clear();
        self.transform.clear();
    }
}
