//! Tile placement and mount diffing.
//!
//! The renderer keeps one record per mounted cell. Each sync resolves the
//! photos for the current window and reports only what the backend has to
//! change: tiles that entered the window, tiles that left it, and tiles whose
//! photo or geometry changed in place (after a reseed, list swap or breakpoint
//! change). Panning inside a window produces an empty plan; the offset is
//! applied as a single container transform instead.

use std::collections::HashMap;

use super::cache::{TileCache, TileKey};
use crate::layout::{cell_rect, GridConfig};
use crate::types::{CellCoordinate, CellRange, PhotoRecord, ScrollOffset, ViewportSize};

/// Image loading progress of one mounted tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Mounted, image not requested yet (not near the viewport).
    Pending,
    /// `src` assigned, waiting for the load/error event.
    Loading,
    Loaded,
    /// The image failed; only this tile shows the failure.
    Failed,
}

/// Lattice-space placement of a cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TileRect {
    pub fn for_cell(cell: CellCoordinate, config: &GridConfig) -> Self {
        let (left, top, width, height) = cell_rect(cell, config);
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether this rect, shifted by `offset`, touches the viewport grown by `margin`.
    fn near_viewport(&self, offset: ScrollOffset, viewport: ViewportSize, margin: f64) -> bool {
        let left = self.left + offset.x;
        let top = self.top + offset.y;
        left < viewport.width + margin
            && left + self.width > -margin
            && top < viewport.height + margin
            && top + self.height > -margin
    }
}

/// A tile the backend must create or update.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub cell: CellCoordinate,
    /// Index into the photo list the plan was built from.
    pub photo_index: usize,
    pub photo: PhotoRecord,
    pub rect: TileRect,
    /// The photo differs from what was mounted before; drop the old image.
    pub reload: bool,
}

/// Changes needed to bring the mounted tiles in line with the window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    pub added: Vec<PlacedTile>,
    pub changed: Vec<PlacedTile>,
    pub removed: Vec<CellCoordinate>,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct MountedTile {
    photo_index: usize,
    rect: TileRect,
    load: LoadState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SyncKey {
    range: Option<CellRange>,
    seed: u32,
    generation: u64,
    config: GridConfig,
}

/// CSS transform that places the tile layer for `offset`.
pub fn container_transform(offset: ScrollOffset) -> String {
    format!("translate({}px, {}px)", offset.x, offset.y)
}

/// Mount-state tracker for the visible window.
#[derive(Debug, Default)]
pub struct GridRenderer {
    mounted: HashMap<CellCoordinate, MountedTile>,
    cache: TileCache,
    last_sync: Option<SyncKey>,
}

impl GridRenderer {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            mounted: HashMap::new(),
            cache: TileCache::new(cache_capacity),
            last_sync: None,
        }
    }

    /// Reconcile mounted tiles with `range`.
    ///
    /// `generation` must change whenever `photos` is replaced. Cells resolve to
    /// nothing when `photos` is empty, so an empty list unmounts everything.
    pub fn sync(
        &mut self,
        range: Option<CellRange>,
        photos: &[PhotoRecord],
        generation: u64,
        seed: u32,
        config: &GridConfig,
    ) -> RenderPlan {
        let key = SyncKey {
            range,
            seed,
            generation,
            config: *config,
        };
        if self.last_sync == Some(key) {
            return RenderPlan::default();
        }
        let generation_changed = self
            .last_sync
            .is_some_and(|last| last.generation != generation);
        if generation_changed || self.last_sync.is_some_and(|last| last.seed != seed) {
            self.cache.clear();
        }
        self.last_sync = Some(key);

        let mut plan = RenderPlan::default();
        let mut next: HashMap<CellCoordinate, MountedTile> =
            HashMap::with_capacity(range.map_or(0, |r| usize::try_from(r.len()).unwrap_or(0)));

        for cell in range.iter().flat_map(CellRange::iter) {
            let tile_key = TileKey {
                cell,
                seed,
                generation,
            };
            let Some(photo_index) = self.cache.index_for(tile_key, photos.len()) else {
                continue;
            };
            let Some(photo) = photos.get(photo_index) else {
                continue;
            };
            let rect = TileRect::for_cell(cell, config);

            let mounted = match self.mounted.remove(&cell) {
                None => {
                    plan.added.push(PlacedTile {
                        cell,
                        photo_index,
                        photo: photo.clone(),
                        rect,
                        reload: false,
                    });
                    MountedTile {
                        photo_index,
                        rect,
                        load: LoadState::Pending,
                    }
                }
                Some(prev) => {
                    // A new generation may put a different photo at the same index.
                    let reload = prev.photo_index != photo_index || generation_changed;
                    if reload || prev.rect != rect {
                        plan.changed.push(PlacedTile {
                            cell,
                            photo_index,
                            photo: photo.clone(),
                            rect,
                            reload,
                        });
                    }
                    MountedTile {
                        photo_index,
                        rect,
                        load: if reload { LoadState::Pending } else { prev.load },
                    }
                }
            };
            next.insert(cell, mounted);
        }

        plan.removed = self.mounted.drain().map(|(cell, _)| cell).collect();
        plan.removed.sort_unstable();
        self.mounted = next;

        tracing::trace!(
            added = plan.added.len(),
            changed = plan.changed.len(),
            removed = plan.removed.len(),
            mounted = self.mounted.len(),
            "grid window synced"
        );
        plan
    }

    /// Mounted tiles near the viewport whose image has not been requested yet.
    ///
    /// The returned cells move to [`LoadState::Loading`]; the caller is expected
    /// to assign their `src` and later report [`mark_loaded`](Self::mark_loaded)
    /// or [`mark_failed`](Self::mark_failed).
    pub fn tiles_to_load(
        &mut self,
        offset: ScrollOffset,
        viewport: ViewportSize,
        margin: f64,
    ) -> Vec<CellCoordinate> {
        if !viewport.is_renderable() {
            return Vec::new();
        }
        let mut cells: Vec<CellCoordinate> = self
            .mounted
            .iter_mut()
            .filter(|(_, tile)| {
                tile.load == LoadState::Pending && tile.rect.near_viewport(offset, viewport, margin)
            })
            .map(|(cell, tile)| {
                tile.load = LoadState::Loading;
                *cell
            })
            .collect();
        cells.sort_unstable();
        cells
    }

    /// Record a finished image load. Returns false if the cell is no longer mounted.
    pub fn mark_loaded(&mut self, cell: CellCoordinate) -> bool {
        self.set_load_state(cell, LoadState::Loaded)
    }

    /// Record a failed image load. Returns false if the cell is no longer mounted.
    pub fn mark_failed(&mut self, cell: CellCoordinate) -> bool {
        self.set_load_state(cell, LoadState::Failed)
    }

    pub fn load_state(&self, cell: CellCoordinate) -> Option<LoadState> {
        self.mounted.get(&cell).map(|tile| tile.load)
    }

    /// Photo index currently mounted at `cell`.
    pub fn mounted_photo(&self, cell: CellCoordinate) -> Option<usize> {
        self.mounted.get(&cell).map(|tile| tile.photo_index)
    }

    pub fn mounted_len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_mounted(&self, cell: CellCoordinate) -> bool {
        self.mounted.contains_key(&cell)
    }

    /// Cached photo index for `cell`, resolving on a miss.
    pub fn resolve_index(
        &mut self,
        cell: CellCoordinate,
        seed: u32,
        generation: u64,
        len: usize,
    ) -> Option<usize> {
        self.cache.index_for(
            TileKey {
                cell,
                seed,
                generation,
            },
            len,
        )
    }

    pub fn cache_stats(&self) -> (u64, u64) {
        self.cache.stats()
    }

    /// Drop memoized assignments; mounted tiles are untouched.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Forget everything mounted; the next sync re-adds the whole window.
    pub fn clear(&mut self) -> Vec<CellCoordinate> {
        self.last_sync = None;
        self.cache.clear();
        let mut cells: Vec<_> = self.mounted.drain().map(|(cell, _)| cell).collect();
        cells.sort_unstable();
        cells
    }

    fn set_load_state(&mut self, cell: CellCoordinate, state: LoadState) -> bool {
        match self.mounted.get_mut(&cell) {
            Some(tile) => {
                tile.load = state;
                true
            }
            None => false,
        }
    }
}
