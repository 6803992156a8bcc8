//! Platform-independent grid state.
//!
//! `GridSession` wires the scroll controller, geometry, photo list and renderer
//! together. The wasm viewer drives it from DOM events; tests and the CLI drive
//! it directly.

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;

use crate::input::{ScrollController, Subscription};
use crate::layout::{hit_test, GridConfig, ResizeDebouncer, VisibleWindow};
use crate::options::GridOptions;
use crate::render::{GridRenderer, PlacedTile, RenderPlan, TileRect};
use crate::types::{CellCoordinate, CellRange, PhotoList, PhotoRecord, Point, ScrollOffset, ViewportSize};

/// Grid state for one mounted viewport.
#[derive(Debug)]
pub struct GridSession {
    controller: ScrollController,
    viewport: ViewportSize,
    resize: ResizeDebouncer,
    config: GridConfig,
    window: VisibleWindow,
    photos: PhotoList,
    generation: u64,
    seed: u32,
    renderer: GridRenderer,
    options: GridOptions,
    /// Set by the controller observer on every committed offset.
    offset_dirty: Rc<Cell<bool>>,
    layout_dirty: bool,
    offset_subscription: Subscription,
}

impl GridSession {
    pub fn new(viewport: ViewportSize, options: GridOptions) -> Self {
        let options = options.sanitized();
        let resize = ResizeDebouncer::new(viewport.width, options.resize_debounce_ms);
        let config = resize.current();
        let mut controller = ScrollController::new(options.scroll_settings());
        let offset_dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&offset_dirty);
        let offset_subscription = controller.subscribe(move |_: ScrollOffset| flag.set(true));

        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            columns = config.columns,
            "grid session created"
        );

        Self {
            controller,
            viewport,
            resize,
            config,
            window: VisibleWindow::new(options.buffer_cells, options.max_cells),
            photos: PhotoList::from(Vec::new()),
            generation: 0,
            seed: options.seed,
            renderer: GridRenderer::new(options.tile_cache_capacity),
            options,
            offset_dirty,
            layout_dirty: true,
            offset_subscription,
        }
    }

    pub fn controller(&self) -> &ScrollController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ScrollController {
        &mut self.controller
    }

    /// Replace the photo list. Every cell is re-resolved on the next refresh.
    pub fn set_photos(&mut self, photos: impl Into<PhotoList>) {
        self.photos = photos.into();
        self.generation = self.generation.wrapping_add(1);
        self.renderer.clear_cache();
        self.layout_dirty = true;
        tracing::debug!(
            count = self.photos.len(),
            generation = self.generation,
            "photo list replaced"
        );
    }

    /// Switch to a new assignment seed. Returns false if `seed` is already active.
    pub fn reseed(&mut self, seed: u32) -> bool {
        if seed == self.seed {
            return false;
        }
        self.seed = seed;
        self.renderer.clear_cache();
        self.layout_dirty = true;
        tracing::debug!(seed, "grid reseeded");
        true
    }

    /// Record a new viewport size. Geometry follows once the debounce elapses.
    pub fn resize(&mut self, viewport: ViewportSize, now_ms: f64) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.layout_dirty = true;
        }
        self.resize.note_resize(viewport.width, now_ms);
    }

    /// Apply a debounced breakpoint change, if one is due.
    pub fn poll_resize(&mut self, now_ms: f64) -> Option<GridConfig> {
        let config = self.resize.poll(now_ms)?;
        tracing::debug!(
            columns = config.columns,
            cell_width = config.cell_width,
            cell_height = config.cell_height,
            gap = config.gap,
            "grid geometry changed"
        );
        self.config = config;
        self.layout_dirty = true;
        Some(config)
    }

    /// Milliseconds until a pending resize may be applied.
    pub fn resize_remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.resize.remaining_ms(now_ms)
    }

    /// Bring mounted tiles in line with the latest committed offset.
    ///
    /// Returns `None` when nothing has changed since the previous refresh.
    pub fn refresh(&mut self) -> Option<RenderPlan> {
        if !self.offset_dirty.replace(false) && !self.layout_dirty {
            return None;
        }
        self.layout_dirty = false;
        let range = self.visible_range();
        Some(
            self.renderer
                .sync(range, &self.photos, self.generation, self.seed, &self.config),
        )
    }

    /// Cell rectangle the window currently covers.
    pub fn visible_range(&self) -> Option<CellRange> {
        self.window
            .range(self.controller.offset(), self.viewport, &self.config)
    }

    /// Mounted tiles that should start loading their image now.
    pub fn tiles_to_load(&mut self) -> Vec<CellCoordinate> {
        let margin = self.lazy_margin();
        self.renderer
            .tiles_to_load(self.controller.offset(), self.viewport, margin)
    }

    pub fn mark_loaded(&mut self, cell: CellCoordinate) -> bool {
        self.renderer.mark_loaded(cell)
    }

    pub fn mark_failed(&mut self, cell: CellCoordinate) -> bool {
        let mounted = self.renderer.mark_failed(cell);
        if mounted {
            let id = self
                .renderer
                .mounted_photo(cell)
                .and_then(|index| self.photos.get(index))
                .map(|photo| photo.id.as_str());
            tracing::warn!(row = cell.row, col = cell.col, photo = ?id, "tile image failed to load");
        }
        mounted
    }

    /// Photo assigned to `cell` under the current seed and list.
    pub fn photo_at_cell(&mut self, cell: CellCoordinate) -> Option<&PhotoRecord> {
        let index = self
            .renderer
            .resolve_index(cell, self.seed, self.generation, self.photos.len())?;
        self.photos.get(index)
    }

    /// Cell under a viewport point; gaps hit nothing.
    pub fn hit_test(&self, point: Point) -> Option<CellCoordinate> {
        hit_test(point, self.controller.offset(), &self.config)
    }

    /// Photo to open for a click at `point`, unless the click ended a drag.
    pub fn click(&mut self, point: Point, now_ms: f64) -> Option<PhotoRecord> {
        if !self.controller.click_allowed(now_ms) {
            tracing::trace!(
                distance = self.controller.drag_distance(now_ms),
                "click suppressed after drag"
            );
            return None;
        }
        let cell = self.hit_test(point)?;
        self.photo_at_cell(cell).cloned()
    }

    /// Snapshot of the current window for debugging and fixtures.
    pub fn snapshot(&mut self) -> WindowSnapshot {
        let range = self.visible_range();
        let mut tiles = Vec::new();
        for cell in range.iter().flat_map(CellRange::iter) {
            let Some(index) =
                self.renderer
                    .resolve_index(cell, self.seed, self.generation, self.photos.len())
            else {
                continue;
            };
            let Some(photo) = self.photos.get(index) else {
                continue;
            };
            let rect = TileRect::for_cell(cell, &self.config);
            tiles.push(TileSnapshot {
                row: cell.row,
                col: cell.col,
                photo_index: index,
                photo_id: photo.id.clone(),
                image_ref: photo.image_ref.clone(),
                left: rect.left,
                top: rect.top,
                width: rect.width,
                height: rect.height,
            });
        }
        WindowSnapshot {
            viewport: self.viewport,
            offset: self.controller.offset(),
            config: self.config,
            seed: self.seed,
            range,
            tiles,
        }
    }

    /// Stop observing the controller and forget all mounted tiles.
    ///
    /// Returns the cells that were mounted so the caller can remove their nodes.
    pub fn teardown(&mut self) -> Vec<CellCoordinate> {
        self.controller.unsubscribe(self.offset_subscription);
        self.controller.reset();
        self.renderer.clear()
    }

    pub fn offset(&self) -> ScrollOffset {
        self.controller.offset()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn photos(&self) -> &PhotoList {
        &self.photos
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn renderer(&self) -> &GridRenderer {
        &self.renderer
    }

    /// Look up what is mounted at `cell`, as last synced.
    pub fn mounted_tile(&self, cell: CellCoordinate) -> Option<PlacedTile> {
        let index = self.renderer.mounted_photo(cell)?;
        let photo = self.photos.get(index)?;
        Some(PlacedTile {
            cell,
            photo_index: index,
            photo: photo.clone(),
            rect: TileRect::for_cell(cell, &self.config),
            reload: false,
        })
    }

    fn lazy_margin(&self) -> f64 {
        self.options.lazy_margin_px.unwrap_or_else(|| {
            let (pitch_x, pitch_y) = self.config.pitch();
            pitch_x.max(pitch_y)
        })
    }
}

/// Serializable description of the visible window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    pub viewport: ViewportSize,
    pub offset: ScrollOffset,
    pub config: GridConfig,
    pub seed: u32,
    pub range: Option<CellRange>,
    pub tiles: Vec<TileSnapshot>,
}

/// One resolved tile of a [`WindowSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub row: i64,
    pub col: i64,
    pub photo_index: usize,
    pub photo_id: String,
    pub image_ref: String,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerKind;

    fn photos(n: usize) -> Vec<PhotoRecord> {
        (0..n)
            .map(|i| PhotoRecord::new(i.to_string(), format!("/p/{i}.jpg")))
            .collect()
    }

    fn session() -> GridSession {
        let mut session = GridSession::new(ViewportSize::new(1920.0, 1080.0), GridOptions::default());
        session.set_photos(photos(12));
        session
    }

    #[test]
    fn test_refresh_only_when_dirty() {
        let mut s = session();
        assert!(s.refresh().is_some_and(|plan| !plan.added.is_empty()));
        assert!(s.refresh().is_none());
        s.controller_mut().scroll_by(10.0, 0.0);
        assert!(s.refresh().is_some());
    }

    #[test]
    fn test_reseed_same_seed_is_noop() {
        let mut s = session();
        s.refresh();
        assert!(!s.reseed(0));
        assert!(s.refresh().is_none());
        assert!(s.reseed(42));
        assert!(s.refresh().is_some());
    }

    #[test]
    fn test_click_after_drag_is_suppressed() {
        let mut s = session();
        s.refresh();
        let ctl = s.controller_mut();
        ctl.on_pointer_down(Point::new(100.0, 100.0), PointerKind::Mouse, 0.0);
        ctl.on_pointer_move(Point::new(150.0, 130.0), 10.0);
        ctl.on_pointer_up(20.0);
        assert!(s.click(Point::new(150.0, 130.0), 25.0).is_none());
        assert!(s.click(Point::new(150.0, 130.0), 500.0).is_some());
    }

    #[test]
    fn test_teardown_returns_mounted_cells() {
        let mut s = session();
        s.refresh();
        let mounted = s.renderer().mounted_len();
        assert!(mounted > 0);
        assert_eq!(s.teardown().len(), mounted);
        assert_eq!(s.controller().observer_count(), 0);
    }
}
