//! Viewport culling over the unbounded cell lattice.
//!
//! Lattice space has its origin at cell (0, 0); a cell at (row, col) occupies
//! `[col * pitch_x, col * pitch_x + cell_width)` horizontally (rows likewise).
//! The scroll offset translates lattice space into viewport space, so the
//! lattice point under viewport pixel `p` is `p - offset`.

use super::GridConfig;
use crate::types::{CellCoordinate, CellRange, Point, ScrollOffset, ViewportSize};

/// Extra rings of cells materialized around the viewport by default.
pub const DEFAULT_BUFFER_CELLS: u32 = 2;

/// Upper bound on materialized cells, regardless of buffer or geometry.
pub const MAX_VISIBLE_CELLS: usize = 200;

/// Culling parameters: buffer ring width and hard cell cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub buffer_cells: u32,
    pub max_cells: usize,
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self {
            buffer_cells: DEFAULT_BUFFER_CELLS,
            max_cells: MAX_VISIBLE_CELLS,
        }
    }
}

impl VisibleWindow {
    pub const fn new(buffer_cells: u32, max_cells: usize) -> Self {
        Self {
            buffer_cells,
            max_cells,
        }
    }

    /// The rectangle of cells to materialize, or `None` when nothing is visible.
    ///
    /// If the buffered rectangle exceeds `max_cells`, the buffer ring shrinks a
    /// cell at a time; if even the bare viewport is too large, the rectangle is
    /// clipped around the viewport centre.
    pub fn range(
        &self,
        offset: ScrollOffset,
        viewport: ViewportSize,
        config: &GridConfig,
    ) -> Option<CellRange> {
        if self.max_cells == 0
            || !viewport.is_renderable()
            || !config.is_usable()
            || !offset.is_finite()
        {
            return None;
        }

        for buffer in (0..=self.buffer_cells).rev() {
            let range = buffered_range(offset, viewport, config, buffer);
            if range.len() <= self.max_cells as u64 {
                return Some(range);
            }
        }

        let bare = buffered_range(offset, viewport, config, 0);
        Some(clip_around_center(bare, offset, viewport, config, self.max_cells))
    }

    /// Every cell of [`range`](Self::range), row-major.
    pub fn cells(
        &self,
        offset: ScrollOffset,
        viewport: ViewportSize,
        config: &GridConfig,
    ) -> Vec<CellCoordinate> {
        self.range(offset, viewport, config)
            .map(|range| range.iter().collect())
            .unwrap_or_default()
    }
}

/// Cells to materialize for `offset`, with `buffer_cells` rings of margin and
/// the default cap of [`MAX_VISIBLE_CELLS`].
pub fn compute_visible_cells(
    offset: ScrollOffset,
    viewport: ViewportSize,
    config: &GridConfig,
    buffer_cells: u32,
) -> Vec<CellCoordinate> {
    VisibleWindow::new(buffer_cells, MAX_VISIBLE_CELLS).cells(offset, viewport, config)
}

/// Lattice-space rectangle `(left, top, width, height)` of a cell.
#[allow(clippy::cast_precision_loss)]
pub fn cell_rect(cell: CellCoordinate, config: &GridConfig) -> (f64, f64, f64, f64) {
    let (pitch_x, pitch_y) = config.pitch();
    (
        cell.col as f64 * pitch_x,
        cell.row as f64 * pitch_y,
        config.cell_width,
        config.cell_height,
    )
}

/// Cell under a viewport point. Points that land in a gap hit nothing.
pub fn hit_test(point: Point, offset: ScrollOffset, config: &GridConfig) -> Option<CellCoordinate> {
    if !point.is_finite() || !offset.is_finite() || !config.is_usable() {
        return None;
    }
    let (pitch_x, pitch_y) = config.pitch();
    let x = point.x - offset.x;
    let y = point.y - offset.y;
    let col_f = (x / pitch_x).floor();
    let row_f = (y / pitch_y).floor();
    if x - col_f * pitch_x >= config.cell_width || y - row_f * pitch_y >= config.cell_height {
        return None;
    }
    Some(CellCoordinate::new(to_index(row_f), to_index(col_f)))
}

fn buffered_range(
    offset: ScrollOffset,
    viewport: ViewportSize,
    config: &GridConfig,
    buffer: u32,
) -> CellRange {
    let (pitch_x, pitch_y) = config.pitch();
    let margin_x = f64::from(buffer) * pitch_x;
    let margin_y = f64::from(buffer) * pitch_y;

    let left = -offset.x - margin_x;
    let right = -offset.x + viewport.width + margin_x;
    let top = -offset.y - margin_y;
    let bottom = -offset.y + viewport.height + margin_y;

    CellRange::new(
        to_index((top / pitch_y).floor()),
        to_index((bottom / pitch_y).ceil()),
        to_index((left / pitch_x).floor()),
        to_index((right / pitch_x).ceil()),
    )
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn clip_around_center(
    range: CellRange,
    offset: ScrollOffset,
    viewport: ViewportSize,
    config: &GridConfig,
    max_cells: usize,
) -> CellRange {
    let (pitch_x, pitch_y) = config.pitch();
    let rows = range.row_count().max(1);
    let cols = range.col_count().max(1);
    let max = max_cells as u64;

    // Scale both axes by the same factor so the clipped window keeps the
    // viewport's aspect, then trim whichever axis is longer until it fits.
    let scale = (max as f64 / rows.saturating_mul(cols) as f64).sqrt();
    let mut keep_rows = ((rows as f64 * scale).floor() as u64).clamp(1, rows);
    let mut keep_cols = ((cols as f64 * scale).floor() as u64).clamp(1, cols);
    while keep_rows * keep_cols > max {
        if keep_rows >= keep_cols && keep_rows > 1 {
            keep_rows -= 1;
        } else if keep_cols > 1 {
            keep_cols -= 1;
        } else {
            break;
        }
    }

    let center_row = to_index(((-offset.y + viewport.height / 2.0) / pitch_y).floor());
    let center_col = to_index(((-offset.x + viewport.width / 2.0) / pitch_x).floor());
    let (first_row, last_row) = centered_span(center_row, keep_rows, range.first_row, range.last_row);
    let (first_col, last_col) = centered_span(center_col, keep_cols, range.first_col, range.last_col);
    CellRange::new(first_row, last_row, first_col, last_col)
}

/// A span of `len` indices centred on `center`, slid back inside `[min, max]`.
#[allow(clippy::cast_possible_wrap)]
fn centered_span(center: i64, len: u64, min: i64, max: i64) -> (i64, i64) {
    let len = len as i64;
    let mut first = center.saturating_sub((len - 1) / 2);
    let mut last = first.saturating_add(len - 1);
    if last > max {
        first = first.saturating_sub(last.saturating_sub(max));
        last = max;
    }
    if first < min {
        last = last.saturating_add(min.saturating_sub(first)).min(max);
        first = min;
    }
    (first, last)
}

// `as` saturates, which is what we want for absurd offsets.
#[allow(clippy::cast_possible_truncation)]
fn to_index(value: f64) -> i64 {
    value as i64
}
