use serde::{Deserialize, Serialize};

/// A pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pan offset of the grid origin relative to the viewport, in pixels.
///
/// Positive `x` moves the grid right (revealing columns with negative index).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollOffset {
    pub x: f64,
    pub y: f64,
}

impl ScrollOffset {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset that keeps `point` at the same lattice position as `anchor`.
    pub fn from_anchor(point: Point, anchor: Point) -> Self {
        Self::new(point.x - anchor.x, point.y - anchor.y)
    }

    /// Anchor for a press at `point` while the grid sits at this offset.
    pub fn anchor_for(self, point: Point) -> Point {
        Point::new(point.x - self.x, point.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size of the visible surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A viewport with no area (or garbage dimensions) shows nothing.
    pub fn is_renderable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Position of a cell in the unbounded lattice. Either index may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoordinate {
    pub row: i64,
    pub col: i64,
}

impl CellCoordinate {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

/// Inclusive rectangle of lattice cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellRange {
    pub first_row: i64,
    pub last_row: i64,
    pub first_col: i64,
    pub last_col: i64,
}

impl CellRange {
    pub const fn new(first_row: i64, last_row: i64, first_col: i64, last_col: i64) -> Self {
        Self {
            first_row,
            last_row,
            first_col,
            last_col,
        }
    }

    /// Number of rows spanned (0 for an inverted range).
    pub fn row_count(&self) -> u64 {
        span(self.first_row, self.last_row)
    }

    /// Number of columns spanned (0 for an inverted range).
    pub fn col_count(&self) -> u64 {
        span(self.first_col, self.last_col)
    }

    /// Total number of cells.
    pub fn len(&self) -> u64 {
        self.row_count().saturating_mul(self.col_count())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, cell: CellCoordinate) -> bool {
        (self.first_row..=self.last_row).contains(&cell.row)
            && (self.first_col..=self.last_col).contains(&cell.col)
    }

    /// Cells in row-major order: top to bottom, left to right.
    pub fn iter(&self) -> impl Iterator<Item = CellCoordinate> {
        let (first_col, last_col) = (self.first_col, self.last_col);
        (self.first_row..=self.last_row)
            .flat_map(move |row| (first_col..=last_col).map(move |col| CellCoordinate::new(row, col)))
    }
}

fn span(first: i64, last: i64) -> u64 {
    if last < first {
        0
    } else {
        last.abs_diff(first).saturating_add(1)
    }
}
