//! Breakpoint-driven cell geometry.

use serde::{Deserialize, Serialize};

/// Default quiet period before a resize is allowed to change the geometry.
pub const RESIZE_DEBOUNCE_MS: f64 = 100.0;

/// Cell geometry for one viewport-width band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConfig {
    /// Nominal column count for the band (the lattice itself is unbounded).
    pub columns: u32,
    pub cell_width: f64,
    pub cell_height: f64,
    pub gap: f64,
}

impl GridConfig {
    pub const fn new(columns: u32, cell_width: f64, cell_height: f64, gap: f64) -> Self {
        Self {
            columns,
            cell_width,
            cell_height,
            gap,
        }
    }

    /// Resolve the geometry for a viewport width.
    ///
    /// Total: any width, including NaN, maps to some band. The 1440 band
    /// currently matches the fallback.
    #[allow(clippy::if_same_then_else)]
    pub fn for_viewport_width(width: f64) -> Self {
        if width <= 480.0 {
            Self::new(3, 180.0, 270.0, 15.0)
        } else if width <= 768.0 {
            Self::new(5, 220.0, 330.0, 20.0)
        } else if width >= 2560.0 {
            Self::new(8, 400.0, 600.0, 40.0)
        } else if width >= 1920.0 {
            Self::new(7, 300.0, 450.0, 30.0)
        } else if width >= 1440.0 {
            Self::new(7, 280.0, 420.0, 25.0)
        } else {
            Self::new(7, 280.0, 420.0, 25.0)
        }
    }

    /// Distance between the origins of adjacent cells: `(cell_width + gap, cell_height + gap)`.
    pub fn pitch(&self) -> (f64, f64) {
        (self.cell_width + self.gap, self.cell_height + self.gap)
    }

    /// Whether the pitch can be used to divide lattice space.
    pub fn is_usable(&self) -> bool {
        let (w, h) = self.pitch();
        w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::for_viewport_width(f64::NAN)
    }
}

/// Trailing-edge debounce for viewport resizes.
///
/// Every resize restarts the quiet window; once it elapses, [`poll`](Self::poll)
/// hands back the new geometry if the last width crossed a breakpoint.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay_ms: f64,
    current: GridConfig,
    pending_width: Option<f64>,
    last_resize_ms: f64,
}

impl ResizeDebouncer {
    pub fn new(initial_width: f64, delay_ms: f64) -> Self {
        Self {
            delay_ms: delay_ms.max(0.0),
            current: GridConfig::for_viewport_width(initial_width),
            pending_width: None,
            last_resize_ms: 0.0,
        }
    }

    pub fn current(&self) -> GridConfig {
        self.current
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    /// Whether a resize is waiting for its quiet window.
    pub fn is_pending(&self) -> bool {
        self.pending_width.is_some()
    }

    pub fn note_resize(&mut self, width: f64, now_ms: f64) {
        self.pending_width = Some(width);
        self.last_resize_ms = now_ms;
    }

    /// Milliseconds left until the pending resize may be applied.
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.pending_width
            .map(|_| (self.delay_ms - (now_ms - self.last_resize_ms)).max(0.0))
    }

    /// Apply the pending resize if the quiet window has elapsed.
    ///
    /// Returns the new geometry only when it differs from the current one.
    pub fn poll(&mut self, now_ms: f64) -> Option<GridConfig> {
        let width = self.pending_width?;
        if now_ms - self.last_resize_ms < self.delay_ms {
            return None;
        }
        self.pending_width = None;
        let next = GridConfig::for_viewport_width(width);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}
