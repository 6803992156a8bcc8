//! Press/drag/release tracking used for click suppression.

use crate::types::{Point, ScrollOffset};

/// Pointer travel (px) at or above which a press counts as a drag.
pub const CLICK_THRESHOLD_PX: f64 = 5.0;

/// How long (ms) a released drag keeps reporting its distance.
pub const DRAG_SETTLE_MS: f64 = 150.0;

/// Lifecycle of one pointer session.
///
/// `Idle -> Pressed -> (Dragging | Released) -> Idle`. A `Released` phase turns
/// back into `Idle` once the settle window has passed; that transition is
/// evaluated lazily by [`DragPhase::settle`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer is down but has not moved past the click threshold.
    Pressed {
        anchor: Point,
        origin: Point,
        distance: f64,
    },
    Dragging {
        anchor: Point,
        origin: Point,
        distance: f64,
    },
    /// Pointer released; `distance` stays observable until the window ends.
    Released { distance: f64, released_at_ms: f64 },
}

impl DragPhase {
    /// Start a session at `point` with the grid at `offset`.
    pub fn press(point: Point, offset: ScrollOffset) -> Self {
        DragPhase::Pressed {
            anchor: offset.anchor_for(point),
            origin: point,
            distance: 0.0,
        }
    }

    /// Fold a pointer position into the session.
    ///
    /// The distance is the largest displacement from the press point seen so
    /// far, so moving back toward the origin never turns a drag into a click.
    #[must_use]
    pub fn track(self, point: Point, threshold: f64) -> Self {
        match self {
            DragPhase::Pressed {
                anchor,
                origin,
                distance,
            }
            | DragPhase::Dragging {
                anchor,
                origin,
                distance,
            } => {
                let distance = distance.max(origin.distance(point));
                if distance >= threshold {
                    DragPhase::Dragging {
                        anchor,
                        origin,
                        distance,
                    }
                } else {
                    DragPhase::Pressed {
                        anchor,
                        origin,
                        distance,
                    }
                }
            }
            other => other,
        }
    }

    /// End the session. Releasing without an active session changes nothing.
    #[must_use]
    pub fn release(self, now_ms: f64) -> Self {
        match self {
            DragPhase::Pressed { distance, .. } | DragPhase::Dragging { distance, .. } => {
                DragPhase::Released {
                    distance,
                    released_at_ms: now_ms,
                }
            }
            other => other,
        }
    }

    /// Apply the timed `Released -> Idle` transition.
    #[must_use]
    pub fn settle(self, now_ms: f64, settle_ms: f64) -> Self {
        match self {
            DragPhase::Released { released_at_ms, .. } if now_ms - released_at_ms >= settle_ms => {
                DragPhase::Idle
            }
            other => other,
        }
    }

    /// Accumulated distance; zero when idle.
    pub fn distance(&self) -> f64 {
        match *self {
            DragPhase::Idle => 0.0,
            DragPhase::Pressed { distance, .. }
            | DragPhase::Dragging { distance, .. }
            | DragPhase::Released { distance, .. } => distance,
        }
    }

    /// `press point - offset at press` while the pointer is down.
    pub fn anchor(&self) -> Option<Point> {
        match *self {
            DragPhase::Pressed { anchor, .. } | DragPhase::Dragging { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    /// Whether the pointer is currently down.
    pub fn is_active(&self) -> bool {
        matches!(self, DragPhase::Pressed { .. } | DragPhase::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_records_anchor() {
        let phase = DragPhase::press(Point::new(100.0, 50.0), ScrollOffset::new(30.0, -20.0));
        assert_eq!(phase.anchor(), Some(Point::new(70.0, 70.0)));
        assert!(phase.distance().abs() < f64::EPSILON);
    }

    #[test]
    fn test_small_move_stays_pressed() {
        let phase = DragPhase::press(Point::new(0.0, 0.0), ScrollOffset::ORIGIN)
            .track(Point::new(3.0, 0.0), CLICK_THRESHOLD_PX);
        assert!(matches!(phase, DragPhase::Pressed { .. }));
    }

    #[test]
    fn test_distance_is_max_displacement() {
        let phase = DragPhase::press(Point::new(0.0, 0.0), ScrollOffset::ORIGIN)
            .track(Point::new(30.0, 40.0), CLICK_THRESHOLD_PX)
            .track(Point::new(1.0, 1.0), CLICK_THRESHOLD_PX);
        assert!(matches!(phase, DragPhase::Dragging { .. }));
        assert!((phase.distance() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_release_then_settle() {
        let phase = DragPhase::press(Point::new(0.0, 0.0), ScrollOffset::ORIGIN)
            .track(Point::new(10.0, 0.0), CLICK_THRESHOLD_PX)
            .release(1_000.0);
        assert!((phase.settle(1_100.0, DRAG_SETTLE_MS).distance() - 10.0).abs() < 1e-9);
        assert_eq!(phase.settle(1_150.0, DRAG_SETTLE_MS), DragPhase::Idle);
    }

    #[test]
    fn test_release_without_press_is_noop() {
        assert_eq!(DragPhase::Idle.release(5.0), DragPhase::Idle);
        assert_eq!(
            DragPhase::Idle.track(Point::new(9.0, 9.0), CLICK_THRESHOLD_PX),
            DragPhase::Idle
        );
    }
}
