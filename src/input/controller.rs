//! Pan offset ownership and input-to-offset translation.
//!
//! Mouse drags commit on every move. Touch moves and wheel bursts are
//! frame-throttled: each event overwrites a single pending target and the host
//! commits it from its animation frame via [`ScrollController::on_animation_frame`].
//! Committed offsets are pushed to subscribed observers in event order.

use super::drag::{DragPhase, CLICK_THRESHOLD_PX, DRAG_SETTLE_MS};
use super::observer::{ObserverRegistry, OffsetObserver, Subscription};
use crate::types::{Point, ScrollOffset};

/// Pixels of pan per unit of wheel delta.
pub const WHEEL_SENSITIVITY: f64 = 1.2;

/// Input device that started the current pointer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// What a move or wheel event did to the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// The offset was committed and observers notified.
    Committed(ScrollOffset),
    /// A pending target was queued; the host must request an animation frame.
    FrameRequested,
    /// A frame was already outstanding; its target was replaced.
    Coalesced,
    /// No active session or non-finite input.
    Ignored,
}

impl MoveOutcome {
    /// Whether the host needs to schedule an animation frame.
    pub fn needs_frame(&self) -> bool {
        matches!(self, MoveOutcome::FrameRequested)
    }
}

/// Tunables for [`ScrollController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSettings {
    pub wheel_sensitivity: f64,
    pub click_threshold_px: f64,
    pub settle_ms: f64,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            wheel_sensitivity: WHEEL_SENSITIVITY,
            click_threshold_px: CLICK_THRESHOLD_PX,
            settle_ms: DRAG_SETTLE_MS,
        }
    }
}

/// Owner of the pan offset and the drag session.
#[derive(Debug, Default)]
pub struct ScrollController {
    offset: ScrollOffset,
    pending: Option<ScrollOffset>,
    phase: DragPhase,
    pointer: PointerKind,
    settings: ScrollSettings,
    observers: ObserverRegistry,
}

impl ScrollController {
    pub fn new(settings: ScrollSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> ScrollSettings {
        self.settings
    }

    /// Start a pointer session. Any queued frame update is discarded.
    pub fn on_pointer_down(&mut self, point: Point, kind: PointerKind, _now_ms: f64) {
        if !point.is_finite() {
            return;
        }
        self.cancel_pending_frame();
        self.pointer = kind;
        self.phase = DragPhase::press(point, self.offset);
    }

    pub fn on_pointer_move(&mut self, point: Point, _now_ms: f64) -> MoveOutcome {
        let Some(anchor) = self.phase.anchor() else {
            return MoveOutcome::Ignored;
        };
        if !point.is_finite() {
            return MoveOutcome::Ignored;
        }
        self.phase = self.phase.track(point, self.settings.click_threshold_px);
        let candidate = ScrollOffset::from_anchor(point, anchor);
        match self.pointer {
            PointerKind::Mouse => {
                self.commit(candidate);
                MoveOutcome::Committed(candidate)
            }
            PointerKind::Touch => self.queue(candidate),
        }
    }

    /// End the pointer session; also used for pointer-leave and touch-cancel.
    pub fn on_pointer_up(&mut self, now_ms: f64) {
        self.phase = self.phase.release(now_ms);
    }

    /// Pan by a wheel delta. Bursts accumulate on the pending target.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, _now_ms: f64) -> MoveOutcome {
        if !delta_x.is_finite() || !delta_y.is_finite() {
            return MoveOutcome::Ignored;
        }
        let base = self.pending.unwrap_or(self.offset);
        let k = self.settings.wheel_sensitivity;
        self.queue(ScrollOffset::new(base.x - delta_x * k, base.y - delta_y * k))
    }

    /// Commit the pending target, if any. The single commit point for
    /// frame-throttled input.
    pub fn on_animation_frame(&mut self, _now_ms: f64) -> Option<ScrollOffset> {
        let target = self.pending.take()?;
        self.commit(target);
        Some(target)
    }

    /// Jump to `offset` immediately, dropping any queued update.
    pub fn set_offset(&mut self, offset: ScrollOffset) {
        if !offset.is_finite() {
            return;
        }
        self.pending = None;
        self.commit(offset);
    }

    /// Pan by `(dx, dy)` immediately, starting from the newest known target.
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }
        let base = self.pending.take().unwrap_or(self.offset);
        self.commit(ScrollOffset::new(base.x + dx, base.y + dy));
    }

    pub fn cancel_pending_frame(&mut self) {
        self.pending = None;
    }

    /// Last committed offset.
    pub fn offset(&self) -> ScrollOffset {
        self.offset
    }

    pub fn pending_offset(&self) -> Option<ScrollOffset> {
        self.pending
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    /// Drag phase as of `now_ms`, with the settle window applied.
    pub fn phase(&self, now_ms: f64) -> DragPhase {
        self.phase.settle(now_ms, self.settings.settle_ms)
    }

    pub fn drag_distance(&self, now_ms: f64) -> f64 {
        self.phase(now_ms).distance()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    /// Whether a click at `now_ms` should reach the photo under the pointer.
    pub fn click_allowed(&self, now_ms: f64) -> bool {
        self.drag_distance(now_ms) < self.settings.click_threshold_px
    }

    pub fn subscribe<O>(&mut self, observer: O) -> Subscription
    where
        O: OffsetObserver + 'static,
    {
        self.observers.subscribe(Box::new(observer))
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Drop observers and queued work; the offset is kept.
    pub fn reset(&mut self) {
        self.pending = None;
        self.phase = DragPhase::Idle;
        self.observers.clear();
    }

    fn queue(&mut self, target: ScrollOffset) -> MoveOutcome {
        let outcome = if self.pending.is_some() {
            MoveOutcome::Coalesced
        } else {
            MoveOutcome::FrameRequested
        };
        self.pending = Some(target);
        outcome
    }

    /// Publish `offset`. A queued target is older than any commit, so it is dropped.
    fn commit(&mut self, offset: ScrollOffset) {
        self.pending = None;
        self.offset = offset;
        self.observers.notify(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_drag_commits_immediately() {
        let mut ctl = ScrollController::default();
        ctl.on_pointer_down(Point::new(100.0, 100.0), PointerKind::Mouse, 0.0);
        let outcome = ctl.on_pointer_move(Point::new(150.0, 130.0), 16.0);
        assert_eq!(outcome, MoveOutcome::Committed(ScrollOffset::new(50.0, 30.0)));
        assert_eq!(ctl.offset(), ScrollOffset::new(50.0, 30.0));
        assert!(ctl.is_dragging());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut ctl = ScrollController::default();
        assert_eq!(ctl.on_pointer_move(Point::new(5.0, 5.0), 0.0), MoveOutcome::Ignored);
        assert_eq!(ctl.offset(), ScrollOffset::ORIGIN);
    }

    #[test]
    fn test_touch_moves_coalesce() {
        let mut ctl = ScrollController::default();
        ctl.on_pointer_down(Point::new(0.0, 0.0), PointerKind::Touch, 0.0);
        assert_eq!(ctl.on_pointer_move(Point::new(10.0, 0.0), 1.0), MoveOutcome::FrameRequested);
        assert_eq!(ctl.on_pointer_move(Point::new(20.0, 0.0), 2.0), MoveOutcome::Coalesced);
        assert_eq!(ctl.offset(), ScrollOffset::ORIGIN);
        assert_eq!(ctl.on_animation_frame(16.0), Some(ScrollOffset::new(20.0, 0.0)));
        assert_eq!(ctl.on_animation_frame(32.0), None);
    }

    #[test]
    fn test_wheel_accumulates_on_pending_target() {
        let mut ctl = ScrollController::default();
        ctl.on_wheel(0.0, 10.0, 0.0);
        ctl.on_wheel(0.0, 10.0, 1.0);
        let committed = ctl.on_animation_frame(16.0);
        assert_eq!(committed, Some(ScrollOffset::new(0.0, -24.0)));
    }

    #[test]
    fn test_non_finite_wheel_is_ignored() {
        let mut ctl = ScrollController::default();
        assert_eq!(ctl.on_wheel(f64::NAN, 1.0, 0.0), MoveOutcome::Ignored);
        assert!(!ctl.has_pending_frame());
    }

    #[test]
    fn test_pointer_down_discards_pending_frame() {
        let mut ctl = ScrollController::default();
        ctl.on_wheel(5.0, 5.0, 0.0);
        ctl.on_pointer_down(Point::new(1.0, 1.0), PointerKind::Mouse, 1.0);
        assert!(!ctl.has_pending_frame());
    }

    #[test]
    fn test_observers_see_commits_in_order() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut ctl = ScrollController::default();
        ctl.subscribe(move |o: ScrollOffset| sink.borrow_mut().push(o));
        ctl.set_offset(ScrollOffset::new(1.0, 1.0));
        ctl.scroll_by(2.0, -1.0);
        assert_eq!(
            *seen.borrow(),
            vec![ScrollOffset::new(1.0, 1.0), ScrollOffset::new(3.0, 0.0)]
        );
    }
}
