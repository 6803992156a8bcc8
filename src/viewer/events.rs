//! Pointer, wheel, click, resize and image event handlers for `PhotoGridView`.
//!
//! All methods here are `pub(crate)` helpers called from the listeners
//! registered in `mod.rs`. Coordinates are relative to the grid surface.

#[cfg(target_arch = "wasm32")]
use js_sys::{Array, Function};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{Event, WheelEvent};

#[cfg(target_arch = "wasm32")]
use super::{now_ms, PhotoGridView, SharedState};
#[cfg(target_arch = "wasm32")]
use crate::input::{MoveOutcome, PointerKind};
#[cfg(target_arch = "wasm32")]
use crate::render::dom::cell_from_image;
#[cfg(target_arch = "wasm32")]
use crate::render::{LoadState, TileSurface};
#[cfg(target_arch = "wasm32")]
use crate::types::{PhotoRecord, Point, ViewportSize};

/// Pixels per line for `DOM_DELTA_LINE` wheel events.
#[cfg(target_arch = "wasm32")]
const WHEEL_LINE_PX: f64 = 16.0;

#[cfg(target_arch = "wasm32")]
impl PhotoGridView {
    pub(crate) fn internal_pointer_down(
        state: &Rc<RefCell<SharedState>>,
        x: f64,
        y: f64,
        kind: PointerKind,
    ) {
        let mut s = state.borrow_mut();
        if s.destroyed {
            return;
        }
        s.session
            .controller_mut()
            .on_pointer_down(Point::new(x, y), kind, now_ms());
        let _ = s.surface.surface().style().set_property("cursor", "grabbing");
    }

    pub(crate) fn internal_pointer_move(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        let outcome = {
            let mut s = state.borrow_mut();
            if s.destroyed {
                return;
            }
            let outcome = s
                .session
                .controller_mut()
                .on_pointer_move(Point::new(x, y), now_ms());
            if let MoveOutcome::Committed(_) = outcome {
                Self::render_state(&mut s);
            }
            outcome
        };
        if outcome.needs_frame() {
            Self::request_frame(state);
        }
    }

    pub(crate) fn internal_pointer_up(state: &Rc<RefCell<SharedState>>) {
        let mut s = state.borrow_mut();
        if s.destroyed {
            return;
        }
        s.session.controller_mut().on_pointer_up(now_ms());
        let _ = s.surface.surface().style().set_property("cursor", "grab");
    }

    pub(crate) fn internal_wheel(state: &Rc<RefCell<SharedState>>, event: &WheelEvent) {
        let outcome = {
            let mut s = state.borrow_mut();
            if s.destroyed {
                return;
            }
            let scale = match event.delta_mode() {
                WheelEvent::DOM_DELTA_LINE => WHEEL_LINE_PX,
                WheelEvent::DOM_DELTA_PAGE => s.session.viewport().height,
                _ => 1.0,
            };
            s.session.controller_mut().on_wheel(
                event.delta_x() * scale,
                event.delta_y() * scale,
                now_ms(),
            )
        };
        if outcome.needs_frame() {
            Self::request_frame(state);
        }
    }

    pub(crate) fn internal_click(state: &Rc<RefCell<SharedState>>, x: f64, y: f64) {
        let (photo, callback) = {
            let mut s = state.borrow_mut();
            if s.destroyed {
                return;
            }
            let Some(callback) = s.click_callback.clone() else {
                return;
            };
            (s.session.click(Point::new(x, y), now_ms()), callback)
        };
        if let Some(photo) = photo {
            Self::invoke_click_callback(&callback, &photo);
        }
    }

    pub(crate) fn invoke_click_callback(callback: &Function, photo: &PhotoRecord) {
        let value = match serde_wasm_bindgen::to_value(photo) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize clicked photo");
                return;
            }
        };
        let details = Array::new();
        for (label, text) in photo.detail_rows() {
            let row = Array::of2(&JsValue::from_str(label), &JsValue::from_str(&text));
            details.push(&row);
        }
        let _ = callback.call2(&JsValue::NULL, &value, &details);
    }

    pub(crate) fn internal_window_resize(state: &Rc<RefCell<SharedState>>) {
        let viewport = {
            let s = state.borrow();
            if s.destroyed {
                return;
            }
            let (width, height) = s.surface.client_size();
            ViewportSize::new(width, height)
        };
        Self::internal_resize(state, viewport);
    }

    /// Apply a new viewport now and arm the debounce for the geometry change.
    pub(crate) fn internal_resize(state: &Rc<RefCell<SharedState>>, viewport: ViewportSize) {
        {
            let mut s = state.borrow_mut();
            if s.destroyed {
                return;
            }
            s.session.resize(viewport, now_ms());
            Self::render_state(&mut s);
        }
        Self::schedule_resize_timeout(state);
    }

    pub(crate) fn internal_image_event(state: &Rc<RefCell<SharedState>>, event: &Event, loaded: bool) {
        let Some(cell) = event
            .target()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
            .and_then(|element| cell_from_image(&element))
        else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.destroyed {
            return;
        }
        let (mounted, load_state) = if loaded {
            (s.session.mark_loaded(cell), LoadState::Loaded)
        } else {
            (s.session.mark_failed(cell), LoadState::Failed)
        };
        if mounted {
            s.surface.show_load_state(cell, load_state);
        }
    }
}
