//! Frame and timer scheduling for `PhotoGridView`.
//!
//! Includes the single-outstanding animation frame used to commit coalesced
//! touch/wheel input and the resize debounce timeout.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use super::{now_ms, PhotoGridView, SharedState};

#[cfg(target_arch = "wasm32")]
impl PhotoGridView {
    /// Ask for an animation frame unless one is already outstanding.
    pub(crate) fn request_frame(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.destroyed || s.frame_id.is_some() {
            return;
        }
        if s.frame_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move |timestamp: f64| {
                if let Some(state) = weak_state.upgrade() {
                    PhotoGridView::handle_frame(&state, timestamp);
                }
            }) as Box<dyn FnMut(f64)>);
            s.frame_closure = Some(closure);
        }
        let Some(callback) = s.frame_closure.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(id) => s.frame_id = Some(id),
            Err(_) => s.frame_id = None,
        }
    }

    pub(crate) fn handle_frame(state: &Rc<RefCell<SharedState>>, timestamp: f64) {
        let mut s = state.borrow_mut();
        s.frame_id = None;
        if s.destroyed {
            return;
        }
        if s.session.controller_mut().on_animation_frame(timestamp).is_some() {
            Self::render_state(&mut s);
        }
    }

    /// (Re)arm the resize debounce timer for the time left in the quiet window.
    pub(crate) fn schedule_resize_timeout(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        // Cancel any existing timer
        if let Some(timer_id) = s.resize_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.destroyed {
            return;
        }
        let Some(remaining) = s.session.resize_remaining_ms(now_ms()) else {
            return;
        };
        if s.resize_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    PhotoGridView::handle_resize_timeout(&state);
                }
            }) as Box<dyn FnMut()>);
            s.resize_closure = Some(closure);
        }
        let Some(callback) = s.resize_closure.as_ref() else {
            return;
        };
        #[allow(clippy::cast_possible_truncation)]
        let delay = remaining.ceil().min(f64::from(i32::MAX)) as i32;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(id) => s.resize_timer = Some(id),
            Err(_) => s.resize_timer = None,
        }
    }

    pub(crate) fn handle_resize_timeout(state: &Rc<RefCell<SharedState>>) {
        let mut s = state.borrow_mut();
        s.resize_timer = None;
        if s.destroyed {
            return;
        }
        let now = now_ms();
        if s.session.poll_resize(now).is_some() {
            Self::render_state(&mut s);
        } else if s.session.resize_remaining_ms(now).is_some_and(|ms| ms > 0.0) {
            // Still resizing, reschedule
            drop(s);
            Self::schedule_resize_timeout(state);
        }
    }
}
