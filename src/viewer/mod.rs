//! Main PhotoGridView struct - the primary entry point for the browser grid.
//!
//! This module provides the WASM-exported `PhotoGridView` struct that handles:
//! - Mounting the tile surface into a host container
//! - Feeding mouse, touch, wheel and resize events into the grid session
//! - Scheduling animation frames and the resize debounce timer
//! - Reporting photo clicks back to JavaScript
//!
//! Event listeners are registered when the view is created and removed again by
//! `destroy()` (or when the JS object is freed), so no manual wiring is needed.

#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
pub mod logging;
#[cfg(target_arch = "wasm32")]
mod scroll;

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::{Rc, Weak};
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{AddEventListenerOptions, Event, EventTarget, HtmlElement, MouseEvent, TouchEvent, WheelEvent};

#[cfg(target_arch = "wasm32")]
use crate::input::PointerKind;
#[cfg(target_arch = "wasm32")]
use crate::options::GridOptions;
#[cfg(target_arch = "wasm32")]
use crate::render::{DomSurface, TileSurface};
#[cfg(target_arch = "wasm32")]
use crate::session::GridSession;
#[cfg(target_arch = "wasm32")]
use crate::types::{parse_api_photo_list, parse_photo_list, ApiPhoto, PhotoRecord, ViewportSize};

/// Shared state that can be accessed by event handlers (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) session: GridSession,
    pub(crate) surface: DomSurface,
    pub(crate) click_callback: Option<Function>,
    /// Id of the single outstanding `requestAnimationFrame`, if any.
    pub(crate) frame_id: Option<i32>,
    pub(crate) frame_closure: Option<Closure<dyn FnMut(f64)>>,
    pub(crate) resize_timer: Option<i32>,
    pub(crate) resize_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) destroyed: bool,
}

// Timing helper for event timestamps.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// A DOM listener registered by the view, kept so it can be removed again.
#[cfg(target_arch = "wasm32")]
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

#[cfg(target_arch = "wasm32")]
impl Listener {
    fn attach(
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Self {
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        if target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .is_err()
        {
            tracing::warn!(event, "failed to register listener");
        }
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }

    fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// The infinite photo grid exported to JavaScript
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct PhotoGridView {
    state: Rc<RefCell<SharedState>>,
    listeners: Vec<Listener>,
    #[allow(dead_code)] // Kept alive for the image listeners held by the surface
    image_closures: Vec<Closure<dyn FnMut(Event)>>,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl PhotoGridView {
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, options: JsValue) -> Result<PhotoGridView, JsValue> {
        console_error_panic_hook::set_once();
        logging::init_console_logging(None);

        let options = GridOptions::from_js(options)?;
        let surface = DomSurface::new(&container)?;
        let (width, height) = surface.client_size();
        let session = GridSession::new(ViewportSize::new(width, height), options);

        let state = Rc::new(RefCell::new(SharedState {
            session,
            surface,
            click_callback: None,
            frame_id: None,
            frame_closure: None,
            resize_timer: None,
            resize_closure: None,
            destroyed: false,
        }));

        // Image load/error listeners are shared by every tile.
        let image_closures = {
            let on_load = Self::image_closure(Rc::downgrade(&state), true);
            let on_error = Self::image_closure(Rc::downgrade(&state), false);
            state.borrow_mut().surface.set_image_handlers(
                on_load.as_ref().unchecked_ref::<Function>().clone(),
                on_error.as_ref().unchecked_ref::<Function>().clone(),
            );
            vec![on_load, on_error]
        };

        let target: EventTarget = state.borrow().surface.surface().clone().into();
        let mut listeners = Vec::new();

        // Mouse down / move / up / leave
        listeners.push(Listener::attach(
            &target,
            "mousedown",
            true,
            Self::mouse_closure(&state, &target, |state, x, y| {
                Self::internal_pointer_down(state, x, y, PointerKind::Mouse);
            }),
        ));
        listeners.push(Listener::attach(
            &target,
            "mousemove",
            true,
            Self::mouse_closure(&state, &target, Self::internal_pointer_move),
        ));
        for event in ["mouseup", "mouseleave"] {
            let weak = Rc::downgrade(&state);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                if let Some(state) = weak.upgrade() {
                    Self::internal_pointer_up(&state);
                }
            }) as Box<dyn FnMut(Event)>);
            listeners.push(Listener::attach(&target, event, true, closure));
        }

        // Touch start / move (non-passive so panning does not scroll the page)
        listeners.push(Listener::attach(
            &target,
            "touchstart",
            true,
            Self::touch_closure(&state, &target, false, |state, x, y| {
                Self::internal_pointer_down(state, x, y, PointerKind::Touch);
            }),
        ));
        listeners.push(Listener::attach(
            &target,
            "touchmove",
            false,
            Self::touch_closure(&state, &target, true, Self::internal_pointer_move),
        ));
        for event in ["touchend", "touchcancel"] {
            let weak = Rc::downgrade(&state);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                if let Some(state) = weak.upgrade() {
                    Self::internal_pointer_up(&state);
                }
            }) as Box<dyn FnMut(Event)>);
            listeners.push(Listener::attach(&target, event, true, closure));
        }

        // Wheel
        {
            let weak = Rc::downgrade(&state);
            let closure = Closure::wrap(Box::new(move |event: Event| {
                let Some(state) = weak.upgrade() else {
                    return;
                };
                if let Some(wheel) = event.dyn_ref::<WheelEvent>() {
                    wheel.prevent_default();
                    Self::internal_wheel(&state, wheel);
                }
            }) as Box<dyn FnMut(Event)>);
            listeners.push(Listener::attach(&target, "wheel", false, closure));
        }

        // Click
        listeners.push(Listener::attach(
            &target,
            "click",
            true,
            Self::mouse_closure(&state, &target, Self::internal_click),
        ));

        // Window resize
        if let Some(window) = web_sys::window() {
            let weak = Rc::downgrade(&state);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                if let Some(state) = weak.upgrade() {
                    Self::internal_window_resize(&state);
                }
            }) as Box<dyn FnMut(Event)>);
            listeners.push(Listener::attach(window.as_ref(), "resize", true, closure));
        }

        Self::render_state(&mut state.borrow_mut());

        Ok(PhotoGridView {
            state,
            listeners,
            image_closures,
        })
    }

    /// Replace the photo list with `PhotoRecord`-shaped objects.
    #[wasm_bindgen]
    pub fn set_photos(&mut self, photos: JsValue) -> Result<(), JsValue> {
        let photos: Vec<PhotoRecord> =
            serde_wasm_bindgen::from_value(photos).map_err(crate::error::PhotoGridError::from)?;
        self.replace_photos(photos);
        Ok(())
    }

    /// Replace the photo list from a JSON array.
    #[wasm_bindgen]
    pub fn set_photos_json(&mut self, json: &str) -> Result<(), JsValue> {
        let photos = parse_photo_list(json)?;
        self.replace_photos(photos);
        Ok(())
    }

    /// Replace the photo list with raw backend rows (`{ id, filename, ... }`).
    #[wasm_bindgen]
    pub fn set_api_photos(&mut self, rows: JsValue, uploads_base: &str) -> Result<(), JsValue> {
        let photos = if let Some(json) = rows.as_string() {
            parse_api_photo_list(&json, uploads_base)?
        } else {
            let rows: Vec<ApiPhoto> =
                serde_wasm_bindgen::from_value(rows).map_err(crate::error::PhotoGridError::from)?;
            rows.into_iter()
                .map(|row| row.into_record(uploads_base))
                .collect()
        };
        self.replace_photos(photos);
        Ok(())
    }

    /// Switch to a new assignment seed. Returns false if it was already active.
    #[wasm_bindgen]
    pub fn reseed(&mut self, seed: u32) -> bool {
        let mut s = self.state.borrow_mut();
        if s.destroyed || !s.session.reseed(seed) {
            return false;
        }
        Self::render_state(&mut s);
        true
    }

    /// Set the callback invoked as `callback(photo, details)` when a photo is clicked.
    #[wasm_bindgen]
    pub fn set_click_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().click_callback = callback;
    }

    /// Set the viewport size in CSS pixels.
    ///
    /// For hosts that resize the container without a window `resize` event.
    /// The viewport applies at once; a breakpoint change follows the debounce.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f64, height: f64) {
        Self::internal_resize(&self.state, ViewportSize::new(width, height));
    }

    /// Re-read the container size, e.g. after the host's first layout pass.
    #[wasm_bindgen]
    pub fn remeasure(&mut self) {
        Self::internal_window_resize(&self.state);
    }

    /// Pan by `(dx, dy)` pixels.
    #[wasm_bindgen]
    pub fn scroll_by(&mut self, dx: f64, dy: f64) {
        let mut s = self.state.borrow_mut();
        if s.destroyed {
            return;
        }
        s.session.controller_mut().scroll_by(dx, dy);
        Self::render_state(&mut s);
    }

    /// Current pan offset as `[x, y]`.
    #[wasm_bindgen]
    pub fn offset(&self) -> Vec<f64> {
        let offset = self.state.borrow().session.offset();
        vec![offset.x, offset.y]
    }

    /// Cell geometry currently in effect.
    #[wasm_bindgen]
    pub fn config(&self) -> Result<JsValue, JsValue> {
        let config = self.state.borrow().session.config();
        serde_wasm_bindgen::to_value(&config)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Number of tiles currently mounted.
    #[wasm_bindgen]
    pub fn mounted_tiles(&self) -> usize {
        self.state.borrow().session.renderer().mounted_len()
    }

    /// Remove all listeners, cancel pending work and unmount the surface.
    ///
    /// Safe to call more than once; the view is inert afterwards.
    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        self.teardown();
    }
}

#[cfg(target_arch = "wasm32")]
impl PhotoGridView {
    fn replace_photos(&mut self, photos: Vec<PhotoRecord>) {
        let mut s = self.state.borrow_mut();
        if s.destroyed {
            return;
        }
        s.session.set_photos(photos);
        Self::render_state(&mut s);
    }

    fn teardown(&mut self) {
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        let Ok(mut s) = self.state.try_borrow_mut() else {
            return;
        };
        if s.destroyed {
            return;
        }
        s.destroyed = true;
        if let Some(window) = web_sys::window() {
            if let Some(id) = s.frame_id.take() {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(id) = s.resize_timer.take() {
                window.clear_timeout_with_handle(id);
            }
        }
        s.frame_closure = None;
        s.resize_closure = None;
        s.click_callback = None;
        let _ = s.session.teardown();
        s.surface.unmount();
        tracing::debug!("photo grid destroyed");
    }

    /// Bring the DOM in line with the session after any state change.
    pub(crate) fn render_state(s: &mut SharedState) {
        if s.destroyed {
            return;
        }
        s.surface.set_offset(s.session.offset());
        if let Some(plan) = s.session.refresh() {
            if let Err(e) = s.surface.apply_plan(&plan) {
                tracing::warn!(error = %e, "failed to apply tile plan");
            }
        }
        let cells = s.session.tiles_to_load();
        if !cells.is_empty() {
            if let Err(e) = s.surface.begin_loading(&cells) {
                tracing::warn!(error = %e, "failed to start image loads");
            }
        }
    }

    fn mouse_closure(
        state: &Rc<RefCell<SharedState>>,
        target: &EventTarget,
        handler: impl Fn(&Rc<RefCell<SharedState>>, f64, f64) + 'static,
    ) -> Closure<dyn FnMut(Event)> {
        let weak = Rc::downgrade(state);
        let element = target.clone().unchecked_into::<web_sys::Element>();
        Closure::wrap(Box::new(move |event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = element.get_bounding_client_rect();
            let x = f64::from(mouse.client_x()) - rect.left();
            let y = f64::from(mouse.client_y()) - rect.top();
            handler(&state, x, y);
        }) as Box<dyn FnMut(Event)>)
    }

    fn touch_closure(
        state: &Rc<RefCell<SharedState>>,
        target: &EventTarget,
        prevent_default: bool,
        handler: impl Fn(&Rc<RefCell<SharedState>>, f64, f64) + 'static,
    ) -> Closure<dyn FnMut(Event)> {
        let weak = Rc::downgrade(state);
        let element = target.clone().unchecked_into::<web_sys::Element>();
        Closure::wrap(Box::new(move |event: Event| {
            let Some(state) = weak.upgrade() else {
                return;
            };
            let Some(touch_event) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            if prevent_default {
                touch_event.prevent_default();
            }
            let Some(touch) = touch_event.touches().get(0) else {
                return;
            };
            let rect = element.get_bounding_client_rect();
            let x = f64::from(touch.client_x()) - rect.left();
            let y = f64::from(touch.client_y()) - rect.top();
            handler(&state, x, y);
        }) as Box<dyn FnMut(Event)>)
    }

    fn image_closure(weak: Weak<RefCell<SharedState>>, loaded: bool) -> Closure<dyn FnMut(Event)> {
        Closure::wrap(Box::new(move |event: Event| {
            if let Some(state) = weak.upgrade() {
                Self::internal_image_event(&state, &event, loaded);
            }
        }) as Box<dyn FnMut(Event)>)
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for PhotoGridView {
    fn drop(&mut self) {
        self.teardown();
    }
}
