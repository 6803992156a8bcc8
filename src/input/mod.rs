//! Pointer, touch and wheel handling.
//!
//! Platform independent: the wasm viewer forwards DOM events here with
//! viewport-relative coordinates and a `performance.now()` timestamp.

pub mod controller;
pub mod drag;
pub mod observer;

pub use controller::{MoveOutcome, PointerKind, ScrollController, ScrollSettings, WHEEL_SENSITIVITY};
pub use drag::{DragPhase, CLICK_THRESHOLD_PX, DRAG_SETTLE_MS};
pub use observer::{OffsetObserver, Subscription};
