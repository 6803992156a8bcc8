//! Browser tests for the `PhotoGridView` bindings.
//!
//! Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use photogrid::viewer::logging::{init_console_logging, MakeConsoleWriter};
use photogrid::PhotoGridView;
use wasm_bindgen::prelude::*;
use wasm_bindgen_test::*;
use std::io::Write;
use tracing_subscriber::fmt::MakeWriter;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

const PHOTOS: &str = r#"[
    {"id": 1, "src": "data:image/gif;base64,R0lGODlhAQABAAAAACw="},
    {"id": 2, "src": "data:image/gif;base64,R0lGODlhAQABAAAAACw="},
    {"id": 3, "src": "data:image/gif;base64,R0lGODlhAQABAAAAACw="}
]"#;

fn container(width: u32, height: u32) -> HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let div: HtmlElement = document.create_element("div").unwrap().unchecked_into();
    let style = div.style();
    style.set_property("width", &format!("{width}px")).unwrap();
    style.set_property("height", &format!("{height}px")).unwrap();
    document.body().unwrap().append_child(&div).unwrap();
    div
}

#[wasm_bindgen_test]
fn test_view_mounts_tiles_for_photos() {
    let host = container(800, 600);
    let mut view = PhotoGridView::new(host.clone(), JsValue::UNDEFINED).unwrap();
    assert_eq!(view.mounted_tiles(), 0);

    view.set_photos_json(PHOTOS).unwrap();
    assert!(view.mounted_tiles() > 0);
    assert!(host.query_selector(".photogrid-tile").unwrap().is_some());

    view.destroy();
    host.remove();
}

#[wasm_bindgen_test]
fn test_scroll_by_moves_offset() {
    let host = container(800, 600);
    let mut view = PhotoGridView::new(host.clone(), JsValue::UNDEFINED).unwrap();
    view.set_photos_json(PHOTOS).unwrap();

    view.scroll_by(-120.0, 45.0);
    assert_eq!(view.offset(), vec![-120.0, 45.0]);

    view.destroy();
    host.remove();
}

#[wasm_bindgen_test]
fn test_destroy_unmounts_and_is_idempotent() {
    let host = container(800, 600);
    let mut view = PhotoGridView::new(host.clone(), JsValue::UNDEFINED).unwrap();
    view.set_photos_json(PHOTOS).unwrap();

    view.destroy();
    assert_eq!(view.mounted_tiles(), 0);
    assert!(host.query_selector(".photogrid-surface").unwrap().is_none());

    // Inert after destroy
    view.destroy();
    view.scroll_by(10.0, 10.0);
    assert_eq!(view.offset(), vec![0.0, 0.0]);
    assert!(!view.reseed(9));
    host.remove();
}

#[wasm_bindgen_test]
fn test_host_resize_mounts_tiles_in_collapsed_container() {
    let host = container(800, 0);
    let mut view = PhotoGridView::new(host.clone(), JsValue::UNDEFINED).unwrap();
    view.set_photos_json(PHOTOS).unwrap();
    assert_eq!(view.mounted_tiles(), 0);

    view.resize(800.0, 600.0);
    assert!(view.mounted_tiles() > 0);

    view.destroy();
    host.remove();
}

#[wasm_bindgen_test]
fn test_remeasure_reads_container_size() {
    let host = container(800, 0);
    let mut view = PhotoGridView::new(host.clone(), JsValue::UNDEFINED).unwrap();
    view.set_photos_json(PHOTOS).unwrap();
    assert_eq!(view.mounted_tiles(), 0);

    host.style().set_property("height", "600px").unwrap();
    view.remeasure();
    assert!(view.mounted_tiles() > 0);

    view.destroy();
    host.remove();
}

#[wasm_bindgen_test]
fn test_invalid_photo_json_is_rejected() {
    let host = container(400, 300);
    let mut view = PhotoGridView::new(host.clone(), JsValue::UNDEFINED).unwrap();
    assert!(view.set_photos_json("not json").is_err());
    assert_eq!(view.mounted_tiles(), 0);
    view.destroy();
    host.remove();
}

#[wasm_bindgen_test]
fn test_console_logging_installs_once() {
    init_console_logging(Some("photogrid=debug"));
    // A second install, as done by every new view, keeps the first subscriber
    init_console_logging(None);
    tracing::warn!(target: "photogrid", "console subscriber installed");

    let mut writer = MakeConsoleWriter.make_writer();
    writer.write_all(b"WARN photogrid: tile image failed to load\n").unwrap();
    drop(writer);
}
