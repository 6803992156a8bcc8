//! Common test utilities for photogrid integration tests.
//!
//! Photo list fixtures and a session builder shared by the test files.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use photogrid::{GridOptions, GridSession, PhotoMetadata, PhotoRecord, ViewportSize};

/// `n` photos with ids `"0"..n` and `/uploads/photo-{i}.jpg` image refs.
#[must_use]
pub fn photo_list(n: usize) -> Vec<PhotoRecord> {
    (0..n)
        .map(|i| PhotoRecord::new(i.to_string(), format!("/uploads/photo-{i}.jpg")))
        .collect()
}

/// A photo with every metadata field set.
#[must_use]
pub fn detailed_photo() -> PhotoRecord {
    let mut photo = PhotoRecord::new("42", "/uploads/night.jpg");
    photo.metadata = Some(PhotoMetadata {
        date: Some("2021-06-12".to_string()),
        shutter_speed: Some("1/250".to_string()),
        iso: Some("400".to_string()),
        focal_length: Some("35mm".to_string()),
        aperture: Some("f/2.8".to_string()),
        camera_info: Some("X100V".to_string()),
        is_black_white: Some(true),
        category_name: Some("Street".to_string()),
    });
    photo
}

/// Session on a 1920x1080 viewport with `n` photos and default options.
#[must_use]
pub fn session_with_photos(n: usize) -> GridSession {
    session_with(ViewportSize::new(1920.0, 1080.0), GridOptions::default(), n)
}

#[must_use]
pub fn session_with(viewport: ViewportSize, options: GridOptions, n: usize) -> GridSession {
    let mut session = GridSession::new(viewport, options);
    session.set_photos(photo_list(n));
    session
}

pub const PHOTOS_JSON: &str = r#"[
    {"id": 1, "src": "/uploads/a.jpg", "alt": "Harbour"},
    {"id": "2", "imageRef": "/uploads/b.jpg"},
    {"id": 3, "image_ref": "/uploads/c.jpg", "metadata": {"iso": 200, "isBlackWhite": 0}}
]"#;

pub const API_ROWS_JSON: &str = r#"[
    {"id": 7, "filename": "seven.jpg", "date": "2020-01-01", "shutter_speed": "1/60",
     "iso": 800, "focal_length": "50mm", "aperture": "f/1.8", "camera_info": "A7",
     "is_black_white": 1, "category_name": "Portrait"},
    {"id": 8, "filename": "eight.jpg"}
]"#;
