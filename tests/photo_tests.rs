//! Photo list parsing tests for photogrid
//!
//! Host-supplied records, backend rows, and the metadata rows shown on click.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{detailed_photo, API_ROWS_JSON, PHOTOS_JSON};
use photogrid::{
    parse_api_photo_list, parse_photo_list, read_photo_file, PhotoGridError, PhotoRecord,
};

#[test]
fn test_parse_host_records() {
    let photos = parse_photo_list(PHOTOS_JSON).unwrap();
    assert_eq!(photos.len(), 3);

    assert_eq!(photos[0].id, "1");
    assert_eq!(photos[0].image_ref, "/uploads/a.jpg");
    assert_eq!(photos[0].alt_text(), "Harbour");

    assert_eq!(photos[1].id, "2");
    assert_eq!(photos[1].image_ref, "/uploads/b.jpg");
    assert_eq!(photos[1].alt_text(), "Photo 2");
    assert!(photos[1].metadata.is_none());

    let meta = photos[2].metadata.as_ref().unwrap();
    assert_eq!(meta.iso.as_deref(), Some("200"));
    assert_eq!(meta.is_black_white, Some(false));
    assert_eq!(
        photos[2].detail_rows(),
        vec![("ISO", "200".to_string()), ("Type", "Color".to_string())]
    );
}

#[test]
fn test_parse_rejects_missing_image() {
    let err = parse_photo_list(r#"[{"id": 1}]"#).unwrap_err();
    assert!(matches!(err, PhotoGridError::Json(_)), "got {err:?}");
    assert!(parse_photo_list("{}").is_err());
}

#[test]
fn test_parse_empty_list() {
    assert!(parse_photo_list("[]").unwrap().is_empty());
    assert!(parse_api_photo_list("[]", "http://localhost").unwrap().is_empty());
}

#[test]
fn test_api_rows_become_records() {
    let photos = parse_api_photo_list(API_ROWS_JSON, "https://photos.example.org").unwrap();
    assert_eq!(photos.len(), 2);

    let seven = &photos[0];
    assert_eq!(seven.id, "7");
    assert_eq!(seven.image_ref, "https://photos.example.org/uploads/seven.jpg");
    assert_eq!(seven.alt_text(), "Photo 7");
    let labels: Vec<&str> = seven.detail_rows().iter().map(|(label, _)| *label).collect();
    assert_eq!(
        labels,
        [
            "Date",
            "Shutter Speed",
            "ISO",
            "Focal Length",
            "Aperture",
            "Camera",
            "Type",
            "Category"
        ]
    );

    // A row without metadata carries none
    let eight = &photos[1];
    assert_eq!(eight.image_ref, "https://photos.example.org/uploads/eight.jpg");
    assert!(eight.metadata.is_none());
    assert!(eight.detail_rows().is_empty());
}

#[test]
fn test_detail_rows_for_black_and_white() {
    let rows = detailed_photo().detail_rows();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0], ("Date", "2021-06-12".to_string()));
    assert_eq!(rows[6], ("Type", "Black & White".to_string()));
    assert_eq!(rows[7], ("Category", "Street".to_string()));
}

#[test]
fn test_empty_metadata_values_are_skipped() {
    let photos = parse_photo_list(
        r#"[{"id": "x", "src": "x.jpg", "metadata": {"camera_info": "", "aperture": "f/4"}}]"#,
    )
    .unwrap();
    assert_eq!(photos[0].detail_rows(), vec![("Aperture", "f/4".to_string())]);
}

#[test]
fn test_record_serializes_camel_case() {
    let photo = PhotoRecord::new("5", "/uploads/five.jpg");
    let json = serde_json::to_value(&photo).unwrap();
    assert_eq!(json["imageRef"], "/uploads/five.jpg");
    assert!(json.get("alt").is_none());
    assert!(json.get("metadata").is_none());
}

#[test]
fn test_read_missing_file_is_io_error() {
    let path = std::env::temp_dir().join("photogrid-no-such-list.json");
    let err = read_photo_file(&path, None).unwrap_err();
    assert!(matches!(err, PhotoGridError::Io(_)), "got {err:?}");
}

#[test]
fn test_read_photo_file_both_shapes() {
    let dir = std::env::temp_dir();
    let records = dir.join(format!("photogrid-records-{}.json", std::process::id()));
    let rows = dir.join(format!("photogrid-rows-{}.json", std::process::id()));
    std::fs::write(&records, PHOTOS_JSON).unwrap();
    std::fs::write(&rows, API_ROWS_JSON).unwrap();

    let from_records = read_photo_file(&records, None).unwrap();
    let from_rows = read_photo_file(&rows, Some("http://localhost:5000")).unwrap();
    std::fs::remove_file(&records).unwrap();
    std::fs::remove_file(&rows).unwrap();

    assert_eq!(from_records.len(), 3);
    assert_eq!(from_rows[0].image_ref, "http://localhost:5000/uploads/seven.jpg");
}
