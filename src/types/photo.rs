use serde::{Deserialize, Deserializer, Serialize};
use std::rc::Rc;

/// Shared, immutable photo list.
///
/// Swapping the list means replacing the `Rc`; nothing ever mutates a list in
/// place, so every tile resolution sees one consistent snapshot.
pub type PhotoList = Rc<[PhotoRecord]>;

/// One photograph that can be assigned to grid cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// URL (or any `src`-compatible reference) of the image.
    #[serde(alias = "src", alias = "image_ref")]
    pub image_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PhotoMetadata>,
}

impl PhotoRecord {
    pub fn new(id: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_ref: image_ref.into(),
            alt: None,
            metadata: None,
        }
    }

    /// Alt text for the `<img>`, falling back to the id.
    pub fn alt_text(&self) -> String {
        match &self.alt {
            Some(alt) => alt.clone(),
            None => format!("Photo {}", self.id),
        }
    }

    /// Labelled metadata rows for a detail view, in display order.
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        self.metadata
            .as_ref()
            .map(PhotoMetadata::detail_rows)
            .unwrap_or_default()
    }
}

/// Optional shooting details shown alongside a photo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        default,
        alias = "shutter_speed",
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub shutter_speed: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub iso: Option<String>,
    #[serde(
        default,
        alias = "focal_length",
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub focal_length: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub aperture: Option<String>,
    #[serde(default, alias = "camera_info", skip_serializing_if = "Option::is_none")]
    pub camera_info: Option<String>,
    #[serde(
        default,
        alias = "is_black_white",
        deserialize_with = "opt_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_black_white: Option<bool>,
    #[serde(default, alias = "category_name", skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
}

impl PhotoMetadata {
    pub fn is_empty(&self) -> bool {
        self.detail_rows().is_empty()
    }

    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = Vec::new();
        let mut push = |label: &'static str, value: &Option<String>| {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                rows.push((label, value.to_string()));
            }
        };
        push("Date", &self.date);
        push("Shutter Speed", &self.shutter_speed);
        push("ISO", &self.iso);
        push("Focal Length", &self.focal_length);
        push("Aperture", &self.aperture);
        push("Camera", &self.camera_info);
        if let Some(bw) = self.is_black_white {
            let kind = if bw { "Black & White" } else { "Color" };
            rows.push(("Type", kind.to_string()));
        }
        if let Some(category) = self.category_name.as_deref().filter(|c| !c.is_empty()) {
            rows.push(("Category", category.to_string()));
        }
        rows
    }
}

/// Row shape returned by the photo backend (`GET /api/photos`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPhoto {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub filename: String,
    #[serde(flatten)]
    pub metadata: PhotoMetadata,
}

impl ApiPhoto {
    /// Build a grid record, serving the file from `{uploads_base}/uploads/`.
    pub fn into_record(self, uploads_base: &str) -> PhotoRecord {
        let base = uploads_base.trim_end_matches('/');
        let metadata = if self.metadata.is_empty() {
            None
        } else {
            Some(self.metadata)
        };
        PhotoRecord {
            alt: Some(format!("Photo {}", self.id)),
            image_ref: format!("{base}/uploads/{}", self.filename),
            id: self.id,
            metadata,
        }
    }
}

/// Parse a JSON array of [`PhotoRecord`]s.
pub fn parse_photo_list(json: &str) -> crate::error::Result<Vec<PhotoRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of backend rows and convert them to records.
pub fn parse_api_photo_list(json: &str, uploads_base: &str) -> crate::error::Result<Vec<PhotoRecord>> {
    let rows: Vec<ApiPhoto> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .map(|row| row.into_record(uploads_base))
        .collect())
}

/// Read a photo list from disk: backend rows when `uploads_base` is given,
/// [`PhotoRecord`]s otherwise.
pub fn read_photo_file(
    path: impl AsRef<std::path::Path>,
    uploads_base: Option<&str>,
) -> crate::error::Result<Vec<PhotoRecord>> {
    let json = std::fs::read_to_string(path)?;
    match uploads_base {
        Some(base) => parse_api_photo_list(&json, base),
        None => parse_photo_list(&json),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Flag(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Scalar::deserialize(deserializer).map(Scalar::into_text)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_text))
}

// SQLite hands booleans back as 0/1.
fn opt_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Flag(b)) => Some(b),
        Some(Scalar::Int(n)) => Some(n != 0),
        Some(Scalar::Float(f)) => Some(f.abs() > f64::EPSILON),
        Some(Scalar::Text(s)) => match s.as_str() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => None,
        },
        None => None,
    })
}
