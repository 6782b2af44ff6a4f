//! Create/update payloads sent to the target instance.

use std::fs::File;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::normalize::CanonicalFields;

/// A downloaded image, opened for reading, to be sent as `image_upload`.
#[derive(Debug)]
pub struct ImageUpload {
    /// File name announced in the multipart part.
    pub file_name: String,
    /// Where the bytes were written.
    pub path: PathBuf,
    pub file: File,
}

/// Image-related fields merged into a payload.
#[derive(Debug, Default)]
pub struct ImageFields {
    /// Always sent. Empty means "no external image": either there is no image
    /// at all or the bytes travel in `image_upload`.
    pub image_url: String,
    pub image_upload: Option<ImageUpload>,
}

impl ImageFields {
    /// Clears any image reference on the target.
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Points the target at an image hosted elsewhere.
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            image_url: url.into(),
            image_upload: None,
        }
    }

    /// Uploads fresh bytes to the target.
    pub fn upload(upload: ImageUpload) -> Self {
        Self {
            image_url: String::new(),
            image_upload: Some(upload),
        }
    }
}

/// Keyword arguments for `ckanext_showcase_create` / `ckanext_showcase_update`.
#[derive(Debug)]
pub struct ShowcasePayload {
    pub fields: CanonicalFields,
    pub image: ImageFields,
}

impl ShowcasePayload {
    /// JSON body: the canonical fields (absent ones as `null`) plus `image_url`.
    pub fn to_json(&self) -> Value {
        let mut body: Map<String, Value> = self
            .fields
            .entries()
            .into_iter()
            .map(|(key, value)| {
                let value = value.map_or(Value::Null, |v| Value::String(v.to_owned()));
                (key.to_owned(), value)
            })
            .collect();
        body.insert(
            "image_url".to_owned(),
            Value::String(self.image.image_url.clone()),
        );
        Value::Object(body)
    }

    /// Text parts of a multipart body. Absent fields are left out, since a
    /// form has no way to say `null`.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut parts: Vec<(&'static str, String)> = self
            .fields
            .entries()
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.to_owned())))
            .collect();
        parts.push(("image_url", self.image.image_url.clone()));
        parts
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }
}
