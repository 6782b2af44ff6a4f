//! Canonical, comparison-safe view of a showcase record.
//!
//! [`normalize`] keeps the eight fields that are synced and compared, and
//! derives an image identity that survives re-uploads: the source platform
//! prefixes uploaded files with a timestamp (`2021-03-04-101112.123456logo.png`),
//! so the same logical image gets a different URL on every instance.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::payload::{ImageFields, ShowcasePayload};
use crate::types::ShowcaseRecord;

/// Keys of [`CanonicalFields`], in serialization order.
pub const CANONICAL_KEYS: [&str; 8] = [
    "author",
    "author_email",
    "name",
    "notes",
    "state",
    "title",
    "type",
    "url",
];

/// The fields that are copied to the target and drive equality.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanonicalFields {
    pub author: Option<String>,
    pub author_email: Option<String>,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub state: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub url: Option<String>,
}

impl CanonicalFields {
    pub fn from_record(record: &ShowcaseRecord) -> Self {
        Self {
            author: record.text("author"),
            author_email: record.text("author_email"),
            name: record.text("name"),
            notes: record.text("notes"),
            state: record.text("state"),
            title: record.text("title"),
            kind: record.text("type"),
            url: record.text("url"),
        }
    }

    /// `(key, value)` pairs in [`CANONICAL_KEYS`] order.
    pub fn entries(&self) -> [(&'static str, Option<&str>); 8] {
        [
            ("author", self.author.as_deref()),
            ("author_email", self.author_email.as_deref()),
            ("name", self.name.as_deref()),
            ("notes", self.notes.as_deref()),
            ("state", self.state.as_deref()),
            ("title", self.title.as_deref()),
            ("type", self.kind.as_deref()),
            ("url", self.url.as_deref()),
        ]
    }
}

/// Where the image lives and what it is called, independent of upload time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageIdentity {
    /// `image_display_url` of the record; `None` when absent or empty.
    pub url: Option<String>,
    /// Basename of `url` without the upload timestamp; empty without an image.
    pub name: String,
}

impl ImageIdentity {
    pub fn from_url(url: Option<String>) -> Self {
        match url.filter(|u| !u.is_empty()) {
            Some(url) => {
                let name = image_name(&url);
                Self {
                    url: Some(url),
                    name,
                }
            }
            None => Self::default(),
        }
    }
}

/// A tag as extracted from the record. Carried along, never compared or sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub state: Option<String>,
}

/// Normalized showcase metadata.
///
/// Equality (`==`) looks at [`CanonicalFields`] only; use
/// [`NormalizedShowcase::differs_from`] to also take the image into account.
#[derive(Debug, Clone)]
pub struct NormalizedShowcase {
    fields: CanonicalFields,
    image: ImageIdentity,
    tags: Vec<Tag>,
}

impl NormalizedShowcase {
    pub fn fields(&self) -> &CanonicalFields {
        &self.fields
    }

    pub fn image(&self) -> &ImageIdentity {
        &self.image
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// True when `other` must be overwritten to match `self`.
    pub fn differs_from(&self, other: &Self) -> bool {
        self != other || self.image.name != other.image.name
    }

    /// Names of the canonical fields that differ, plus `"image"` when the
    /// image names differ. Empty iff `differs_from` is false.
    pub fn changed_fields(&self, other: &Self) -> Vec<&'static str> {
        let mut changed: Vec<&'static str> = self
            .fields
            .entries()
            .into_iter()
            .zip(other.fields.entries())
            .filter(|((_, a), (_, b))| a != b)
            .map(|((key, _), _)| key)
            .collect();
        if self.image.name != other.image.name {
            changed.push("image");
        }
        changed
    }

    /// Merge the prepared image fields in, producing the create/update payload.
    pub fn into_payload(self, image: ImageFields) -> ShowcasePayload {
        ShowcasePayload {
            fields: self.fields,
            image,
        }
    }
}

impl PartialEq for NormalizedShowcase {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for NormalizedShowcase {}

/// Build the normalized view of a raw record. Pure; missing keys are absent.
pub fn normalize(record: &ShowcaseRecord) -> NormalizedShowcase {
    let mut tags: Vec<Tag> = record
        .tags()
        .map(|t| Tag {
            display_name: tag_text(t.get("display_name")),
            name: tag_text(t.get("name")),
            state: tag_text(t.get("state")),
        })
        .collect();
    tags.sort_by(|a, b| a.display_name.cmp(&b.display_name));

    NormalizedShowcase {
        fields: CanonicalFields::from_record(record),
        image: ImageIdentity::from_url(record.text("image_display_url")),
        tags,
    }
}

fn tag_text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_owned)
}

fn timestamp_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    PREFIX.get_or_init(|| Regex::new(r"^[\d-]+\.\d{6}").expect("timestamp prefix pattern"))
}

/// Stable image name for `url`: its final path segment with any leading
/// `<digits and hyphens>.<six digits>` upload timestamp removed.
pub fn image_name(url: &str) -> String {
    let basename = url.rsplit_once('/').map_or(url, |(_, tail)| tail);
    timestamp_prefix().replace(basename, "").into_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
