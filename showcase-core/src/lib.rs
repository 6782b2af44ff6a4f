//! showcase-core: showcase records, normalization and sync payloads.
//!
//! - [`types`]: newtypes and the raw [`ShowcaseRecord`]
//! - [`normalize`]: [`NormalizedShowcase`] and the image-name rule
//! - [`payload`]: what gets sent to the target on create/update

pub mod normalize;
pub mod payload;
pub mod types;

pub use normalize::{
    image_name, normalize, CanonicalFields, ImageIdentity, NormalizedShowcase, Tag,
    CANONICAL_KEYS,
};
pub use payload::{ImageFields, ImageUpload, ShowcasePayload};
pub use types::{DatasetName, ShowcaseName, ShowcaseRecord};
