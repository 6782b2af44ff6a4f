//! # showcase-sync
//!
//! Source → target showcase synchronization.
//!
//! Build a [`ShowcaseUpdater`] over two [`showcase_api::ActionApi`] clients and
//! call [`ShowcaseUpdater::sync_showcases`], or go through [`pipeline::run`]
//! to pick the scope.

pub mod datasets;
pub mod error;
pub mod image;
pub mod pipeline;
pub mod showcases;

pub use datasets::DatasetChanges;
pub use error::SyncError;
pub use showcases::{ShowcaseOutcome, ShowcaseSyncResult, ShowcaseUpdater, SyncOptions};
