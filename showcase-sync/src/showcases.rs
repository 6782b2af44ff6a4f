//! Showcase sync orchestration.
//!
//! ## Per showcase
//!
//! 1. Fetch and normalize the source record.
//! 2. Look the showcase up on the target:
//!    absent → create; present and different → update; otherwise leave it.
//! 3. Reconcile dataset associations, whatever happened in step 2.
//!
//! Showcases are processed one at a time in source listing order; the first
//! error aborts the run.

use std::path::PathBuf;

use showcase_api::{ActionApi, ImageDownloader};
use showcase_core::{normalize, ImageFields, ImageIdentity, ShowcaseName};

use crate::datasets::{self, DatasetChanges};
use crate::error::SyncError;
use crate::image;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// What happened to the showcase record on the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowcaseOutcome {
    /// Did not exist on the target and was created.
    Created,
    /// Existed but differed; `changed` names the differing fields.
    Updated { changed: Vec<&'static str> },
    /// Already matched the source.
    Unchanged,
    /// Dry run: would have been created.
    WouldCreate,
    /// Dry run: would have been updated.
    WouldUpdate { changed: Vec<&'static str> },
}

impl ShowcaseOutcome {
    /// True for outcomes that write (or would write) the showcase record.
    pub fn is_change(&self) -> bool {
        !matches!(self, ShowcaseOutcome::Unchanged)
    }
}

/// Outcome of syncing a single showcase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseSyncResult {
    pub name: ShowcaseName,
    pub outcome: ShowcaseOutcome,
    pub datasets: DatasetChanges,
}

// ---------------------------------------------------------------------------
// ShowcaseUpdater
// ---------------------------------------------------------------------------

/// Run settings.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Where source-hosted images are downloaded before re-upload.
    pub tmp_dir: PathBuf,
    /// Read everything, write nothing.
    pub dry_run: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            tmp_dir: PathBuf::from("/tmp/"),
            dry_run: false,
        }
    }
}

/// Copies showcases from `source` to `target`.
pub struct ShowcaseUpdater<'a> {
    source: &'a dyn ActionApi,
    target: &'a dyn ActionApi,
    downloader: &'a dyn ImageDownloader,
    options: SyncOptions,
}

impl<'a> ShowcaseUpdater<'a> {
    pub fn new(
        source: &'a dyn ActionApi,
        target: &'a dyn ActionApi,
        downloader: &'a dyn ImageDownloader,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            target,
            downloader,
            options,
        }
    }

    /// Sync every showcase listed by the source.
    pub fn sync_showcases(&self) -> Result<Vec<ShowcaseSyncResult>, SyncError> {
        let names = self.source.list_showcases()?;
        tracing::info!(
            "{} showcases on {}",
            names.len(),
            self.source.address()
        );
        names.iter().map(|name| self.sync_showcase(name)).collect()
    }

    /// Sync a single showcase: record first, then its dataset associations.
    pub fn sync_showcase(&self, name: &ShowcaseName) -> Result<ShowcaseSyncResult, SyncError> {
        let dry_run = self.options.dry_run;
        let source_meta = normalize(&self.source.show_showcase(name)?);

        let outcome = match self.target.try_show_showcase(name)? {
            None if dry_run => {
                tracing::info!("[dry-run] would create showcase {name}");
                ShowcaseOutcome::WouldCreate
            }
            None => {
                let image = self.prepare_image_payload(source_meta.image())?;
                self.target.create_showcase(source_meta.into_payload(image))?;
                tracing::info!("created showcase {name}");
                ShowcaseOutcome::Created
            }
            Some(target_record) => {
                let target_meta = normalize(&target_record);
                if !source_meta.differs_from(&target_meta) {
                    tracing::debug!("showcase {name} unchanged");
                    ShowcaseOutcome::Unchanged
                } else {
                    let changed = source_meta.changed_fields(&target_meta);
                    if dry_run {
                        tracing::info!(
                            "[dry-run] would update showcase {name} ({})",
                            changed.join(", ")
                        );
                        ShowcaseOutcome::WouldUpdate { changed }
                    } else {
                        let image = self.prepare_image_payload(source_meta.image())?;
                        self.target.update_showcase(source_meta.into_payload(image))?;
                        tracing::info!("updated showcase {name} ({})", changed.join(", "));
                        ShowcaseOutcome::Updated { changed }
                    }
                }
            }
        };

        let datasets = self.sync_datasets(name, &outcome)?;

        Ok(ShowcaseSyncResult {
            name: name.clone(),
            outcome,
            datasets,
        })
    }

    fn sync_datasets(
        &self,
        name: &ShowcaseName,
        outcome: &ShowcaseOutcome,
    ) -> Result<DatasetChanges, SyncError> {
        // Nothing to list on the target for a showcase that was never created.
        if *outcome == ShowcaseOutcome::WouldCreate {
            let source_datasets = self.source.list_showcase_datasets(name)?;
            return Ok(datasets::diff_datasets(&source_datasets, &[]));
        }
        datasets::sync_datasets(self.source, self.target, name, self.options.dry_run)
    }

    fn prepare_image_payload(&self, image: &ImageIdentity) -> Result<ImageFields, SyncError> {
        image::prepare_image_payload(
            image,
            self.source.address(),
            &self.options.tmp_dir,
            self.downloader,
        )
    }
}
