//! Sync pipeline entrypoint used by the CLI.

use showcase_core::ShowcaseName;

use crate::{ShowcaseSyncResult, ShowcaseUpdater, SyncError};

/// Scope for a sync pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncScope {
    /// Every showcase the source lists.
    All,
    /// A single named showcase.
    Showcase(ShowcaseName),
}

/// Run the sync pipeline for a scope.
pub fn run(
    updater: &ShowcaseUpdater<'_>,
    scope: SyncScope,
) -> Result<Vec<ShowcaseSyncResult>, SyncError> {
    match scope {
        SyncScope::All => updater.sync_showcases(),
        SyncScope::Showcase(name) => Ok(vec![updater.sync_showcase(&name)?]),
    }
}
