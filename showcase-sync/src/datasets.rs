//! Dataset association reconciliation.

use std::collections::BTreeSet;

use showcase_api::ActionApi;
use showcase_core::{DatasetName, ShowcaseName};

use crate::error::SyncError;

/// Associations the target gains and loses for one showcase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetChanges {
    pub added: Vec<DatasetName>,
    pub removed: Vec<DatasetName>,
}

impl DatasetChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Set difference between the source and target association lists.
/// Duplicates collapse; both halves come out sorted by name.
pub fn diff_datasets(source: &[DatasetName], target: &[DatasetName]) -> DatasetChanges {
    let source: BTreeSet<&DatasetName> = source.iter().collect();
    let target: BTreeSet<&DatasetName> = target.iter().collect();
    DatasetChanges {
        added: source.difference(&target).map(|&d| d.clone()).collect(),
        removed: target.difference(&source).map(|&d| d.clone()).collect(),
    }
}

/// Make the target's associations for `showcase` match the source's.
///
/// One remote call per added or removed dataset; none when the sets already
/// match. With `dry_run` the changes are computed but not applied.
pub fn sync_datasets(
    source: &dyn ActionApi,
    target: &dyn ActionApi,
    showcase: &ShowcaseName,
    dry_run: bool,
) -> Result<DatasetChanges, SyncError> {
    let source_datasets = source.list_showcase_datasets(showcase)?;
    let target_datasets = target.list_showcase_datasets(showcase)?;
    let changes = diff_datasets(&source_datasets, &target_datasets);

    if dry_run {
        for dataset in &changes.added {
            tracing::info!("[dry-run] would associate {dataset} with {showcase}");
        }
        for dataset in &changes.removed {
            tracing::info!("[dry-run] would dissociate {dataset} from {showcase}");
        }
        return Ok(changes);
    }

    for dataset in &changes.added {
        target.create_showcase_dataset_association(showcase, dataset)?;
        tracing::info!("associated {dataset} with {showcase}");
    }
    for dataset in &changes.removed {
        target.delete_showcase_dataset_association(showcase, dataset)?;
        tracing::info!("dissociated {dataset} from {showcase}");
    }
    if changes.is_empty() {
        tracing::debug!("datasets of {showcase} already in sync");
    }

    Ok(changes)
}
