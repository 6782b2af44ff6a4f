//! The remote action API as seen by the sync orchestrator.

use std::io::Read;

use showcase_core::{DatasetName, ShowcaseName, ShowcasePayload, ShowcaseRecord};

use crate::error::ApiError;

/// Action names of the showcase extension.
pub mod actions {
    pub const LIST: &str = "ckanext_showcase_list";
    pub const SHOW: &str = "ckanext_showcase_show";
    pub const CREATE: &str = "ckanext_showcase_create";
    pub const UPDATE: &str = "ckanext_showcase_update";
    pub const PACKAGE_LIST: &str = "ckanext_showcase_package_list";
    pub const ASSOCIATION_CREATE: &str = "ckanext_showcase_package_association_create";
    pub const ASSOCIATION_DELETE: &str = "ckanext_showcase_package_association_delete";
}

/// Blocking client for one catalog instance.
pub trait ActionApi {
    /// Base address of the instance, without a trailing slash.
    fn address(&self) -> &str;

    /// Names of every showcase, in the instance's listing order.
    fn list_showcases(&self) -> Result<Vec<ShowcaseName>, ApiError>;

    /// Full record; [`ApiError::NotFound`] when the showcase does not exist.
    fn show_showcase(&self, id: &ShowcaseName) -> Result<ShowcaseRecord, ApiError>;

    fn create_showcase(&self, payload: ShowcasePayload) -> Result<ShowcaseRecord, ApiError>;

    fn update_showcase(&self, payload: ShowcasePayload) -> Result<ShowcaseRecord, ApiError>;

    /// Names of the datasets associated with `showcase_id`.
    fn list_showcase_datasets(
        &self,
        showcase_id: &ShowcaseName,
    ) -> Result<Vec<DatasetName>, ApiError>;

    fn create_showcase_dataset_association(
        &self,
        showcase_id: &ShowcaseName,
        package_id: &DatasetName,
    ) -> Result<(), ApiError>;

    fn delete_showcase_dataset_association(
        &self,
        showcase_id: &ShowcaseName,
        package_id: &DatasetName,
    ) -> Result<(), ApiError>;

    /// [`ActionApi::show_showcase`] with "not found" as `Ok(None)`.
    fn try_show_showcase(&self, id: &ShowcaseName) -> Result<Option<ShowcaseRecord>, ApiError> {
        match self.show_showcase(id) {
            Ok(record) => Ok(Some(record)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Raw HTTP GET for image bytes.
pub trait ImageDownloader {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, ApiError>;
}
