//! The remote metadata store seen by the pipeline.

use dhis2_api::model::{CodedRef, DataValueSet, ImportReport, ImportSummary, Metadata, User};
use dhis2_api::{Dhis2Client, Result};

/// Server operations the pipeline depends on.
///
/// Listing methods take the per-call query; the implementation adds any
/// paging parameters it needs.
pub trait RemoteStore {
    /// Posts a metadata payload and returns the import report.
    fn post_metadata(&self, metadata: &Metadata) -> Result<ImportReport>;

    /// Lists org units as `id`/`code` pairs.
    fn organisation_units(&self, query: &[(&str, &str)]) -> Result<Vec<CodedRef>>;

    /// Lists data elements as `id`/`code` pairs.
    fn data_elements(&self, query: &[(&str, &str)]) -> Result<Vec<CodedRef>>;

    /// Fetches the authenticated user.
    fn current_user(&self) -> Result<User>;

    /// Imports a batch of data values.
    fn post_data_values(&self, set: &DataValueSet, preheat_cache: bool) -> Result<ImportSummary>;

    /// Requests an analytics table rebuild without waiting for it.
    fn run_analytics(&self) -> Result<()>;
}

impl RemoteStore for Dhis2Client {
    fn post_metadata(&self, metadata: &Metadata) -> Result<ImportReport> {
        Dhis2Client::post_metadata(self, metadata)
    }

    fn organisation_units(&self, query: &[(&str, &str)]) -> Result<Vec<CodedRef>> {
        Dhis2Client::organisation_units(self, query)
    }

    fn data_elements(&self, query: &[(&str, &str)]) -> Result<Vec<CodedRef>> {
        Dhis2Client::data_elements(self, query)
    }

    fn current_user(&self) -> Result<User> {
        self.me()
    }

    fn post_data_values(&self, set: &DataValueSet, preheat_cache: bool) -> Result<ImportSummary> {
        self.post_data_value_set(set, preheat_cache)
    }

    fn run_analytics(&self) -> Result<()> {
        Dhis2Client::run_analytics(self)
    }
}
