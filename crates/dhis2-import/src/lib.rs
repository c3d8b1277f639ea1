//! Staged import of source CSV data into a DHIS2 instance.
//!
//! The [`Pipeline`] drives four stages in strict order, each one reading
//! back what the previous stage created on the server:
//!
//! 1. **Seed org units**: post the organisation unit tree and its levels.
//! 2. **Reassign root user**: attach the current user to the level 1 root.
//! 3. **Import data elements**: derive data elements and their groups from
//!    the `dictionary` CSV, with ids from a seeded UID generator.
//! 4. **Import data values**: join the `estimates` CSV against the org
//!    units and data elements on the server, then rebuild analytics.
//!
//! The server is reached through [`RemoteStore`] and the CSV files through
//! [`SourceData`], so every stage can run against in-memory fakes.

pub mod data_elements;
pub mod data_values;
pub mod error;
pub mod org_units;
pub mod pipeline;
pub mod source;
pub mod store;

pub use data_elements::{DataElementImport, build_data_elements, truncate};
pub use data_values::{EstimateRow, build_data_values, index_by_code};
pub use error::{ExitClass, ImportError, Result};
pub use org_units::{default_levels, load_organisation_units};
pub use pipeline::{ImportOptions, Pipeline, PipelineReport, Stage};
pub use source::{CsvRow, Dataset, SourceData, WhoSource, read_csv_rows};
pub use store::RemoteStore;
