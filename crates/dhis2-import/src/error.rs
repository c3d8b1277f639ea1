//! Error types for the import pipeline.

use std::path::PathBuf;

use dhis2_api::ApiError;
use dhis2_api::model::ImportReport;
use thiserror::Error;

use crate::pipeline::Stage;

/// How a failed run should be reported to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitClass {
    /// A request could not be made or completed: configuration, network,
    /// non-success HTTP status, unexpected response shape.
    RequestFailed,
    /// The server answered but the outcome is not the expected one.
    ResultRejected,
}

/// Errors that stop the pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// Configuration or transport failure talking to the server.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A source CSV could not be downloaded.
    #[error("failed to fetch {dataset} source data: {message}")]
    SourceFetch {
        /// Dataset name.
        dataset: String,
        /// Transport or status message.
        message: String,
    },

    /// A source CSV could not be parsed.
    #[error("failed to parse {dataset} CSV: {source}")]
    Csv {
        /// Dataset name.
        dataset: String,
        /// Underlying parser error.
        #[source]
        source: csv::Error,
    },

    /// The org unit seed file could not be read.
    #[error("failed to read org unit file {path}: {source}")]
    OrgUnitRead {
        /// Seed file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The org unit seed data is not valid JSON of the expected shape.
    #[error("invalid org unit data: {0}")]
    OrgUnitParse(#[from] serde_json::Error),

    /// The server answered a metadata import with a status other than `OK`.
    #[error("{stage}: metadata import rejected: {}", report.to_json())]
    MetadataRejected {
        /// Stage that posted the metadata.
        stage: Stage,
        /// Full import report.
        report: Box<ImportReport>,
    },

    /// A stage completed but the server state does not match what it wrote.
    #[error("{stage}: postcondition violated: {message}")]
    PostconditionViolated {
        /// Stage whose effect could not be verified.
        stage: Stage,
        /// What was expected and what was found.
        message: String,
    },

    /// No level 1 org unit exists on the server.
    #[error("no level 1 organisation unit found")]
    NoRootOrgUnit,

    /// A data element required for data values is not on the server.
    #[error("data element with code '{0}' not found")]
    MissingDataElement(String),
}

impl ImportError {
    /// Classifies the error for the process exit code.
    #[must_use]
    pub fn exit_class(&self) -> ExitClass {
        match self {
            Self::Api(_)
            | Self::SourceFetch { .. }
            | Self::Csv { .. }
            | Self::OrgUnitRead { .. }
            | Self::OrgUnitParse(_) => ExitClass::RequestFailed,
            Self::MetadataRejected { .. }
            | Self::PostconditionViolated { .. }
            | Self::NoRootOrgUnit
            | Self::MissingDataElement(_) => ExitClass::ResultRejected,
        }
    }

    pub(crate) fn rejected(stage: Stage, report: ImportReport) -> Self {
        Self::MetadataRejected {
            stage,
            report: Box::new(report),
        }
    }
}

/// Result type alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
