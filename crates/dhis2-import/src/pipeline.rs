//! The import state machine.
//!
//! Stages run strictly in order. Each one talks to the server through a
//! [`RemoteStore`] and ends with a guard: a metadata import must come back
//! `OK`, and the user reassignment is verified by reading the user back.
//! Any failure stops the run; nothing is retried or rolled back.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use dhis2_api::model::{DataValueSet, IdRef, ImportCount, ImportReport, Metadata};
use dhis2_uid::SeededRandom;
use tracing::{debug, info, info_span};

use crate::data_elements::build_data_elements;
use crate::data_values::{EstimateRow, build_data_values};
use crate::error::{ImportError, Result};
use crate::org_units::{load_organisation_units, seed_metadata};
use crate::source::{Dataset, SourceData};
use crate::store::RemoteStore;

/// Seed of the UID generator used for data element ids.
pub const DEFAULT_UID_SEED: u32 = 123_123;

/// Id the current user must be attached to after reassignment.
pub const DEFAULT_EXPECTED_ROOT: &str = "u6yjgvIMzKn";

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// Post the org unit tree and levels.
    SeedOrgUnits,
    /// Attach the current user to the root org unit.
    ReassignRootUser,
    /// Post data elements and groups from the dictionary.
    ImportDataElements,
    /// Post data values from the estimates and rebuild analytics.
    ImportDataValues,
    /// Terminal state.
    Done,
}

impl Stage {
    /// The stage that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::SeedOrgUnits => Self::ReassignRootUser,
            Self::ReassignRootUser => Self::ImportDataElements,
            Self::ImportDataElements => Self::ImportDataValues,
            Self::ImportDataValues | Self::Done => Self::Done,
        }
    }

    /// Kebab-case name used in logs and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SeedOrgUnits => "seed-org-units",
            Self::ReassignRootUser => "reassign-root-user",
            Self::ImportDataElements => "import-data-elements",
            Self::ImportDataValues => "import-data-values",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Seed of the data element id generator.
    pub uid_seed: u32,
    /// Org unit the current user must end up attached to.
    pub expected_root: String,
    /// Org unit seed file; the built-in tree when `None`.
    pub organisation_units_file: Option<PathBuf>,
    /// First stage to run. Earlier stages are assumed done.
    pub start: Stage,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            uid_seed: DEFAULT_UID_SEED,
            expected_root: DEFAULT_EXPECTED_ROOT.to_string(),
            organisation_units_file: None,
            start: Stage::SeedOrgUnits,
        }
    }
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Stages that completed, in order.
    pub completed: Vec<Stage>,
    /// Org units posted.
    pub organisation_units: usize,
    /// Root org unit the user was attached to.
    pub root_organisation_unit: Option<String>,
    /// Data elements posted.
    pub data_elements: usize,
    /// Data element groups posted.
    pub data_element_groups: usize,
    /// Data values posted.
    pub data_values: usize,
    /// Server counters for the data value import, when reported.
    pub import_count: Option<ImportCount>,
}

/// Sequential driver over the import stages.
pub struct Pipeline<'a, R, S> {
    store: &'a R,
    source: &'a S,
    options: ImportOptions,
}

impl<'a, R: RemoteStore, S: SourceData> Pipeline<'a, R, S> {
    /// Creates a pipeline over `store` and `source`.
    pub fn new(store: &'a R, source: &'a S, options: ImportOptions) -> Self {
        Self {
            store,
            source,
            options,
        }
    }

    /// Run parameters.
    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Runs from the configured start stage to [`Stage::Done`].
    pub fn run(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();
        let mut stage = self.options.start;

        while stage != Stage::Done {
            let span = info_span!("stage", stage = %stage);
            let start = Instant::now();
            span.in_scope(|| self.run_stage(stage, &mut report))?;
            info!(
                stage = %stage,
                duration_ms = start.elapsed().as_millis(),
                "stage complete"
            );
            report.completed.push(stage);
            stage = stage.next();
        }

        Ok(report)
    }

    fn run_stage(&self, stage: Stage, report: &mut PipelineReport) -> Result<()> {
        match stage {
            Stage::SeedOrgUnits => {
                report.organisation_units = self.seed_org_units()?;
            }
            Stage::ReassignRootUser => {
                report.root_organisation_unit = Some(self.reassign_root_user()?);
            }
            Stage::ImportDataElements => {
                let (elements, groups) = self.import_data_elements()?;
                report.data_elements = elements;
                report.data_element_groups = groups;
            }
            Stage::ImportDataValues => {
                let (values, import_count) = self.import_data_values()?;
                report.data_values = values;
                report.import_count = import_count;
            }
            Stage::Done => {}
        }
        Ok(())
    }

    // ========================================================================
    // Stage 1: Seed org units
    // ========================================================================

    /// Posts the org unit tree and levels. Returns the number of org units.
    pub fn seed_org_units(&self) -> Result<usize> {
        let units = load_organisation_units(self.options.organisation_units_file.as_deref())?;
        let count = units.len();
        let report = self.store.post_metadata(&seed_metadata(units))?;
        ensure_accepted(Stage::SeedOrgUnits, report)?;
        info!(organisation_units = count, "org units seeded");
        Ok(count)
    }

    // ========================================================================
    // Stage 2: Reassign root user
    // ========================================================================

    /// Attaches the current user to the first level 1 org unit and checks
    /// the server kept exactly that assignment. Returns the root id.
    pub fn reassign_root_user(&self) -> Result<String> {
        let root = self
            .store
            .organisation_units(&[("filter", "level:eq:1")])?
            .into_iter()
            .next()
            .ok_or(ImportError::NoRootOrgUnit)?;
        debug!(root = %root.id, "root org unit found");

        let mut user = self.store.current_user()?;
        user.organisation_units = vec![IdRef::new(&root.id)];
        let report = self.store.post_metadata(&Metadata {
            users: vec![user],
            ..Metadata::default()
        })?;
        ensure_accepted(Stage::ReassignRootUser, report)?;

        let user = self.store.current_user()?;
        let expected = self.options.expected_root.as_str();
        match user.organisation_units.as_slice() {
            [only] if only.id == expected => {
                info!(root = %root.id, "user attached to root org unit");
                Ok(root.id)
            }
            assigned => {
                let found: Vec<&str> = assigned.iter().map(|unit| unit.id.as_str()).collect();
                Err(ImportError::PostconditionViolated {
                    stage: Stage::ReassignRootUser,
                    message: format!(
                        "expected user org units [{expected}], found [{}]",
                        found.join(", ")
                    ),
                })
            }
        }
    }

    // ========================================================================
    // Stage 3: Import data elements
    // ========================================================================

    /// Posts one data element per dictionary row plus their groups.
    /// Returns the element and group counts.
    pub fn import_data_elements(&self) -> Result<(usize, usize)> {
        let rows = self.source.fetch_rows(Dataset::Dictionary)?;
        debug!(rows = rows.len(), "dictionary loaded");

        let mut random = SeededRandom::new(self.options.uid_seed);
        let import = build_data_elements(&rows, &mut random);
        let counts = (import.data_elements.len(), import.data_element_groups.len());

        let report = self.store.post_metadata(&import.into_metadata())?;
        ensure_accepted(Stage::ImportDataElements, report)?;
        info!(
            data_elements = counts.0,
            data_element_groups = counts.1,
            "data elements imported"
        );
        Ok(counts)
    }

    // ========================================================================
    // Stage 4: Import data values
    // ========================================================================

    /// Posts population and incidence values for every estimate whose
    /// country is a level 3 org unit, then requests an analytics rebuild.
    pub fn import_data_values(&self) -> Result<(usize, Option<ImportCount>)> {
        let organisation_units = self
            .store
            .organisation_units(&[("fields", "id,code"), ("filter", "level:eq:3")])?;
        let data_elements = self.store.data_elements(&[("fields", "id,code")])?;
        let estimates: Vec<EstimateRow> = self
            .source
            .fetch_rows(Dataset::Estimates)?
            .iter()
            .map(EstimateRow::from_row)
            .collect();
        debug!(
            organisation_units = organisation_units.len(),
            data_elements = data_elements.len(),
            estimates = estimates.len(),
            "data value inputs loaded"
        );

        let data_values = build_data_values(&organisation_units, &data_elements, &estimates)?;
        let count = data_values.len();
        let summary = self
            .store
            .post_data_values(&DataValueSet { data_values }, true)?;
        info!(
            data_values = count,
            status = summary.status.as_deref().unwrap_or("unknown"),
            "data values imported"
        );

        self.store.run_analytics()?;
        debug!("analytics rebuild requested");
        Ok((count, summary.import_count))
    }
}

fn ensure_accepted(stage: Stage, report: ImportReport) -> Result<()> {
    if report.is_ok() {
        debug!(stage = %stage, "metadata import accepted");
        Ok(())
    } else {
        Err(ImportError::rejected(stage, report))
    }
}
