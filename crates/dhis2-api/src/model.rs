//! Request and response bodies of the consumed endpoints.
//!
//! Field names follow the platform's camelCase JSON. Types that are read
//! back and re-posted (org units, users) keep unknown fields in a flattened
//! map so nothing is lost on the round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status value of an accepted metadata import.
pub const STATUS_OK: &str = "OK";

/// Reference to an entity by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdRef {
    /// Entity UID.
    pub id: String,
}

impl IdRef {
    /// Creates a reference to `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Entity listed with `fields=id,code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedRef {
    /// Entity UID.
    pub id: String,
    /// Business code, absent when the entity has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Organisation unit as loaded from seed data or listed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationUnit {
    /// Org unit UID.
    pub id: String,
    /// Business code (ISO3 for countries).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Remaining attributes, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One tier of the org unit hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationUnitLevel {
    /// Level UID.
    pub id: String,
    /// Depth, starting at 1 for the root.
    pub level: u32,
    /// Display name.
    pub name: String,
}

/// Domain of a data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainType {
    /// Aggregate data.
    Aggregate,
    /// Tracker data.
    Tracker,
}

/// Value type of a data element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    /// Whole numbers.
    Integer,
    /// Decimal numbers.
    Number,
    /// Free text.
    Text,
}

/// Aggregation applied to a data element in analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationType {
    /// Sum across org units and periods.
    Sum,
    /// Average across org units and periods.
    Average,
    /// No aggregation.
    None,
}

/// Data element definition posted as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElement {
    /// Data element UID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Business code.
    pub code: String,
    /// Short display name.
    pub short_name: String,
    /// Domain type.
    pub domain_type: DomainType,
    /// Value type.
    pub value_type: ValueType,
    /// Aggregation type.
    pub aggregation_type: AggregationType,
    /// Free-text definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Group of data elements posted as metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElementGroup {
    /// Display name.
    pub name: String,
    /// Business code.
    pub code: String,
    /// Short display name.
    pub short_name: String,
    /// Member data elements.
    pub data_elements: Vec<IdRef>,
}

/// User record as returned by `api/27/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Org units the user is assigned to.
    #[serde(default)]
    pub organisation_units: Vec<IdRef>,
    /// Remaining attributes, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Returns the user UID, if the server included it.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }
}

/// Body of a `api/metadata` import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Org units to create or update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organisation_units: Vec<OrganisationUnit>,
    /// Org unit levels to create or update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub organisation_unit_levels: Vec<OrganisationUnitLevel>,
    /// Users to update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    /// Data elements to create or update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_elements: Vec<DataElement>,
    /// Data element groups to create or update.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_element_groups: Vec<DataElementGroup>,
}

/// Response of a metadata import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    /// `OK`, `WARNING` or `ERROR`.
    pub status: String,
    /// Remaining report fields (stats, type reports).
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl ImportReport {
    /// Returns true if the import was accepted.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// Renders the full report as compact JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.status.clone())
    }
}

/// One observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValue {
    /// Org unit UID.
    pub org_unit: String,
    /// ISO period, e.g. `2020`.
    pub period: String,
    /// Data element UID.
    pub data_element: String,
    /// Raw value as read from the source. A blank cell is sent as `""`.
    #[serde(default)]
    pub value: String,
}

/// Body of a `api/dataValueSets` import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataValueSet {
    /// Values to import.
    pub data_values: Vec<DataValue>,
}

/// Response of a data value set import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Import status, when reported.
    #[serde(default)]
    pub status: Option<String>,
    /// Imported/updated/ignored/deleted counts, when reported.
    #[serde(default)]
    pub import_count: Option<ImportCount>,
    /// Remaining summary fields.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Counters of a data value set import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportCount {
    /// Newly imported values.
    #[serde(default)]
    pub imported: u64,
    /// Updated values.
    #[serde(default)]
    pub updated: u64,
    /// Ignored values.
    #[serde(default)]
    pub ignored: u64,
    /// Deleted values.
    #[serde(default)]
    pub deleted: u64,
}

/// Page of `api/organisationUnits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUnits<T> {
    /// Listed org units.
    pub organisation_units: Vec<T>,
}

/// Page of `api/dataElements`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataElements<T> {
    /// Listed data elements.
    pub data_elements: Vec<T>,
}
