//! Data elements and groups derived from the variable dictionary.

use dhis2_api::model::{
    AggregationType, DataElement, DataElementGroup, DomainType, IdRef, Metadata, ValueType,
};
use dhis2_uid::{DEFAULT_UID_LENGTH, RandomSource, generate_uid};
use indexmap::IndexMap;

use crate::source::{CsvRow, get_field, get_optional};

/// Maximum length of a name.
pub const NAME_MAX_LEN: usize = 230;

/// Maximum length of a code or short name.
pub const CODE_MAX_LEN: usize = 50;

/// Marker appended to truncated text.
const OMISSION: &str = "...";

/// Dictionary column holding the variable name.
pub const VARIABLE_NAME_COLUMN: &str = "variable_name";
/// Dictionary column holding the variable definition.
pub const DEFINITION_COLUMN: &str = "definition";
/// Dictionary column naming the dataset a variable belongs to.
pub const DATASET_COLUMN: &str = "dataset";

/// Shortens `text` to at most `max` characters.
///
/// Longer text keeps its first `max - 3` characters followed by `...`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(OMISSION.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(OMISSION);
    out
}

/// Data elements and groups built from one dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataElementImport {
    /// One data element per dictionary row, in row order.
    pub data_elements: Vec<DataElement>,
    /// Groups in order of first appearance of their dataset.
    pub data_element_groups: Vec<DataElementGroup>,
}

impl DataElementImport {
    /// Metadata payload carrying the elements and groups.
    #[must_use]
    pub fn into_metadata(self) -> Metadata {
        Metadata {
            data_elements: self.data_elements,
            data_element_groups: self.data_element_groups,
            ..Metadata::default()
        }
    }
}

/// Builds data elements from dictionary rows.
///
/// Ids are drawn from `random` in row order, so a seeded source gives the
/// same ids for the same input.
pub fn build_data_elements(rows: &[CsvRow], random: &mut impl RandomSource) -> DataElementImport {
    let mut data_elements = Vec::with_capacity(rows.len());
    let mut groups: IndexMap<String, DataElementGroup> = IndexMap::new();

    for row in rows {
        let id = generate_uid(DEFAULT_UID_LENGTH, &mut *random).into_string();
        let element = data_element_from_row(row, id);

        if let Some(dataset) = get_optional(row, DATASET_COLUMN) {
            groups
                .entry(dataset)
                .or_insert_with_key(|dataset| new_group(dataset))
                .data_elements
                .push(IdRef::new(&element.id));
        }
        data_elements.push(element);
    }

    DataElementImport {
        data_elements,
        data_element_groups: groups.into_values().collect(),
    }
}

/// Maps one dictionary row to an aggregate integer data element.
#[must_use]
pub fn data_element_from_row(row: &CsvRow, id: String) -> DataElement {
    let variable = get_field(row, VARIABLE_NAME_COLUMN);
    DataElement {
        id,
        name: truncate(&variable, NAME_MAX_LEN),
        code: truncate(&variable, CODE_MAX_LEN),
        short_name: truncate(&variable, CODE_MAX_LEN),
        domain_type: DomainType::Aggregate,
        value_type: ValueType::Integer,
        aggregation_type: AggregationType::Sum,
        description: get_optional(row, DEFINITION_COLUMN),
    }
}

fn new_group(dataset: &str) -> DataElementGroup {
    DataElementGroup {
        name: truncate(dataset, NAME_MAX_LEN),
        code: truncate(dataset, CODE_MAX_LEN),
        short_name: truncate(dataset, CODE_MAX_LEN),
        data_elements: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhis2_uid::SeededRandom;

    fn row(variable: &str, definition: &str, dataset: &str) -> CsvRow {
        CsvRow::from([
            (VARIABLE_NAME_COLUMN.to_string(), variable.to_string()),
            (DEFINITION_COLUMN.to_string(), definition.to_string()),
            (DATASET_COLUMN.to_string(), dataset.to_string()),
        ])
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("e_pop_num", CODE_MAX_LEN), "e_pop_num");
        assert_eq!(truncate(&"x".repeat(50), CODE_MAX_LEN), "x".repeat(50));
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "a".repeat(300);
        let name = truncate(&long, NAME_MAX_LEN);
        assert_eq!(name.chars().count(), 230);
        assert!(name.ends_with("a..."));

        let code = truncate(&long, CODE_MAX_LEN);
        assert_eq!(code.chars().count(), 50);
        assert_eq!(&code[..47], &long[..47]);
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "é".repeat(60);
        assert_eq!(truncate(&text, CODE_MAX_LEN).chars().count(), 50);
    }

    #[test]
    fn test_truncate_tiny_limit() {
        assert_eq!(truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_data_element_fields() {
        let long = "n".repeat(240);
        let element =
            data_element_from_row(&row(&long, "Estimated number", "Estimates"), "id".into());
        assert_eq!(element.name.chars().count(), 230);
        assert_eq!(element.code.chars().count(), 50);
        assert_eq!(element.short_name, element.code);
        assert_eq!(element.description.as_deref(), Some("Estimated number"));
        assert_eq!(element.domain_type, DomainType::Aggregate);
        assert_eq!(element.value_type, ValueType::Integer);
        assert_eq!(element.aggregation_type, AggregationType::Sum);
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let rows = vec![
            row("e_pop_num", "Population", "Estimates"),
            row("c_newinc", "Notified", "Notifications"),
            row("e_inc_100k", "Incidence", "Estimates"),
            row("iso3", "Country code", ""),
        ];
        let import = build_data_elements(&rows, &mut SeededRandom::new(123_123));

        assert_eq!(import.data_elements.len(), 4);
        let names: Vec<&str> = import
            .data_element_groups
            .iter()
            .map(|g| g.name.as_str())
            .collect();
        assert_eq!(names, vec!["Estimates", "Notifications"]);

        let estimates = &import.data_element_groups[0];
        assert_eq!(
            estimates.data_elements,
            vec![
                IdRef::new(&import.data_elements[0].id),
                IdRef::new(&import.data_elements[2].id),
            ]
        );
    }

    #[test]
    fn test_ids_follow_seeded_generator() {
        let rows = vec![
            row("a", "", "x"),
            row("b", "", "x"),
            row("c", "", "y"),
        ];
        let import = build_data_elements(&rows, &mut SeededRandom::new(123_123));
        let ids: Vec<&str> = import.data_elements.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["yKsLePZEg44", "kfN3vElj7in", "rhNv16pTjjc"]);
        assert_eq!(import.data_elements[0].description, None);
    }

    #[test]
    fn test_metadata_payload() {
        let rows = vec![row("e_pop_num", "Population", "Estimates")];
        let metadata = build_data_elements(&rows, &mut SeededRandom::new(1)).into_metadata();
        let value = serde_json::to_value(&metadata).unwrap();
        assert_eq!(value["dataElements"][0]["code"], "e_pop_num");
        assert_eq!(
            value["dataElementGroups"][0]["dataElements"][0]["id"],
            value["dataElements"][0]["id"]
        );
        assert!(value.get("organisationUnits").is_none());
    }
}
