//! Organisation unit seed data.

use std::path::Path;

use dhis2_api::model::{Metadata, OrganisationUnit, OrganisationUnitLevel, OrganisationUnits};

use crate::error::{ImportError, Result};

/// Built-in org unit tree: a global root, continents and countries coded
/// by ISO3.
const EMBEDDED_ORGANISATION_UNITS: &str = include_str!("../data/organisation_units.json");

/// Fixed level definitions as `(id, name)`, root first.
const LEVELS: [(&str, &str); 3] = [
    ("a6Vvnk6gIGl", "Global"),
    ("B6GaXp4uh6O", "Continent"),
    ("WpwBhTOZ4K3", "Country"),
];

/// Returns the three hierarchy levels, numbered from 1.
#[must_use]
pub fn default_levels() -> Vec<OrganisationUnitLevel> {
    LEVELS
        .iter()
        .zip(1..)
        .map(|(&(id, name), level)| OrganisationUnitLevel {
            id: id.to_string(),
            level,
            name: name.to_string(),
        })
        .collect()
}

/// Loads the org unit tree from `path`, or the built-in tree when `None`.
///
/// The file has the shape `{"organisationUnits": [...]}`.
pub fn load_organisation_units(path: Option<&Path>) -> Result<Vec<OrganisationUnit>> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| ImportError::OrgUnitRead {
            path: path.to_path_buf(),
            source,
        })?,
        None => EMBEDDED_ORGANISATION_UNITS.to_string(),
    };
    let page: OrganisationUnits<OrganisationUnit> = serde_json::from_str(&text)?;
    Ok(page.organisation_units)
}

/// Metadata payload for the seeding stage.
#[must_use]
pub fn seed_metadata(organisation_units: Vec<OrganisationUnit>) -> Metadata {
    Metadata {
        organisation_units,
        organisation_unit_levels: default_levels(),
        ..Metadata::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhis2_uid::is_valid_uid;

    #[test]
    fn test_levels() {
        let levels = default_levels();
        assert_eq!(levels.len(), 3);
        assert_eq!(levels[0].id, "a6Vvnk6gIGl");
        assert_eq!(levels[0].level, 1);
        assert_eq!(levels[2].name, "Country");
        assert_eq!(levels[2].level, 3);
    }

    #[test]
    fn test_embedded_tree() {
        let units = load_organisation_units(None).unwrap();
        assert_eq!(units[0].id, "u6yjgvIMzKn");
        assert!(units[0].extra.get("parent").is_none());
        assert!(units.iter().all(|unit| is_valid_uid(&unit.id)));
        assert!(
            units
                .iter()
                .any(|unit| unit.code.as_deref() == Some("ZAF"))
        );
    }

    #[test]
    fn test_seed_metadata_payload() {
        let units = load_organisation_units(None).unwrap();
        let count = units.len();
        let value = serde_json::to_value(seed_metadata(units)).unwrap();
        assert_eq!(value["organisationUnits"].as_array().unwrap().len(), count);
        assert_eq!(value["organisationUnitLevels"][1]["name"], "Continent");
        assert!(value.get("dataElements").is_none());
    }
}
