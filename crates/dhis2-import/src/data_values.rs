//! Data values joined from the estimates CSV and the server's metadata.

use std::collections::HashMap;

use dhis2_api::model::{CodedRef, DataValue};

use crate::error::{ImportError, Result};
use crate::source::{CsvRow, get_field, get_optional};

/// Estimates column holding the ISO3 country code.
pub const COUNTRY_COLUMN: &str = "iso3";
/// Estimates column holding the year.
pub const YEAR_COLUMN: &str = "year";
/// Code of the population data element and its estimates column.
pub const POPULATION_CODE: &str = "e_pop_num";
/// Code of the incidence data element and its estimates column.
pub const INCIDENCE_CODE: &str = "e_inc_100k";

/// The four estimates columns used for data values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateRow {
    /// ISO3 country code.
    pub iso3: Option<String>,
    /// Year, used as the period.
    pub year: String,
    /// Estimated population, empty when the cell is blank.
    pub population: String,
    /// Estimated incidence per 100k, empty when the cell is blank.
    pub incidence: String,
}

impl EstimateRow {
    /// Projects a raw estimates row.
    #[must_use]
    pub fn from_row(row: &CsvRow) -> Self {
        Self {
            iso3: get_optional(row, COUNTRY_COLUMN),
            year: get_field(row, YEAR_COLUMN),
            population: get_field(row, POPULATION_CODE),
            incidence: get_field(row, INCIDENCE_CODE),
        }
    }
}

/// Indexes entities by code. The first entity listed for a code wins;
/// entities without a code are skipped.
#[must_use]
pub fn index_by_code(items: &[CodedRef]) -> HashMap<&str, &str> {
    let mut index = HashMap::with_capacity(items.len());
    for item in items {
        if let Some(code) = item.code.as_deref() {
            index.entry(code).or_insert(item.id.as_str());
        }
    }
    index
}

/// Builds two data values (population, incidence) per estimate whose
/// country matches an org unit code. Other rows are dropped.
///
/// Both data elements must exist on the server as soon as one row matches.
pub fn build_data_values(
    organisation_units: &[CodedRef],
    data_elements: &[CodedRef],
    estimates: &[EstimateRow],
) -> Result<Vec<DataValue>> {
    let org_units = index_by_code(organisation_units);
    let matched: Vec<(&str, &EstimateRow)> = estimates
        .iter()
        .filter_map(|row| {
            let iso3 = row.iso3.as_deref()?;
            org_units.get(iso3).map(|&id| (id, row))
        })
        .collect();

    if matched.is_empty() {
        return Ok(Vec::new());
    }

    let elements = index_by_code(data_elements);
    let element_id = |code: &str| {
        elements
            .get(code)
            .copied()
            .ok_or_else(|| ImportError::MissingDataElement(code.to_string()))
    };
    let population = element_id(POPULATION_CODE)?;
    let incidence = element_id(INCIDENCE_CODE)?;

    let mut values = Vec::with_capacity(matched.len() * 2);
    for (org_unit, row) in matched {
        values.push(DataValue {
            org_unit: org_unit.to_string(),
            period: row.year.clone(),
            data_element: population.to_string(),
            value: row.population.clone(),
        });
        values.push(DataValue {
            org_unit: org_unit.to_string(),
            period: row.year.clone(),
            data_element: incidence.to_string(),
            value: row.incidence.clone(),
        });
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::read_csv_rows;

    fn coded(id: &str, code: &str) -> CodedRef {
        CodedRef {
            id: id.to_string(),
            code: Some(code.to_string()),
        }
    }

    fn elements() -> Vec<CodedRef> {
        vec![coded("dePop", POPULATION_CODE), coded("deInc", INCIDENCE_CODE)]
    }

    fn estimates(csv: &str) -> Vec<EstimateRow> {
        read_csv_rows(csv)
            .unwrap()
            .iter()
            .map(EstimateRow::from_row)
            .collect()
    }

    #[test]
    fn test_unmatched_country_dropped() {
        let rows = estimates(
            "iso3,year,e_pop_num,e_inc_100k,c_cdr\n\
             ABC,2020,100,5,80\n\
             ZZZ,2020,200,7,60\n",
        );
        let values = build_data_values(&[coded("u1", "ABC")], &elements(), &rows).unwrap();

        assert_eq!(values.len(), 2);
        assert!(values.iter().all(|v| v.org_unit == "u1" && v.period == "2020"));
        assert_eq!(values[0].data_element, "dePop");
        assert_eq!(values[0].value, "100");
        assert_eq!(values[1].data_element, "deInc");
        assert_eq!(values[1].value, "5");
    }

    #[test]
    fn test_first_code_wins() {
        let units = vec![coded("first", "ABC"), coded("second", "ABC")];
        let index = index_by_code(&units);
        assert_eq!(index.get("ABC"), Some(&"first"));
    }

    #[test]
    fn test_uncoded_entities_skipped() {
        let units = vec![CodedRef {
            id: "u0".to_string(),
            code: None,
        }];
        assert!(index_by_code(&units).is_empty());
    }

    #[test]
    fn test_missing_data_element() {
        let rows = estimates("iso3,year,e_pop_num,e_inc_100k\nABC,2020,100,5\n");
        let err = build_data_values(
            &[coded("u1", "ABC")],
            &[coded("dePop", POPULATION_CODE)],
            &rows,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::MissingDataElement(code) if code == INCIDENCE_CODE));
    }

    #[test]
    fn test_no_matches_needs_no_data_elements() {
        let rows = estimates("iso3,year,e_pop_num,e_inc_100k\nZZZ,2020,100,5\n");
        let values = build_data_values(&[coded("u1", "ABC")], &[], &rows).unwrap();
        assert!(values.is_empty());
    }

    #[test]
    fn test_empty_cells_post_empty_value() {
        let rows = estimates("iso3,year,e_pop_num,e_inc_100k\nABC,2021,,12\n");
        let values = build_data_values(&[coded("u1", "ABC")], &elements(), &rows).unwrap();
        assert_eq!(values[0].value, "");
        let json = serde_json::to_value(&values[0]).unwrap();
        assert_eq!(json["value"], "");
        assert_eq!(values[1].value, "12");
    }
}
