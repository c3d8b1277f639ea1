use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dhis2_import::{PipelineReport, Stage};

const STAGES: [Stage; 4] = [
    Stage::SeedOrgUnits,
    Stage::ReassignRootUser,
    Stage::ImportDataElements,
    Stage::ImportDataValues,
];

pub fn print_seed_summary(report: &PipelineReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Status"),
        header_cell("Result"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
    if let Some(column) = table.column_mut(1) {
        column.set_cell_alignment(CellAlignment::Center);
    }

    for stage in STAGES {
        if report.completed.contains(&stage) {
            table.add_row(vec![
                Cell::new(stage),
                Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
                Cell::new(stage_result(stage, report)),
            ]);
        } else {
            table.add_row(vec![Cell::new(stage), dim_cell("skipped"), dim_cell("-")]);
        }
    }
    println!("{table}");
}

fn stage_result(stage: Stage, report: &PipelineReport) -> String {
    match stage {
        Stage::SeedOrgUnits => format!("{} org units", report.organisation_units),
        Stage::ReassignRootUser => format!(
            "user attached to {}",
            report.root_organisation_unit.as_deref().unwrap_or("-")
        ),
        Stage::ImportDataElements => format!(
            "{} data elements, {} groups",
            report.data_elements, report.data_element_groups
        ),
        Stage::ImportDataValues => match report.import_count {
            Some(count) => format!(
                "{} data values (imported {}, updated {}, ignored {})",
                report.data_values, count.imported, count.updated, count.ignored
            ),
            None => format!("{} data values", report.data_values),
        },
        Stage::Done => String::new(),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dhis2_api::model::ImportCount;

    #[test]
    fn test_stage_results() {
        let report = PipelineReport {
            completed: STAGES.to_vec(),
            organisation_units: 45,
            root_organisation_unit: Some("u6yjgvIMzKn".to_string()),
            data_elements: 3,
            data_element_groups: 2,
            data_values: 6,
            import_count: Some(ImportCount {
                imported: 4,
                updated: 2,
                ignored: 0,
                deleted: 0,
            }),
        };
        assert_eq!(stage_result(Stage::SeedOrgUnits, &report), "45 org units");
        assert_eq!(
            stage_result(Stage::ReassignRootUser, &report),
            "user attached to u6yjgvIMzKn"
        );
        assert_eq!(
            stage_result(Stage::ImportDataValues, &report),
            "6 data values (imported 4, updated 2, ignored 0)"
        );
    }
}
