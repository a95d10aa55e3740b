use std::path::PathBuf;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use datapack_cli::commands::RowsOutcome;
use datapack_output::PackageBuild;

pub fn print_schema_summary(written: &[PathBuf]) {
    println!("Wrote {} schema file(s):", written.len());
    for path in written {
        println!("- {}", path.display());
    }
}

pub fn print_export_summary(build: &PackageBuild) {
    println!("Package: {}", build.destination.display());
    println!("Manifest: {}", build.manifest_path.display());
    if let Some(archive) = &build.archive {
        println!("Archive: {}", archive.display());
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource"),
        header_cell("Title"),
        header_cell("Fields"),
        header_cell("Files"),
        header_cell("Schema"),
        header_cell("Links to"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for resource in &build.resources {
        table.add_row(vec![
            Cell::new(&resource.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(resource.title.as_deref().unwrap_or("-")),
            Cell::new(resource.fields),
            Cell::new(resource.data_paths.len()),
            Cell::new(&resource.schema_path),
            match resource.linked_resource.as_deref() {
                Some(target) => Cell::new(target).fg(Color::Green),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

pub fn print_rows_outcome(outcome: &RowsOutcome) {
    match &outcome.output {
        Some(path) => {
            println!("Resource: {}", outcome.resource);
            println!(
                "Wrote {} record(s) to {}",
                outcome.report.records.len(),
                path.display()
            );
        }
        None => {
            for record in &outcome.report.records {
                println!("{record}");
            }
        }
    }
    if !outcome.report.warnings.is_empty() {
        eprintln!("Warnings:");
        for warning in &outcome.report.warnings {
            eprintln!("- {warning}");
        }
    }
    if !outcome.report.row_errors.is_empty() {
        eprintln!("Row errors:");
        for error in &outcome.report.row_errors {
            eprintln!("- row {}: {}", error.row, error.message);
        }
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
            ColumnConstraint::UpperBoundary(Width::Percentage(40)),
            ColumnConstraint::LowerBoundary(Width::Fixed(6)),
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(24)),
            ColumnConstraint::UpperBoundary(Width::Fixed(14)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
