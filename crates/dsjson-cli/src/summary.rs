use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use dsjson_cli::types::{BatchResult, ColumnListing, FileSummary};

pub fn print_summary(result: &BatchResult) {
    println!("Command: {}", result.command);
    println!("Output: {}", result.output_dir.display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Datasets"),
        header_cell("Outputs"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);

    let mut total_outputs = 0usize;
    for file in &result.files {
        total_outputs += file.outputs.len();
        table.add_row(vec![
            Cell::new(file_name(&file.input))
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            datasets_cell(file),
            Cell::new(file.outputs.len()),
            status_cell(file),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell(format!("{} files", result.files.len())),
        Cell::new(total_outputs).add_attribute(Attribute::Bold),
        count_cell(result.failed()),
    ]);
    println!("{table}");

    let failures: Vec<&FileSummary> = result.files.iter().filter(|f| f.error.is_some()).collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for file in failures {
            if let Some(error) = &file.error {
                eprintln!("- {}: {error}", file.input.display());
            }
        }
    }
}

pub fn print_columns(listing: &[ColumnListing]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Length"),
        header_cell("Label"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for column in listing {
        table.add_row(vec![
            Cell::new(&column.dataset).fg(Color::Blue),
            Cell::new(&column.column),
            Cell::new(&column.data_type),
            column.length.map_or_else(|| dim_cell("-"), Cell::new),
            column
                .label
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn datasets_cell(file: &FileSummary) -> Cell {
    if file.datasets.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(file.datasets.join(", "))
    }
}

fn status_cell(file: &FileSummary) -> Cell {
    match file.error {
        Some(_) => Cell::new("FAILED")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
    }
}

fn count_cell(failed: usize) -> Cell {
    if failed > 0 {
        Cell::new(format!("{failed} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("0 failed")
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
