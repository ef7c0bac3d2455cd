use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tracker_model::{Category, OutcomeStatus};
use tracker_validate::{BatchStatus, ImportReport};

pub fn print_summary(report: &ImportReport) {
    println!(
        "Batch: {} ({} records, {} ms)",
        status_label(report.status),
        report.total,
        report.elapsed_ms
    );
    println!("{}", summary_table(report));
    if let Some(table) = conflict_table(report) {
        println!("{table}");
    }
}

/// Counts per batch: imported, ignored, failed and conflicts.
pub fn summary_table(report: &ImportReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Records"),
        header_cell("Imported"),
        header_cell("Ignored"),
        header_cell("Failed"),
        header_cell("Conflicts"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(report.total).add_attribute(Attribute::Bold),
        count_cell(report.imported, Color::Green),
        count_cell(report.ignored, Color::Yellow),
        count_cell(report.failed(), Color::Red),
        count_cell(report.conflict_count(), Color::Red),
    ]);
    table
}

/// One row per conflict, in record order; `None` when the batch is clean.
pub fn conflict_table(report: &ImportReport) -> Option<Table> {
    let rows: Vec<_> = report
        .outcomes
        .iter()
        .filter(|outcome| outcome.status() == OutcomeStatus::Error)
        .flat_map(|outcome| {
            outcome
                .conflicts()
                .into_iter()
                .map(move |conflict| (outcome.reference().to_string(), conflict))
        })
        .collect();
    if rows.is_empty() {
        return None;
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Record"),
        header_cell("Code"),
        header_cell("Category"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    for (reference, conflict) in rows {
        table.add_row(vec![
            Cell::new(reference),
            match conflict.code {
                Some(code) => Cell::new(code).add_attribute(Attribute::Bold),
                None => dim_cell("-"),
            },
            category_cell(conflict.category),
            Cell::new(conflict.subject),
            Cell::new(conflict.message),
        ]);
    }
    Some(table)
}

pub fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_label(status: BatchStatus) -> &'static str {
    match status {
        BatchStatus::Ok => "OK",
        BatchStatus::Warning => "WARNING",
        BatchStatus::Error => "ERROR",
    }
}

fn category_cell(category: Category) -> Cell {
    let color = match category {
        Category::Structural => Color::Magenta,
        Category::Format => Color::Yellow,
        Category::BusinessRule => Color::Red,
    };
    Cell::new(category.label()).fg(color)
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
