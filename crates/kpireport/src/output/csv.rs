//! CSV rendition of the report grid.
//!
//! Same rows and columns as the workbook, minus styling. Percentages are
//! written as text (`42.50%`) so spreadsheet imports keep them readable.

use super::grid::{Cell, NA, ReportGrid};

/// Render `grid` to CSV bytes.
pub fn render(grid: &ReportGrid) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for line in &grid.lines {
        if line.cells.is_empty() {
            // csv skips empty records entirely; keep the spacer row.
            writer.write_record([""])?;
            continue;
        }
        writer.write_record(line.cells.iter().map(field))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

fn field(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Number(value) => number(*value),
        Cell::Percent(ratio) => format!("{:.2}%", ratio * 100.0),
        Cell::NotAvailable => NA.to_owned(),
        Cell::Blank => String::new(),
    }
}

/// Whole numbers print without a fractional part.
fn number(value: f64) -> String {
    if value.fract().abs() < f64::EPSILON && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
