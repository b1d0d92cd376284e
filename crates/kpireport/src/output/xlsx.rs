//! XLSX rendition of the report grid.
//!
//! One sheet, styled the way the operations team reads it: wrapped and
//! centred headers, percentage formats, a white-to-red colour scale over
//! every utilization cell, and a blue fill on the identity columns of edge
//! sensors.

use rust_xlsxwriter::{
    Color, ConditionalFormat2ColorScale, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
    XlsxError,
};

use super::grid::{Cell, CellRange, LineStyle, NA, ReportGrid};

pub const SHEET_NAME: &str = "Property Bandwidths";

const EDGE_FILL: u32 = 0x008E_A9DB;
const SCALE_MAX: u32 = 0x00F8_696B;
const HEADER_HEIGHT: f64 = 45.0;

/// Render `grid` to workbook bytes.
pub fn render(grid: &ReportGrid) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, width) in grid.column_widths.iter().enumerate() {
        sheet.set_column_width(col_num(col)?, *width)?;
    }

    for (row, line) in grid.lines.iter().enumerate() {
        let row = row_num(row)?;
        if line.style == LineStyle::Header {
            sheet.set_row_height(row, HEADER_HEIGHT)?;
        }
        for (col, cell) in line.cells.iter().enumerate() {
            let highlighted = line.style == LineStyle::Edge && col < grid.highlight_columns;
            let format = cell_format(line.style, cell, highlighted);
            write_cell(sheet, row, col_num(col)?, cell, &format, highlighted)?;
        }
    }

    let scale = ConditionalFormat2ColorScale::new()
        .set_minimum_color(Color::White)
        .set_maximum_color(Color::RGB(SCALE_MAX));
    for range in &grid.utilization_ranges {
        add_scale(sheet, *range, &scale)?;
    }

    workbook.save_to_buffer()
}

fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    format: &Format,
    highlighted: bool,
) -> Result<(), XlsxError> {
    match cell {
        Cell::Text(text) => {
            sheet.write_string_with_format(row, col, text, format)?;
        }
        Cell::Number(value) | Cell::Percent(value) => {
            sheet.write_number_with_format(row, col, *value, format)?;
        }
        Cell::NotAvailable => {
            sheet.write_string_with_format(row, col, NA, format)?;
        }
        Cell::Blank if highlighted => {
            sheet.write_blank(row, col, format)?;
        }
        Cell::Blank => {}
    }
    Ok(())
}

fn cell_format(style: LineStyle, cell: &Cell, highlighted: bool) -> Format {
    let mut format = match style {
        LineStyle::Title => return Format::new().set_bold().set_font_size(14),
        LineStyle::Header => {
            return Format::new()
                .set_bold()
                .set_text_wrap()
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin);
        }
        LineStyle::Total => Format::new().set_bold().set_border_top(FormatBorder::Thin),
        LineStyle::Body | LineStyle::Edge | LineStyle::Blank => Format::new(),
    };

    format = match cell {
        Cell::Percent(_) => format.set_num_format("0.00%"),
        Cell::Number(_) => format.set_num_format("#,##0"),
        Cell::NotAvailable => format.set_align(FormatAlign::Center),
        Cell::Text(_) | Cell::Blank => format,
    };

    if highlighted {
        format = format.set_background_color(Color::RGB(EDGE_FILL));
    }
    format
}

fn add_scale(
    sheet: &mut Worksheet,
    range: CellRange,
    scale: &ConditionalFormat2ColorScale,
) -> Result<(), XlsxError> {
    sheet.add_conditional_format(
        row_num(range.first_row)?,
        col_num(range.first_col)?,
        row_num(range.last_row)?,
        col_num(range.last_col)?,
        scale,
    )?;
    Ok(())
}

fn row_num(row: usize) -> Result<u32, XlsxError> {
    u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::output::grid::tests::sample_report;

    #[test]
    fn renders_a_zip_container() {
        let grid = ReportGrid::build(&sample_report(true));
        let bytes = render(&grid).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn edge_fill_applies_to_identity_columns_only() {
        let filled = cell_format(LineStyle::Edge, &Cell::Percent(0.5), true);
        let plain = cell_format(LineStyle::Edge, &Cell::Percent(0.5), false);
        assert_ne!(filled, plain);
        assert_eq!(
            filled,
            Format::new()
                .set_num_format("0.00%")
                .set_background_color(Color::RGB(EDGE_FILL))
        );
    }
}
