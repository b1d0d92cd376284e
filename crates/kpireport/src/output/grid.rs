//! Report layout shared by the XLSX and CSV writers.
//!
//! The summary block is laid out first even though it is computed from the
//! finished detail rows: both blocks are built in memory and positioned at
//! render time, so no writer ever has to seek back.

use kpireport_core::{Report, ReportRow, SegmentSummary, WINDOW_COUNT};

/// Text written wherever a value is not available.
pub const NA: &str = "NA";

/// One cell's content.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    /// Ratio rendered as a percentage (0.5 is 50%).
    Percent(f64),
    NotAvailable,
    Blank,
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn text_or_na(value: Option<&str>) -> Self {
        value.map_or(Self::NotAvailable, Self::text)
    }

    fn number_or_na(value: Option<f64>) -> Self {
        value.map_or(Self::NotAvailable, Self::Number)
    }

    fn percent_or_na(value: Option<f64>) -> Self {
        value.map_or(Self::NotAvailable, Self::Percent)
    }
}

/// How a line is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Header,
    Body,
    /// Edge sensor; the identity columns are highlighted.
    Edge,
    Total,
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub style: LineStyle,
    pub cells: Vec<Cell>,
}

/// Inclusive rectangle of cells, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

/// The whole sheet, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportGrid {
    pub lines: Vec<Line>,
    /// Utilization areas that get the colour scale.
    pub utilization_ranges: Vec<CellRange>,
    /// Leading columns highlighted on edge lines.
    pub highlight_columns: usize,
    /// Column widths in Excel character units.
    pub column_widths: Vec<f64>,
}

impl ReportGrid {
    pub fn build(report: &Report) -> Self {
        let labels = report.windows.labels();
        let mut lines = Vec::new();
        let mut utilization_ranges = Vec::new();

        // ── Summary block ──
        let primary = report.windows.primary().range;
        lines.push(Line {
            style: LineStyle::Title,
            cells: vec![Cell::text(format!(
                "Bandwidth KPI Report {} to {} ({} traffic)",
                primary.start.format("%m/%d/%Y"),
                primary.end.format("%m/%d/%Y"),
                report.percentile
            ))],
        });

        let mut header = vec![
            Cell::text("Core Utilization Summary"),
            Cell::text("Bandwidth (Mb/s)"),
            Cell::text("Max Capacity (Mb/s)"),
        ];
        header.extend(labels.iter().map(|l| Cell::text(format!("Gross Utilization ({l})"))));
        lines.push(Line {
            style: LineStyle::Header,
            cells: header,
        });

        let first_summary_row = lines.len();
        for segment in &report.summary.segments {
            lines.push(summary_line(segment, LineStyle::Body));
        }
        lines.push(summary_line(&report.summary.total, LineStyle::Total));
        utilization_ranges.push(CellRange {
            first_row: first_summary_row,
            first_col: 3,
            last_row: lines.len() - 1,
            last_col: 2 + WINDOW_COUNT,
        });

        lines.push(Line {
            style: LineStyle::Blank,
            cells: Vec::new(),
        });

        // ── Detail block ──
        let debug_cols = if report.debug { 2 } else { 0 };
        let mut header = vec![Cell::text("Location")];
        if report.debug {
            header.push(Cell::text("Device"));
            header.push(Cell::text("Device id"));
        }
        header.extend([
            Cell::text(format!("Highest Traffic {} (Mb/s)", report.percentile)),
            Cell::text("Choke Point (Device)"),
            Cell::text("Choke Point Throttle (Mb/s)"),
            Cell::text("Circuit Max Limit (Mb/s)"),
            Cell::text("Circuit Utilization"),
        ]);
        header.extend(labels.iter().map(|l| Cell::text(format!("Choke Utilization ({l})"))));
        header.extend([
            Cell::text("Max Usage Plan"),
            Cell::text("Notes"),
            Cell::text("Action"),
        ]);
        lines.push(Line {
            style: LineStyle::Header,
            cells: header,
        });

        let first_detail_row = lines.len();
        for row in &report.rows {
            lines.push(detail_line(row, report.debug));
        }
        if !report.rows.is_empty() {
            let circuit_col = 5 + debug_cols;
            utilization_ranges.push(CellRange {
                first_row: first_detail_row,
                first_col: circuit_col,
                last_row: lines.len() - 1,
                last_col: circuit_col + WINDOW_COUNT,
            });
        }

        Self {
            lines,
            utilization_ranges,
            highlight_columns: 6 + debug_cols,
            column_widths: column_widths(report.debug),
        }
    }
}

fn summary_line(segment: &SegmentSummary, style: LineStyle) -> Line {
    let capacity = (segment.capacity_mbps > 0.0).then_some(segment.capacity_mbps);
    let mut cells = vec![
        Cell::text(segment.segment.clone()),
        Cell::number_or_na(segment.total_bandwidth_mbps()),
        Cell::number_or_na(capacity),
    ];
    cells.extend((0..WINDOW_COUNT).map(|w| Cell::percent_or_na(segment.window_utilization(w))));
    Line { style, cells }
}

fn detail_line(row: &ReportRow, debug: bool) -> Line {
    let mut cells = vec![Cell::text_or_na(row.location.as_deref())];
    if debug {
        cells.push(Cell::text(row.device_name.clone()));
        cells.push(Cell::text(row.sensor_id.to_string()));
    }
    cells.extend([
        Cell::number_or_na(row.primary_traffic_mbps()),
        Cell::text_or_na(row.choke_point.as_deref()),
        Cell::number_or_na(row.choke_point_limit_mbps),
        Cell::number_or_na(row.circuit_max_limit_mbps),
        Cell::percent_or_na(row.circuit_utilization),
    ]);
    cells.extend(row.choke_utilization.iter().map(|u| Cell::percent_or_na(*u)));
    cells.extend(
        [&row.max_usage_plan, &row.notes, &row.action]
            .into_iter()
            .map(|v| v.as_deref().map_or(Cell::Blank, Cell::text)),
    );
    Line {
        style: if row.is_edge { LineStyle::Edge } else { LineStyle::Body },
        cells,
    }
}

fn column_widths(debug: bool) -> Vec<f64> {
    let mut widths = vec![28.0];
    if debug {
        widths.extend([24.0, 10.0]);
    }
    widths.extend([12.0, 16.0, 16.0, 16.0, 12.0, 16.0, 16.0, 16.0, 16.0, 12.0, 14.0, 14.0]);
    widths
}
