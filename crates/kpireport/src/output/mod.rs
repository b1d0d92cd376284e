//! Output: report artifacts and terminal rendering.
//!
//! Artifacts are rendered from a [`grid::ReportGrid`] by the XLSX or CSV
//! writer. Terminal output uses `tabled`; colour is applied only when
//! stdout is a terminal and `NO_COLOR` is unset.

pub mod artifact;
pub mod csv;
pub mod grid;
pub mod xlsx;

use std::io::{self, IsTerminal, Write};

use tabled::{Table, Tabled, settings::Style};

use kpireport_core::Report;

use crate::cli::ReportFormat;
use crate::error::CliError;

use self::grid::{NA, ReportGrid};

/// Render `report` in `format`. `path` is only used for error messages.
pub fn render_report(
    report: &Report,
    format: ReportFormat,
    path: &std::path::Path,
) -> Result<Vec<u8>, CliError> {
    let grid = ReportGrid::build(report);
    let write_err = |source: Box<dyn std::error::Error + Send + Sync>| CliError::Write {
        path: path.display().to_string(),
        source,
    };
    match format {
        ReportFormat::Xlsx => xlsx::render(&grid).map_err(|e| write_err(Box::new(e))),
        ReportFormat::Csv => csv::render(&grid).map_err(|e| write_err(Box::new(e))),
    }
}

// ── Terminal helpers ─────────────────────────────────────────────────

/// Whether stdout should get ANSI colour.
pub fn should_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Rounded table from `Tabled` rows.
pub fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Pretty-printed JSON.
pub fn render_json<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Print to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// `42.50%`, or `NA`.
pub fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_owned(), |v| format!("{:.2}%", v * 100.0))
}

/// Mb/s figure without decimals, or `NA`.
pub fn mbps(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_owned(), |v| format!("{v:.0}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_number_formats() {
        assert_eq!(percent(Some(0.892)), "89.20%");
        assert_eq!(percent(None), "NA");
        assert_eq!(mbps(Some(892.0)), "892");
        assert_eq!(mbps(None), "NA");
    }
}
