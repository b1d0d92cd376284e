//! The report run: fetch, compute, write, summarize.

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::Tabled;
use tracing::info;

use kpireport_config::Config;
use kpireport_core::{Report, ReportRunner, RunEvent, SegmentSummary};

use crate::cli::{GlobalOpts, ReportArgs};
use crate::config::{resolve_output, resolve_run};
use crate::error::CliError;
use crate::output::{self, artifact};

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Bandwidth (Mb/s)")]
    bandwidth: String,
    #[tabled(rename = "Capacity (Mb/s)")]
    capacity: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
}

impl From<&SegmentSummary> for SummaryRow {
    fn from(s: &SegmentSummary) -> Self {
        Self {
            segment: s.segment.clone(),
            bandwidth: output::mbps(s.total_bandwidth_mbps()),
            capacity: output::mbps((s.capacity_mbps > 0.0).then_some(s.capacity_mbps)),
            utilization: output::percent(s.utilization()),
        }
    }
}

pub async fn handle(args: &ReportArgs, global: &GlobalOpts, config: &Config) -> Result<(), CliError> {
    let today = chrono::Local::now().date_naive();
    let output_config = resolve_output(args, config)?;
    let run = resolve_run(args, global, config, today)?;
    let report_config = &run.report;

    let path = output_config.dir.join(artifact::file_name(
        report_config.primary_window,
        output_config.format,
    ));
    // A leftover from an earlier failed run must not survive this one.
    artifact::delete_if_exists(&artifact::partial_path(&path))?;

    let client = run.connection.connect()?;
    let runner = ReportRunner::new(&client, report_config);
    info!(
        host = %client.base_url(),
        window = %report_config.primary_window,
        percentile = %report_config.percentile,
        "starting report"
    );

    let progress = Progress::new(global.quiet);
    let report = runner.run(|event| progress.observe(&event)).await;
    progress.finish();
    let report = report?;

    let bytes = output::render_report(&report, output_config.format, &path)?;
    artifact::write_atomic(&path, &bytes).map_err(|e| CliError::Write {
        path: path.display().to_string(),
        source: Box::new(e),
    })?;

    output::print_output(&summary(&report, &path.display().to_string()), global.quiet);
    Ok(())
}

fn summary(report: &Report, path: &str) -> String {
    let mut rows: Vec<SummaryRow> = report.summary.segments.iter().map(SummaryRow::from).collect();
    rows.push(SummaryRow::from(&report.summary.total));

    let written = format!("Wrote {} sensors to {path}", report.rows.len());
    let written = if output::should_color() {
        written.green().to_string()
    } else {
        written
    };
    format!("{}\n{written}", output::render_table(&rows))
}

// ── Progress ─────────────────────────────────────────────────────────

/// Per-sensor progress bar on stderr; hidden when quiet or not a terminal.
struct Progress(Option<ProgressBar>);

impl Progress {
    fn new(quiet: bool) -> Self {
        if quiet || !std::io::stderr().is_terminal() {
            return Self(None);
        }
        let bar = ProgressBar::new_spinner();
        bar.set_message("listing sensors");
        Self(Some(bar))
    }

    fn observe(&self, event: &RunEvent<'_>) {
        let Some(bar) = &self.0 else { return };
        match event {
            RunEvent::SensorsListed { count } => {
                bar.set_length(u64::try_from(*count).unwrap_or(u64::MAX));
                if let Ok(style) =
                    ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
                {
                    bar.set_style(style);
                }
            }
            RunEvent::SensorStarted { sensor, .. } => {
                bar.set_message(sensor.device_name().to_owned());
            }
            RunEvent::SensorFinished { .. } => bar.inc(1),
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.0 {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use kpireport_core::aggregate;

    use super::*;

    #[test]
    fn summary_row_formats_missing_capacity_as_na() {
        let table = aggregate(std::iter::empty());
        let row = SummaryRow::from(&table.total);
        assert_eq!(row.segment, "Total:");
        assert_eq!(row.bandwidth, "NA");
        assert_eq!(row.capacity, "NA");
        assert_eq!(row.utilization, "NA");
    }
}
