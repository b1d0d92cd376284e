// ── Report runner ──
//
// Sequences one report: list sensors, fetch each sensor's four windows,
// build its row, then aggregate. Sensors run one after another; the
// windows of a sensor are fetched concurrently over the shared client.
// The first error aborts the run and nothing is handed to a writer.

use futures_util::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use kpireport_api::{HistoricQuery, PrtgClient};

use crate::aggregate::SegmentAggregator;
use crate::builder::build_row;
use crate::config::ReportConfig;
use crate::error::CoreError;
use crate::fetch::fetch_sensors;
use crate::model::{ReportRow, Sensor, SensorId, SummaryTable, WINDOW_COUNT, WindowSet};
use crate::percentile::Percentile;
use crate::traffic::WindowTraffic;

/// Everything a writer needs.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub windows: WindowSet,
    pub percentile: Percentile,
    pub debug: bool,
    pub rows: Vec<ReportRow>,
    pub summary: SummaryTable,
}

/// Progress notifications, for progress bars and logs.
#[derive(Debug, Clone, Copy)]
pub enum RunEvent<'a> {
    SensorsListed { count: usize },
    SensorStarted { index: usize, sensor: &'a Sensor },
    SensorFinished { index: usize, row: &'a ReportRow },
}

pub struct ReportRunner<'a> {
    client: &'a PrtgClient,
    config: &'a ReportConfig,
}

impl<'a> ReportRunner<'a> {
    pub fn new(client: &'a PrtgClient, config: &'a ReportConfig) -> Self {
        Self { client, config }
    }

    pub fn windows(&self) -> WindowSet {
        WindowSet::staggered(self.config.primary_window)
    }

    /// Run the whole report.
    pub async fn run(&self, mut on_event: impl FnMut(RunEvent<'_>)) -> Result<Report, CoreError> {
        let windows = self.windows();
        let sensors = fetch_sensors(
            self.client,
            &self.config.filter_tag,
            self.config.sensor_id.map(SensorId),
        )
        .await?;
        on_event(RunEvent::SensorsListed {
            count: sensors.len(),
        });

        let mut rows = Vec::with_capacity(sensors.len());
        let mut aggregator = SegmentAggregator::new();
        for (index, sensor) in sensors.iter().enumerate() {
            on_event(RunEvent::SensorStarted { index, sensor });
            let traffic = self.fetch_windows(sensor, &windows).await?;
            let row = build_row(sensor, &traffic, self.config.percentile);
            debug!(sensor_id = %sensor.id, max_traffic = ?row.max_traffic_mbps, "row built");
            aggregator.add_row(&row);
            on_event(RunEvent::SensorFinished { index, row: &row });
            rows.push(row);
        }

        let summary = aggregator.finish();
        info!(
            sensors = rows.len(),
            segments = summary.segments.len(),
            "report computed"
        );
        Ok(Report {
            windows,
            percentile: self.config.percentile,
            debug: self.config.debug,
            rows,
            summary,
        })
    }

    /// Fetch and normalize every window of one sensor.
    pub async fn fetch_windows(
        &self,
        sensor: &Sensor,
        windows: &WindowSet,
    ) -> Result<[WindowTraffic; WINDOW_COUNT], CoreError> {
        let requests = windows.iter().map(|window| {
            let query = HistoricQuery {
                sensor_id: sensor.id.0,
                avg_secs: self.config.avg_secs,
                start: window.range.start,
                end: window.range.end,
            };
            async move {
                let data = self.client.historic_data(&query).await?;
                Ok::<_, CoreError>(WindowTraffic::from_samples(&data.histdata))
            }
        });

        let fetched = try_join_all(requests).await?;
        <[WindowTraffic; WINDOW_COUNT]>::try_from(fetched).map_err(|got| {
            CoreError::InvalidResponse {
                message: format!("expected {WINDOW_COUNT} windows, got {}", got.len()),
            }
        })
    }
}
