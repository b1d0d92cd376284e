// ── Row builder ──
//
// Combines a sensor's tags with its four windows of normalized traffic
// into one `ReportRow`. Pure and synchronous; the runner feeds it.

use crate::model::row::ratio;
use crate::model::{ReportRow, Sensor, WINDOW_COUNT};
use crate::percentile::{Percentile, reduce};
use crate::traffic::WindowTraffic;

/// Build the detail row for `sensor`.
///
/// The measured channel follows `kpi_trafficdirection`: `up` reads the
/// outbound series, anything else the inbound one, with no fallback when
/// the chosen series is empty.
pub fn build_row(
    sensor: &Sensor,
    traffic: &[WindowTraffic; WINDOW_COUNT],
    percentile: Percentile,
) -> ReportRow {
    let props = &sensor.properties;
    let upstream = props.is_upstream();

    let max_traffic_mbps = traffic
        .each_ref()
        .map(|window| reduce(window.series(upstream), percentile));

    let mut row = ReportRow {
        sensor_id: sensor.id,
        device_name: sensor.device_name().to_owned(),
        segment: props.segment.clone(),
        is_edge: props.is_edge,
        is_core: props.is_core(),
        location: props.site_id.clone(),
        max_traffic_mbps,
        choke_point: props.choke_point.clone(),
        choke_point_limit_mbps: props.choke_point_limit_mbps,
        circuit_max_limit_mbps: props.circuit_max_limit_mbps,
        circuit_utilization: None,
        choke_utilization: [None; WINDOW_COUNT],
        max_usage_plan: None,
        notes: None,
        action: None,
    };

    row.circuit_utilization = ratio(row.primary_traffic_mbps(), row.circuit_max_limit_mbps);
    row.choke_utilization = row
        .traffic_mbps()
        .map(|traffic| ratio(traffic, row.choke_point_limit_mbps));
    row
}
