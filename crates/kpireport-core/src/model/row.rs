// ── Report row domain type ──

use serde::Serialize;

use super::sensor::SensorId;
use super::window::WINDOW_COUNT;

/// One sensor's line in the detail block.
///
/// `None` everywhere means "not available": a missing tag or an empty
/// series is never reported as zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub sensor_id: SensorId,
    /// Device name without its address, shown in debug mode.
    pub device_name: String,
    pub segment: Option<String>,
    pub is_edge: bool,
    /// Feeds the core segment summary.
    pub is_core: bool,

    pub location: Option<String>,
    /// Percentile traffic per window, whole Mb/s.
    pub max_traffic_mbps: [Option<u64>; WINDOW_COUNT],
    pub choke_point: Option<String>,
    pub choke_point_limit_mbps: Option<f64>,
    pub circuit_max_limit_mbps: Option<f64>,
    /// Window 0 traffic over the circuit limit.
    pub circuit_utilization: Option<f64>,
    /// Each window's traffic over the choke point limit.
    pub choke_utilization: [Option<f64>; WINDOW_COUNT],

    // Filled in by hand after the report is generated.
    pub max_usage_plan: Option<String>,
    pub notes: Option<String>,
    pub action: Option<String>,
}

impl ReportRow {
    /// Traffic of window 0 in Mb/s.
    pub fn primary_traffic_mbps(&self) -> Option<f64> {
        self.max_traffic_mbps[0].map(mbps)
    }

    /// Traffic of every window in Mb/s.
    pub fn traffic_mbps(&self) -> [Option<f64>; WINDOW_COUNT] {
        self.max_traffic_mbps.map(|w| w.map(mbps))
    }
}

/// `value / limit`, unless either side is missing or the limit is zero.
pub fn ratio(value: Option<f64>, limit: Option<f64>) -> Option<f64> {
    match (value, limit) {
        (Some(v), Some(l)) if l != 0.0 => Some(v / l),
        _ => None,
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn mbps(whole: u64) -> f64 {
    whole as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_guards_missing_and_zero() {
        assert_eq!(ratio(Some(250.0), Some(500.0)), Some(0.5));
        assert_eq!(ratio(None, Some(500.0)), None);
        assert_eq!(ratio(Some(250.0), None), None);
        assert_eq!(ratio(Some(250.0), Some(0.0)), None);
    }
}
