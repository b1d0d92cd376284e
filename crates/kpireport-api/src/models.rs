// PRTG API response types
//
// Models for `table.json` (sensor listings) and `historicdata.json`
// (averaged time series). Fields use `#[serde(default)]` liberally because
// PRTG omits columns it has no value for, and everything we do not model
// lands in `extra` untouched.

use serde::{Deserialize, Serialize};

// ── Sensor table ─────────────────────────────────────────────────────

/// Body of `GET /api/table.json?content=sensors`.
///
/// ```json
/// { "prtg-version": "22.1.74.1869", "treesize": 2,
///   "sensors": [{ "objid": 14398, "device": "ACA Edge (160.3.214.2)", "tags": "..." }] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorTable {
    #[serde(default, rename = "prtg-version")]
    pub prtg_version: Option<String>,
    #[serde(default)]
    pub treesize: Option<u64>,
    #[serde(default)]
    pub sensors: Vec<SensorRecord>,
}

/// One row of the sensor table, limited to the `objid,device,tags` columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRecord {
    pub objid: i64,
    #[serde(default)]
    pub device: String,
    /// Space-delimited tag string, e.g. `kpi_bandwidth kpi_seg=DIA kpi_chokelimit=1000`.
    #[serde(default)]
    pub tags: String,
    /// Catch-all for `*_raw` twins and any other columns.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Historic data ────────────────────────────────────────────────────

/// Body of `GET /api/historicdata.json` with `usecaption=1`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricData {
    #[serde(default)]
    pub treesize: Option<u64>,
    #[serde(default)]
    pub histdata: Vec<HistoricSample>,
}

/// Which speed channel of a traffic sensor to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedChannel {
    Inbound,
    Outbound,
}

impl SpeedChannel {
    /// Channel caption as emitted with `usecaption=1`.
    pub fn caption(self) -> &'static str {
        match self {
            Self::Inbound => "Traffic In (speed)",
            Self::Outbound => "Traffic Out (speed)",
        }
    }
}

/// One averaged interval of a traffic sensor.
///
/// Speeds arrive in PRTG's raw unit as a number, a numeric string, or `""`
/// when the interval has no data. Volume, downtime, and coverage columns are
/// kept in `extra` without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricSample {
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default, rename = "Traffic In (speed)")]
    pub traffic_in_speed: Option<serde_json::Value>,
    #[serde(default, rename = "Traffic Out (speed)")]
    pub traffic_out_speed: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HistoricSample {
    /// Raw speed for `channel`, or `None` when the field is missing, empty,
    /// or not a finite number.
    pub fn speed(&self, channel: SpeedChannel) -> Option<f64> {
        let raw = match channel {
            SpeedChannel::Inbound => self.traffic_in_speed.as_ref(),
            SpeedChannel::Outbound => self.traffic_out_speed.as_ref(),
        }?;
        let speed = match raw {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse().ok()
                }
            }
            _ => None,
        };
        speed.filter(|v| v.is_finite())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn speed_accepts_numbers_and_numeric_strings() {
        let sample: HistoricSample = serde_json::from_value(json!({
            "datetime": "3/1/2024 12:00:00 AM - 1:00:00 AM",
            "Traffic In (speed)": 125_000_000,
            "Traffic Out (speed)": " 2500.5 ",
            "coverage": "100 %"
        }))
        .unwrap();

        assert_eq!(sample.speed(SpeedChannel::Inbound), Some(125_000_000.0));
        assert_eq!(sample.speed(SpeedChannel::Outbound), Some(2500.5));
        assert!(sample.extra.contains_key("coverage"));
    }

    #[test]
    fn empty_or_missing_speed_is_none() {
        let sample: HistoricSample = serde_json::from_value(json!({
            "datetime": "3/1/2024",
            "Traffic In (speed)": ""
        }))
        .unwrap();

        assert_eq!(sample.speed(SpeedChannel::Inbound), None);
        assert_eq!(sample.speed(SpeedChannel::Outbound), None);
    }

    #[test]
    fn non_finite_speed_strings_are_none() {
        for raw in ["inf", "-inf", "NaN", "infinity"] {
            let sample: HistoricSample = serde_json::from_value(json!({
                "Traffic In (speed)": raw
            }))
            .unwrap();
            assert_eq!(sample.speed(SpeedChannel::Inbound), None, "{raw}");
        }
    }

    #[test]
    fn sensor_record_keeps_unknown_columns() {
        let record: SensorRecord = serde_json::from_value(json!({
            "objid": 14398,
            "objid_raw": 14398,
            "device": "ACA Edge (160.3.214.2)",
            "tags": "kpi_bandwidth kpi_seg=DIA"
        }))
        .unwrap();

        assert_eq!(record.objid, 14398);
        assert_eq!(record.device, "ACA Edge (160.3.214.2)");
        assert!(record.extra.contains_key("objid_raw"));
    }
}
