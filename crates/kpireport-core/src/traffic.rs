// ── Traffic normalization ──
//
// Speed channels arrive in PRTG's raw unit; a fixed factor turns them
// into megabits per second.

use kpireport_api::{HistoricSample, SpeedChannel};

/// Raw PRTG speed unit to Mb/s.
pub const RAW_TO_MBPS: f64 = 0.000_008;

/// Convert the chosen channel of every sample to Mb/s.
///
/// Samples without a usable value are skipped, not zero-filled, so the
/// result may be shorter than the input or empty.
pub fn normalize(samples: &[HistoricSample], channel: SpeedChannel) -> Vec<f64> {
    samples
        .iter()
        .filter_map(|sample| sample.speed(channel))
        .map(|raw| raw * RAW_TO_MBPS)
        .collect()
}

/// Both channels of one window, normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowTraffic {
    pub inbound: Vec<f64>,
    pub outbound: Vec<f64>,
}

impl WindowTraffic {
    pub fn from_samples(samples: &[HistoricSample]) -> Self {
        Self {
            inbound: normalize(samples, SpeedChannel::Inbound),
            outbound: normalize(samples, SpeedChannel::Outbound),
        }
    }

    /// The series a sensor is measured on; no fallback to the other channel.
    pub fn series(&self, upstream: bool) -> &[f64] {
        if upstream { &self.outbound } else { &self.inbound }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn samples(value: serde_json::Value) -> Vec<HistoricSample> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn skips_empty_and_missing_values() {
        let s = samples(json!([
            { "Traffic In (speed)": 125_000_000 },
            { "Traffic In (speed)": "" },
            {},
            { "Traffic In (speed)": "250000000" },
            { "Traffic In (speed)": "n/a" },
        ]));
        let out = normalize(&s, SpeedChannel::Inbound);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 1000.0).abs() < 1e-9);
        assert!((out[1] - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn every_value_is_scaled() {
        let raws = [1.0, 12_345.0, 99_999_999.0];
        let s: Vec<HistoricSample> = raws
            .iter()
            .map(|r| serde_json::from_value(json!({ "Traffic Out (speed)": r })).unwrap())
            .collect();
        let out = normalize(&s, SpeedChannel::Outbound);
        for (raw, mbps) in raws.iter().zip(&out) {
            assert!((raw * RAW_TO_MBPS - mbps).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn direction_has_no_fallback() {
        let traffic = WindowTraffic {
            inbound: vec![1.0, 2.0],
            outbound: vec![],
        };
        assert!(traffic.series(true).is_empty());
        assert_eq!(traffic.series(false), &[1.0, 2.0]);
    }
}
