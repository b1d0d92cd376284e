// ── Sensor domain type ──

use std::fmt;

use serde::{Deserialize, Serialize};

use kpireport_api::SensorRecord;

use crate::tags::SensorProperties;

/// PRTG object id of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(pub i64);

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SensorId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// One monitored bandwidth interface, fetched fresh every run.
#[derive(Debug, Clone, Serialize)]
pub struct Sensor {
    pub id: SensorId,
    /// Parent device as PRTG shows it, e.g. `ACA Edge (160.3.214.2)`.
    pub device_label: String,
    /// Raw space-delimited tag string.
    pub tags: String,
    /// Structured view of `tags`.
    pub properties: SensorProperties,
}

impl Sensor {
    pub fn new(id: impl Into<SensorId>, device_label: impl Into<String>, tags: impl Into<String>) -> Self {
        let tags = tags.into();
        let properties = SensorProperties::parse(&tags);
        Self {
            id: id.into(),
            device_label: device_label.into(),
            tags,
            properties,
        }
    }

    /// Device name without the trailing ` (address)` part.
    pub fn device_name(&self) -> &str {
        match self.device_label.rfind(" (") {
            Some(idx) if self.device_label.ends_with(')') => &self.device_label[..idx],
            _ => &self.device_label,
        }
    }

    /// Address embedded in the device label, if any.
    pub fn address(&self) -> Option<&str> {
        let idx = self.device_label.rfind(" (")?;
        self.device_label
            .get(idx + 2..)?
            .strip_suffix(')')
            .filter(|addr| !addr.is_empty())
    }
}

impl From<SensorRecord> for Sensor {
    fn from(record: SensorRecord) -> Self {
        Self::new(record.objid, record.device, record.tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_label_splits_name_and_address() {
        let sensor = Sensor::new(14398, "ACA Edge (160.3.214.2)", "");
        assert_eq!(sensor.device_name(), "ACA Edge");
        assert_eq!(sensor.address(), Some("160.3.214.2"));
    }

    #[test]
    fn device_label_without_address_is_kept_whole() {
        let sensor = Sensor::new(1, "Core Router", "");
        assert_eq!(sensor.device_name(), "Core Router");
        assert_eq!(sensor.address(), None);
    }

    #[test]
    fn properties_are_parsed_from_tags() {
        let sensor = Sensor::new(1, "X (1.1.1.1)", "kpi_bandwidth kpi_seg=DIA edge");
        assert_eq!(sensor.properties.segment.as_deref(), Some("DIA"));
        assert!(sensor.properties.is_edge);
    }
}
