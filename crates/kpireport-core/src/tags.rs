// ── Tag extraction ──
//
// PRTG sensors carry their report metadata as free-text tags, e.g.
// `kpi_bandwidth kpi_seg=DIA kpi_choke=Circuit kpi_chokelimit=1000`.
// Each token is split at its first `=` and the key must equal an allowed
// tag exactly, so `kpi_choke` never shadows `kpi_chokelimit`. A bare token
// naming an allowed tag is a flag. Nothing here fails: unknown tokens are
// ignored and malformed values read as absent.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

/// The tags the report understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TagKey {
    Segment,
    ChokePoint,
    ChokePointLimit,
    CircuitMaxLimit,
    SiteId,
    TrafficDirection,
    Edge,
}

impl TagKey {
    pub const ALL: [TagKey; 7] = [
        TagKey::Segment,
        TagKey::ChokePoint,
        TagKey::ChokePointLimit,
        TagKey::CircuitMaxLimit,
        TagKey::SiteId,
        TagKey::TrafficDirection,
        TagKey::Edge,
    ];

    /// Tag name as written in PRTG.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Segment => "kpi_seg",
            Self::ChokePoint => "kpi_choke",
            Self::ChokePointLimit => "kpi_chokelimit",
            Self::CircuitMaxLimit => "kpi_cktmaxlimit",
            Self::SiteId => "kpi_siteid",
            Self::TrafficDirection => "kpi_trafficdirection",
            Self::Edge => "edge",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.tag() == tag)
    }
}

/// Value of one extracted tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TagValue {
    /// `key=value`; may be empty for a token like `kpi_seg=`.
    Text(String),
    /// Bare `key` with no `=`.
    Flag,
}

impl TagValue {
    /// Non-empty text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

/// Map every allowed tag present in `tags` to its value. Later tokens win.
pub fn extract_tags(tags: &str) -> BTreeMap<TagKey, TagValue> {
    let mut found = BTreeMap::new();
    for token in tags.split_whitespace() {
        let (name, value) = match token.split_once('=') {
            Some((name, value)) => (name, TagValue::Text(value.to_owned())),
            None => (token, TagValue::Flag),
        };
        if let Some(key) = TagKey::from_tag(name) {
            found.insert(key, value);
        }
    }
    found
}

/// Structured view of a sensor's tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SensorProperties {
    pub segment: Option<String>,
    pub choke_point: Option<String>,
    pub choke_point_limit_mbps: Option<f64>,
    pub circuit_max_limit_mbps: Option<f64>,
    /// Site id with `#` already rendered as a space.
    pub site_id: Option<String>,
    pub traffic_direction: Option<String>,
    pub is_edge: bool,
}

impl SensorProperties {
    pub fn parse(tags: &str) -> Self {
        let map = extract_tags(tags);
        let text = |key: TagKey| map.get(&key).and_then(TagValue::text).map(str::to_owned);

        Self {
            segment: text(TagKey::Segment),
            choke_point: text(TagKey::ChokePoint),
            choke_point_limit_mbps: limit(&map, TagKey::ChokePointLimit),
            circuit_max_limit_mbps: limit(&map, TagKey::CircuitMaxLimit),
            site_id: text(TagKey::SiteId).map(|s| s.replace('#', " ")),
            traffic_direction: text(TagKey::TrafficDirection),
            is_edge: match map.get(&TagKey::Edge) {
                Some(TagValue::Flag) => true,
                Some(value) => value.text().is_some(),
                None => false,
            },
        }
    }

    /// `kpi_trafficdirection=up` selects the outbound channel.
    pub fn is_upstream(&self) -> bool {
        self.traffic_direction.as_deref() == Some("up")
    }

    /// Core sensors feed the segment summary.
    pub fn is_core(&self) -> bool {
        self.segment.as_deref().is_some_and(|s| s.contains("Core"))
    }
}

fn limit(map: &BTreeMap<TagKey, TagValue>, key: TagKey) -> Option<f64> {
    let raw = map.get(&key)?.text()?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            warn!(tag = key.tag(), value = raw, "ignoring non-numeric limit");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn full_tag_string() {
        let props = SensorProperties::parse(
            "kpi_bandwidth kpi_seg=DIA kpi_choke=Circuit1 kpi_chokelimit=1000 kpi_cktmaxlimit=500",
        );
        assert_eq!(
            props,
            SensorProperties {
                segment: Some("DIA".into()),
                choke_point: Some("Circuit1".into()),
                choke_point_limit_mbps: Some(1000.0),
                circuit_max_limit_mbps: Some(500.0),
                site_id: None,
                traffic_direction: None,
                is_edge: false,
            }
        );
    }

    #[test]
    fn choke_and_chokelimit_do_not_shadow_each_other() {
        let map = extract_tags("kpi_chokelimit=250 kpi_choke=Router");
        assert_eq!(map.get(&TagKey::ChokePoint), Some(&TagValue::Text("Router".into())));
        assert_eq!(map.get(&TagKey::ChokePointLimit), Some(&TagValue::Text("250".into())));
    }

    #[test]
    fn bare_edge_is_a_flag() {
        let map = extract_tags("kpi_bandwidth edge");
        assert_eq!(map.get(&TagKey::Edge), Some(&TagValue::Flag));
        assert!(SensorProperties::parse("kpi_bandwidth edge").is_edge);
    }

    #[test]
    fn unknown_and_malformed_tokens_are_tolerated() {
        let props = SensorProperties::parse("foo=bar kpi_seg= = kpi_segment=X kpi_cktmaxlimit=fast kpi_choke");
        assert_eq!(props, SensorProperties::default());
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let map = extract_tags("kpi_choke=a=b");
        assert_eq!(map.get(&TagKey::ChokePoint), Some(&TagValue::Text("a=b".into())));
    }

    #[test]
    fn site_id_hashes_become_spaces() {
        let props = SensorProperties::parse("kpi_siteid=Acme#Tower#2");
        assert_eq!(props.site_id.as_deref(), Some("Acme Tower 2"));
    }

    #[test]
    fn direction_and_core_detection() {
        let props = SensorProperties::parse("kpi_seg=CoreEast kpi_trafficdirection=up");
        assert!(props.is_upstream());
        assert!(props.is_core());

        let props = SensorProperties::parse("kpi_seg=DIA kpi_trafficdirection=down");
        assert!(!props.is_upstream());
        assert!(!props.is_core());
    }

    #[test]
    fn empty_string_yields_nothing() {
        assert!(extract_tags("").is_empty());
        assert!(extract_tags("   \t ").is_empty());
    }
}
