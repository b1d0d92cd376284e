//! `kpireport sensors`: what a report run would cover, without fetching
//! any historic data.

use serde::Serialize;
use tabled::Tabled;

use kpireport_config::Config;
use kpireport_core::{Sensor, SensorId, SensorProperties, fetch_sensors};

use crate::cli::{GlobalOpts, SensorsArgs};
use crate::config::resolve_connection;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SensorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Choke Point")]
    choke_point: String,
    #[tabled(rename = "Choke (Mb/s)")]
    choke_limit: String,
    #[tabled(rename = "Circuit (Mb/s)")]
    circuit_limit: String,
    #[tabled(rename = "Dir")]
    direction: String,
    #[tabled(rename = "Edge")]
    edge: String,
}

fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

impl From<&Sensor> for SensorRow {
    fn from(s: &Sensor) -> Self {
        let p = &s.properties;
        Self {
            id: s.id.to_string(),
            device: s.device_name().to_owned(),
            location: or_dash(p.site_id.as_deref()),
            segment: or_dash(p.segment.as_deref()),
            choke_point: or_dash(p.choke_point.as_deref()),
            choke_limit: p.choke_point_limit_mbps.map_or_else(|| "-".into(), |v| v.to_string()),
            circuit_limit: p.circuit_max_limit_mbps.map_or_else(|| "-".into(), |v| v.to_string()),
            direction: if p.is_upstream() { "up" } else { "down" }.into(),
            edge: if p.is_edge { "yes" } else { "" }.into(),
        }
    }
}

/// JSON shape of one listed sensor.
#[derive(Serialize)]
struct SensorJson<'a> {
    id: SensorId,
    device: &'a str,
    address: Option<&'a str>,
    tags: &'a str,
    properties: &'a SensorProperties,
}

pub async fn handle(args: &SensorsArgs, global: &GlobalOpts, config: &Config) -> Result<(), CliError> {
    let connection = resolve_connection(global, config)?;
    let client = connection.connect()?;
    let filter_tag = global
        .filter_tag
        .as_deref()
        .unwrap_or(&config.defaults.filter_tag);

    let sensors = fetch_sensors(&client, filter_tag, args.sensorid.map(SensorId)).await?;

    let rendered = if args.json {
        let items: Vec<SensorJson<'_>> = sensors
            .iter()
            .map(|s| SensorJson {
                id: s.id,
                device: s.device_name(),
                address: s.address(),
                tags: &s.tags,
                properties: &s.properties,
            })
            .collect();
        output::render_json(&items)?
    } else {
        let rows: Vec<SensorRow> = sensors.iter().map(SensorRow::from).collect();
        output::render_table(&rows)
    };
    output::print_output(&rendered, global.quiet);
    Ok(())
}
