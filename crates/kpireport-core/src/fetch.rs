// ── Sensor fetching ──

use tracing::{info, warn};

use kpireport_api::PrtgClient;

use crate::error::CoreError;
use crate::model::{Sensor, SensorId};

/// List the sensors carrying `filter_tag`, in the API's device order.
///
/// With `only`, the list is narrowed to that one sensor, or emptied when
/// it is not among the tagged sensors.
pub async fn fetch_sensors(
    client: &PrtgClient,
    filter_tag: &str,
    only: Option<SensorId>,
) -> Result<Vec<Sensor>, CoreError> {
    let records = client.list_sensors(filter_tag).await?;
    info!(count = records.len(), filter_tag, "sensor data queried");

    let sensors: Vec<Sensor> = records.into_iter().map(Sensor::from).collect();
    Ok(match only {
        Some(id) => {
            let matched: Vec<Sensor> = sensors.into_iter().filter(|s| s.id == id).collect();
            if matched.is_empty() {
                warn!(sensor_id = %id, filter_tag, "sensor not found among tagged sensors");
            }
            matched
        }
        None => sensors,
    })
}
