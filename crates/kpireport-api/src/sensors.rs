// Sensor table endpoint
//
// `table.json?content=sensors` narrowed to the three columns the report
// needs, filtered server-side by tag and sorted by device name.

use tracing::debug;

use crate::client::PrtgClient;
use crate::error::Error;
use crate::models::{SensorRecord, SensorTable};

const ENDPOINT: &str = "table.json";

impl PrtgClient {
    /// List every sensor carrying `filter_tag`, ordered by device name.
    ///
    /// `GET /api/table.json?content=sensors&output=json&columns=objid,device,tags&filter_tags={tag}&sortby=device`
    pub async fn list_sensors(&self, filter_tag: &str) -> Result<Vec<SensorRecord>, Error> {
        let url = self.api_url(
            ENDPOINT,
            &[
                ("content", "sensors".to_owned()),
                ("output", "json".to_owned()),
                ("columns", "objid,device,tags".to_owned()),
                ("filter_tags", filter_tag.to_owned()),
                ("sortby", "device".to_owned()),
            ],
        )?;
        debug!(filter_tag, "listing sensors");

        let table: SensorTable = self.get_json(ENDPOINT, url).await?;
        debug!(count = table.sensors.len(), "sensor table received");
        Ok(table.sensors)
    }
}
