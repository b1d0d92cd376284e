// Historic data endpoint
//
// One call returns a sensor's averaged samples for a closed date range.
// PRTG takes `sdate`/`edate` as `YYYY-MM-DD-HH-MM-SS`; we ask for whole days,
// midnight of the start through 23:59 of the end.

use chrono::NaiveDate;
use tracing::debug;

use crate::client::PrtgClient;
use crate::error::Error;
use crate::models::HistoricData;

const ENDPOINT: &str = "historicdata.json";

/// Parameters of one historic-data request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricQuery {
    pub sensor_id: i64,
    /// Averaging interval in seconds (`avg=`).
    pub avg_secs: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl HistoricQuery {
    fn sdate(&self) -> String {
        format!("{}-00-00", self.start.format("%Y-%m-%d"))
    }

    fn edate(&self) -> String {
        format!("{}-23-59", self.end.format("%Y-%m-%d"))
    }
}

impl PrtgClient {
    /// Fetch averaged samples for one sensor over one date range.
    ///
    /// `GET /api/historicdata.json?id={id}&avg={secs}&sdate={start}-00-00&edate={end}-23-59&usecaption=1`
    pub async fn historic_data(&self, query: &HistoricQuery) -> Result<HistoricData, Error> {
        let url = self.api_url(
            ENDPOINT,
            &[
                ("id", query.sensor_id.to_string()),
                ("avg", query.avg_secs.to_string()),
                ("sdate", query.sdate()),
                ("edate", query.edate()),
                ("usecaption", "1".to_owned()),
            ],
        )?;
        debug!(
            sensor_id = query.sensor_id,
            start = %query.start,
            end = %query.end,
            "fetching historic data"
        );

        let data: HistoricData = self.get_json(ENDPOINT, url).await?;
        debug!(
            sensor_id = query.sensor_id,
            samples = data.histdata.len(),
            "historic data received"
        );
        Ok(data)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn date_params_cover_whole_days() {
        let q = HistoricQuery {
            sensor_id: 1,
            avg_secs: 3600,
            start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
        };
        assert_eq!(q.sdate(), "2024-03-01-00-00");
        assert_eq!(q.edate(), "2024-03-14-23-59");
    }
}
