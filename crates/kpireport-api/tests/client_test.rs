// Integration tests for `PrtgClient` using wiremock.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kpireport_api::{ApiCredentials, Error, HistoricQuery, PrtgClient, SpeedChannel};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PrtgClient) {
    let server = MockServer::start().await;
    let client = PrtgClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
        ApiCredentials::password("prtgadmin", SecretString::from("s3cret".to_owned())),
    );
    (server, client)
}

fn march_query(sensor_id: i64) -> HistoricQuery {
    HistoricQuery {
        sensor_id,
        avg_secs: 3600,
        start: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
    }
}

// ── Sensor table ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sensors_sends_table_params() {
    let (server, client) = setup().await;

    let body = json!({
        "prtg-version": "22.1.74.1869",
        "treesize": 2,
        "sensors": [
            { "objid": 2001, "device": "ACA Edge (160.3.214.2)", "tags": "kpi_bandwidth kpi_seg=DIA" },
            { "objid": 2002, "device": "BCB Core (10.0.0.1)", "tags": "kpi_bandwidth kpi_seg=CoreEast" },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/table.json"))
        .and(query_param("content", "sensors"))
        .and(query_param("output", "json"))
        .and(query_param("columns", "objid,device,tags"))
        .and(query_param("filter_tags", "kpi_bandwidth"))
        .and(query_param("sortby", "device"))
        .and(query_param("username", "prtgadmin"))
        .and(query_param("password", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let sensors = client.list_sensors("kpi_bandwidth").await.unwrap();

    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].objid, 2001);
    assert_eq!(sensors[0].device, "ACA Edge (160.3.214.2)");
    assert_eq!(sensors[1].tags, "kpi_bandwidth kpi_seg=CoreEast");
}

#[tokio::test]
async fn test_list_sensors_non_200_is_status_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/table.json"))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
        .mount(&server)
        .await;

    let err = client.list_sensors("kpi_bandwidth").await.unwrap_err();
    assert!(
        matches!(err, Error::Status { status: 400, ref endpoint } if endpoint == "table.json"),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_unauthorized_maps_to_authentication() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/table.json"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_sensors("kpi_bandwidth").await.unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }), "got {err:?}");
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_invalid_json_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/table.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let err = client.list_sensors("kpi_bandwidth").await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>login</html>"),
        other => panic!("expected deserialization error, got {other:?}"),
    }
}

// ── Historic data ───────────────────────────────────────────────────

#[tokio::test]
async fn test_historic_data_params_and_samples() {
    let (server, client) = setup().await;

    let body = json!({
        "prtg-version": "22.1.74.1869",
        "treesize": 3,
        "histdata": [
            { "datetime": "3/1/2024 12:00:00 AM - 1:00:00 AM", "Traffic In (speed)": 12_500_000, "Traffic Out (speed)": "2500000" },
            { "datetime": "3/1/2024 1:00:00 AM - 2:00:00 AM", "Traffic In (speed)": "", "Traffic Out (speed)": "" },
            { "datetime": "3/1/2024 2:00:00 AM - 3:00:00 AM", "Traffic In (speed)": 25_000_000, "coverage": "100 %" },
        ]
    });

    Mock::given(method("GET"))
        .and(path("/api/historicdata.json"))
        .and(query_param("id", "2001"))
        .and(query_param("avg", "3600"))
        .and(query_param("sdate", "2024-03-01-00-00"))
        .and(query_param("edate", "2024-03-14-23-59"))
        .and(query_param("usecaption", "1"))
        .and(query_param("username", "prtgadmin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let data = client.historic_data(&march_query(2001)).await.unwrap();

    assert_eq!(data.treesize, Some(3));
    let inbound: Vec<Option<f64>> = data
        .histdata
        .iter()
        .map(|s| s.speed(SpeedChannel::Inbound))
        .collect();
    assert_eq!(inbound, vec![Some(12_500_000.0), None, Some(25_000_000.0)]);
    assert_eq!(data.histdata[0].speed(SpeedChannel::Outbound), Some(2_500_000.0));
    assert_eq!(data.histdata[2].speed(SpeedChannel::Outbound), None);
}

#[tokio::test]
async fn test_historic_503_without_retries_fails_fast() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/historicdata.json"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.historic_data(&march_query(7)).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let (server, client) = setup().await;
    let client = client.with_retries(2, Duration::from_millis(5));

    Mock::given(method("GET"))
        .and(path("/api/historicdata.json"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/historicdata.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "treesize": 0, "histdata": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let data = client.historic_data(&march_query(7)).await.unwrap();
    assert!(data.histdata.is_empty());
}

#[tokio::test]
async fn test_persistent_failure_exhausts_retries() {
    let (server, client) = setup().await;
    let client = client.with_retries(2, Duration::from_millis(5));

    Mock::given(method("GET"))
        .and(path("/api/historicdata.json"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&server)
        .await;

    let err = client.historic_data(&march_query(7)).await.unwrap_err();
    assert_eq!(err.status(), Some(502));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (server, client) = setup().await;
    let client = client.with_retries(3, Duration::from_millis(5));

    Mock::given(method("GET"))
        .and(path("/api/historicdata.json"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.historic_data(&march_query(7)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ── Credential hygiene ──────────────────────────────────────────────

#[tokio::test]
async fn test_transport_error_masks_password() {
    // Nothing listens on the discard port.
    let client = PrtgClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
        ApiCredentials::password("ops", SecretString::from("TOPSECRETPW".to_owned())),
    );

    let err = client.list_sensors("kpi_bandwidth").await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    let shown = format!("{err} {err:?}");
    assert!(!shown.contains("TOPSECRETPW"), "secret leaked: {shown}");
    assert!(shown.contains("password=***"), "url not kept: {shown}");
}
