// kpireport-api: Async Rust client for the PRTG HTTP API (sensor table + historic data)

pub mod auth;
pub mod client;
pub mod error;
pub mod historic;
pub mod models;
pub mod sensors;
pub mod transport;

pub use auth::{ApiCredentials, ApiSecret};
pub use client::PrtgClient;
pub use error::Error;
pub use historic::HistoricQuery;
pub use models::{HistoricData, HistoricSample, SensorRecord, SensorTable, SpeedChannel};
pub use transport::{TlsMode, TransportConfig};
