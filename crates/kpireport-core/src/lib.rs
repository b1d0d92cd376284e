// kpireport-core: Report computation between kpireport-api and the CLI.

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod error;
pub mod fetch;
pub mod model;
pub mod percentile;
pub mod runner;
pub mod tags;
pub mod traffic;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{SegmentAggregator, SegmentContribution, TOTAL_LABEL, aggregate};
pub use builder::build_row;
pub use config::{
    ConnectionConfig, Credentials, DEFAULT_AVG_SECS, DEFAULT_FILTER_TAG, ReportConfig, RunConfig,
    TlsVerification,
};
pub use error::CoreError;
pub use kpireport_api::PrtgClient;
pub use fetch::fetch_sensors;
pub use percentile::Percentile;
pub use runner::{Report, ReportRunner, RunEvent};
pub use tags::{SensorProperties, TagKey, TagValue, extract_tags};
pub use traffic::{RAW_TO_MBPS, WindowTraffic, normalize};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    DateRange, ReportRow, SegmentSummary, Sensor, SensorId, SummaryTable, TimeWindow, WINDOW_COUNT,
    WindowSet,
};
