// ── Report domain model ──
//
// Canonical types a report run produces and consumes. Wire types from
// kpireport-api are converted into these at the boundary; writers in the
// CLI only ever see this module.

pub mod row;
pub mod sensor;
pub mod summary;
pub mod window;

// ── Re-exports ──────────────────────────────────────────────────────

pub use row::ReportRow;
pub use sensor::{Sensor, SensorId};
pub use summary::{SegmentSummary, SummaryTable};
pub use window::{DateRange, TimeWindow, WINDOW_COUNT, WindowSet};
