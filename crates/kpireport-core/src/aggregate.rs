// ── Segment aggregation ──
//
// Core sensors sharing a `kpi_seg` value fold into one summary row. Groups
// keep first-seen order so the summary lists segments the way the detail
// block meets them. Aggregation runs after every row is built, so no
// synchronization is needed even though window fetches are concurrent.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::model::{ReportRow, SegmentSummary, SummaryTable, WINDOW_COUNT};

/// Label of the grand-total row.
pub const TOTAL_LABEL: &str = "Total:";

/// What one core sensor adds to its segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentContribution {
    pub segment: String,
    pub bandwidth_mbps: [Option<f64>; WINDOW_COUNT],
    pub limit_mbps: Option<f64>,
}

impl SegmentContribution {
    /// The contribution of `row`, if it belongs to a core segment.
    pub fn from_row(row: &ReportRow) -> Option<Self> {
        if !row.is_core {
            return None;
        }
        Some(Self {
            segment: row.segment.clone()?,
            bandwidth_mbps: row.traffic_mbps(),
            limit_mbps: row.circuit_max_limit_mbps,
        })
    }
}

/// Accumulates contributions and produces the summary block.
#[derive(Debug, Default)]
pub struct SegmentAggregator {
    groups: IndexMap<String, SegmentSummary>,
}

impl SegmentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, contribution: SegmentContribution) {
        if contribution.limit_mbps.is_none() {
            warn!(
                segment = %contribution.segment,
                "core sensor has no kpi_cktmaxlimit; counting bandwidth only"
            );
        }
        if contribution.bandwidth_mbps[0].is_none() {
            debug!(
                segment = %contribution.segment,
                "core sensor has no traffic in the primary window; counting capacity only"
            );
        }

        let group = self
            .groups
            .entry(contribution.segment.clone())
            .or_insert_with(|| SegmentSummary::empty(contribution.segment.clone()));
        group.absorb(&SegmentSummary {
            segment: contribution.segment,
            bandwidth_mbps: contribution.bandwidth_mbps,
            capacity_mbps: contribution.limit_mbps.unwrap_or(0.0),
        });
    }

    pub fn add_row(&mut self, row: &ReportRow) {
        if let Some(contribution) = SegmentContribution::from_row(row) {
            self.add(contribution);
        }
    }

    pub fn finish(self) -> SummaryTable {
        let mut total = SegmentSummary::empty(TOTAL_LABEL);
        for group in self.groups.values() {
            total.absorb(group);
        }
        SummaryTable {
            segments: self.groups.into_values().collect(),
            total,
        }
    }
}

/// Summarize every core row of a finished run.
pub fn aggregate<'a>(rows: impl IntoIterator<Item = &'a ReportRow>) -> SummaryTable {
    let mut aggregator = SegmentAggregator::new();
    for row in rows {
        aggregator.add_row(row);
    }
    aggregator.finish()
}
