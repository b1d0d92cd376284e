// ── Segment summary domain type ──

use serde::Serialize;

use super::row::ratio;
use super::window::WINDOW_COUNT;

/// Totals for one core segment, or the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentSummary {
    pub segment: String,
    /// Summed traffic per window; `None` when no contributor had data.
    pub bandwidth_mbps: [Option<f64>; WINDOW_COUNT],
    /// Summed circuit limits of the contributors that carry one.
    pub capacity_mbps: f64,
}

impl SegmentSummary {
    pub fn empty(segment: impl Into<String>) -> Self {
        Self {
            segment: segment.into(),
            bandwidth_mbps: [None; WINDOW_COUNT],
            capacity_mbps: 0.0,
        }
    }

    /// Window 0 bandwidth, the figure the summary headlines.
    pub fn total_bandwidth_mbps(&self) -> Option<f64> {
        self.bandwidth_mbps[0]
    }

    /// Window 0 bandwidth over capacity; `None` for zero capacity.
    pub fn utilization(&self) -> Option<f64> {
        self.window_utilization(0)
    }

    /// Gross utilization of one window.
    pub fn window_utilization(&self, window: usize) -> Option<f64> {
        let bandwidth = self.bandwidth_mbps.get(window).copied().flatten();
        ratio(bandwidth, Some(self.capacity_mbps))
    }

    pub(crate) fn absorb(&mut self, other: &SegmentSummary) {
        for (mine, theirs) in self.bandwidth_mbps.iter_mut().zip(other.bandwidth_mbps) {
            if let Some(value) = theirs {
                *mine = Some(mine.unwrap_or(0.0) + value);
            }
        }
        self.capacity_mbps += other.capacity_mbps;
    }
}

/// The summary block: one row per core segment in first-seen order, plus
/// the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    pub segments: Vec<SegmentSummary>,
    pub total: SegmentSummary,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
