// ── Report time windows ──
//
// Four trailing 14-day windows staggered by 7 days. Window 0 is the
// primary range (default: the two weeks ending yesterday); windows 1-3
// are window 0 shifted back by 7, 14 and 21 days, so an explicit
// `--start/--end` moves all four together.

use std::fmt;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::CoreError;

/// Number of windows in every report.
pub const WINDOW_COUNT: usize = 4;

/// Width of the default primary window in days.
pub const WINDOW_DAYS: u64 = 14;

/// How far each window sits behind window 0.
const WINDOW_OFFSETS_DAYS: [u64; WINDOW_COUNT] = [0, 7, 14, 21];

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::ValidationFailed {
                message: format!("start date {start} is after end date {end}"),
            });
        }
        Ok(Self { start, end })
    }

    /// The default primary window: `today - 14d` through `today - 1d`.
    pub fn trailing(today: NaiveDate) -> Self {
        Self {
            start: today - Days::new(WINDOW_DAYS),
            end: today - Days::new(1),
        }
    }

    /// Same width, `days` earlier.
    pub fn shifted_back(self, days: u64) -> Self {
        Self {
            start: self.start - Days::new(days),
            end: self.end - Days::new(days),
        }
    }

    /// Header label, `MM/DD - MM/DD`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.start.format("%m/%d"), self.end.format("%m/%d"))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.start, self.end)
    }
}

/// One of the report's windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub index: usize,
    pub range: DateRange,
}

/// The full set of windows for a run, index 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowSet {
    windows: [TimeWindow; WINDOW_COUNT],
}

impl WindowSet {
    /// Derive all windows from the primary range.
    pub fn staggered(primary: DateRange) -> Self {
        let windows = std::array::from_fn(|index| TimeWindow {
            index,
            range: primary.shifted_back(WINDOW_OFFSETS_DAYS[index]),
        });
        Self { windows }
    }

    pub fn primary(&self) -> &TimeWindow {
        &self.windows[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeWindow> {
        self.windows.iter()
    }

    pub fn labels(&self) -> [String; WINDOW_COUNT] {
        std::array::from_fn(|i| self.windows[i].range.label())
    }
}
