// ── Percentile reduction ──
//
// Linear interpolation between closest ranks: for `n` sorted values the
// p-th percentile sits at rank `p/100 * (n - 1)`. This is the convention
// most numeric libraries default to. The report shows the ceiling as a
// whole number of Mb/s.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A percentile in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentile(u8);

impl Percentile {
    pub const DEFAULT: Percentile = Percentile(99);

    pub fn new(value: u8) -> Result<Self, CoreError> {
        if value > 100 {
            return Err(CoreError::ValidationFailed {
                message: format!("percentile must be between 0 and 100, got {value}"),
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Percentile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Percentile {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percentile> for u8 {
    fn from(p: Percentile) -> Self {
        p.0
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Interpolated percentile of `values`, or `None` when there are none.
///
/// NaN samples are ignored.
pub fn percentile(values: &[f64], p: Percentile) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let rank = f64::from(p.get()) / 100.0 * f64::from(u32::try_from(sorted.len() - 1).ok()?);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    let (lo, hi) = (rank.floor() as usize, rank.ceil() as usize);
    let lower = *sorted.get(lo)?;
    let upper = *sorted.get(hi)?;
    Some(lower + (upper - lower) * (rank - rank.floor()))
}

/// `ceil(percentile(values, p))`, or `None` for an empty series.
pub fn reduce(values: &[f64], p: Percentile) -> Option<u64> {
    let value = percentile(values, p)?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
    let whole = value.ceil().max(0.0) as u64;
    Some(whole)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tens() -> Vec<f64> {
        (1..=10).map(|i| f64::from(i) * 10.0).collect()
    }

    #[test]
    fn empty_series_is_not_available() {
        assert_eq!(percentile(&[], Percentile::DEFAULT), None);
        assert_eq!(reduce(&[], Percentile::DEFAULT), None);
    }

    #[test]
    fn matches_linear_interpolation_reference() {
        // [10, 20, ..., 100]: rank 8.91 -> 90 + 0.91 * 10
        let p99 = percentile(&tens(), Percentile::DEFAULT).unwrap();
        assert!((p99 - 99.1).abs() < 1e-9);
        assert_eq!(reduce(&tens(), Percentile::DEFAULT), Some(100));

        assert_eq!(reduce(&tens(), Percentile::new(50).unwrap()), Some(55));
        assert_eq!(reduce(&tens(), Percentile::new(0).unwrap()), Some(10));
        assert_eq!(reduce(&tens(), Percentile::new(100).unwrap()), Some(100));
    }

    #[test]
    fn order_of_input_does_not_matter() {
        let mut shuffled = tens();
        shuffled.reverse();
        shuffled.swap(2, 7);
        assert_eq!(reduce(&shuffled, Percentile::DEFAULT), reduce(&tens(), Percentile::DEFAULT));
    }

    #[test]
    fn single_value_is_its_own_percentile() {
        assert_eq!(reduce(&[41.2], Percentile::new(75).unwrap()), Some(42));
    }

    #[test]
    fn percentile_bounds_are_validated() {
        assert!(Percentile::new(100).is_ok());
        assert!(Percentile::new(101).is_err());
        assert_eq!(Percentile::default().to_string(), "P99");
    }
}
