//! Selection data model.
//!
//! A selection pairs an ordered X sequence with paired min/max Y-series, the
//! shape the plotting client draws directly. The X axis may be temporal or
//! numeric depending on the underlying series; [`Selection::normalized_xs`]
//! flattens either to fractional seconds since epoch for transport.

pub mod memory;
pub mod provider;

pub use memory::MemorySelector;
pub use provider::{ProviderError, SelectionProvider};

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while normalizing a selection for transport.
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The X sequence mixes temporal and numeric values, violating the
    /// provider's homogeneity contract.
    #[error("selection X axis mixes temporal and numeric values")]
    MixedAxis,
}

/// The representation of a series' X axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Timestamps, carried as `chrono` UTC datetimes.
    Timestamp,
    /// Plain numeric values (already fractional seconds since epoch).
    Numeric,
}

/// Name and representation of a series' X axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XAxisSpec {
    /// Column key of the X axis in the underlying series.
    pub key: String,
    /// Representation the provider stores X values in.
    pub kind: AxisKind,
}

/// A single X value, temporal or numeric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    /// A temporal X value.
    Time(DateTime<Utc>),
    /// A numeric X value, in fractional seconds since epoch.
    Number(f64),
}

impl AxisValue {
    /// Convert fractional seconds since epoch to the given axis kind.
    ///
    /// Timestamps are carried at microsecond precision; bounds outside the
    /// representable range clamp to the temporal extremes, which the
    /// provider treats as unbounded ends.
    #[must_use]
    pub fn from_seconds(kind: AxisKind, seconds: f64) -> Self {
        match kind {
            AxisKind::Numeric => Self::Number(seconds),
            AxisKind::Timestamp => {
                let micros = (seconds * 1_000_000.0).round();
                let clamped = micros.clamp(i64::MIN as f64, i64::MAX as f64) as i64;
                let time = DateTime::from_timestamp_micros(clamped).unwrap_or(if micros < 0.0 {
                    DateTime::<Utc>::MIN_UTC
                } else {
                    DateTime::<Utc>::MAX_UTC
                });
                Self::Time(time)
            }
        }
    }

    /// Flatten to fractional seconds since epoch.
    #[must_use]
    pub fn as_seconds(self) -> f64 {
        match self {
            Self::Time(time) => time.timestamp_micros() as f64 / 1_000_000.0,
            Self::Number(value) => value,
        }
    }

    /// The axis kind this value belongs to.
    #[must_use]
    pub const fn kind(self) -> AxisKind {
        match self {
            Self::Time(_) => AxisKind::Timestamp,
            Self::Number(_) => AxisKind::Numeric,
        }
    }
}

/// Paired min/max sample sequences for one Y-key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YSeries {
    /// Per-bucket minima, aligned index-for-index with the X sequence.
    pub mins: Vec<f64>,
    /// Per-bucket maxima, aligned index-for-index with the X sequence.
    pub maxs: Vec<f64>,
}

/// An ordered X sequence paired with the Y-series selected for it.
///
/// Invariant (provider contract): for every Y-key,
/// `mins.len() == maxs.len() == xs.len()`, and `xs` is homogeneously typed
/// and monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// Ordered X values.
    pub xs: Vec<AxisValue>,
    /// Y-key to min/max series.
    pub ys: HashMap<String, YSeries>,
}

impl Selection {
    /// Whether the selection holds no data points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Normalize the X sequence to fractional seconds since epoch.
    ///
    /// The first element decides the conversion rule; homogeneous typing
    /// across the whole sequence is a precondition of the provider contract,
    /// and a mid-sequence kind switch is reported as an error rather than
    /// silently coerced.
    pub fn normalized_xs(&self) -> Result<Vec<f64>, SelectionError> {
        let Some(first) = self.xs.first() else {
            return Ok(Vec::new());
        };
        let kind = first.kind();
        self.xs
            .iter()
            .map(|x| {
                if x.kind() == kind {
                    Ok(x.as_seconds())
                } else {
                    Err(SelectionError::MixedAxis)
                }
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_xs_pass_through() {
        let selection = Selection {
            xs: vec![AxisValue::Number(1.0), AxisValue::Number(5.0)],
            ys: HashMap::new(),
        };
        assert_eq!(selection.normalized_xs().unwrap(), vec![1.0, 5.0]);
    }

    #[test]
    fn temporal_xs_flatten_to_seconds() {
        let selection = Selection {
            xs: vec![
                AxisValue::Time(DateTime::from_timestamp_micros(1_500_000).unwrap()),
                AxisValue::Time(DateTime::from_timestamp_micros(2_250_000).unwrap()),
            ],
            ys: HashMap::new(),
        };
        assert_eq!(selection.normalized_xs().unwrap(), vec![1.5, 2.25]);
    }

    #[test]
    fn mixed_axis_is_rejected() {
        let selection = Selection {
            xs: vec![
                AxisValue::Number(1.0),
                AxisValue::Time(DateTime::UNIX_EPOCH),
            ],
            ys: HashMap::new(),
        };
        assert!(matches!(
            selection.normalized_xs(),
            Err(SelectionError::MixedAxis)
        ));
    }

    #[test]
    fn empty_selection_normalizes_to_nothing() {
        let selection = Selection {
            xs: Vec::new(),
            ys: HashMap::new(),
        };
        assert!(selection.is_empty());
        assert!(selection.normalized_xs().unwrap().is_empty());
    }

    #[test]
    fn from_seconds_round_trips_at_microsecond_precision() {
        let value = AxisValue::from_seconds(AxisKind::Timestamp, 4.5);
        assert_eq!(value.kind(), AxisKind::Timestamp);
        assert!((value.as_seconds() - 4.5).abs() < 1e-6);

        let value = AxisValue::from_seconds(AxisKind::Numeric, 4.5);
        assert_eq!(value, AxisValue::Number(4.5));
    }

    #[test]
    fn axis_value_deserializes_untagged() {
        let number: AxisValue = serde_json::from_str("4.5").unwrap();
        assert_eq!(number, AxisValue::Number(4.5));

        let time: AxisValue = serde_json::from_str(r#""1970-01-01T00:00:01.500Z""#).unwrap();
        assert_eq!(
            time,
            AxisValue::Time(DateTime::from_timestamp_micros(1_500_000).unwrap())
        );
    }
}
