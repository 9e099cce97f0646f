//! Channel protocol between the controller and the window worker.
//!
//! Two message types per direction. Requests carry either a visible window
//! (both bounds optional, but their presence must agree) or the `Stop`
//! sentinel. Replies carry a normalized selection, an explicit empty marker,
//! or the `StopAck` sentinel.
//!
//! All messages are serde-serializable so any transport that preserves
//! message boundaries and per-direction FIFO ordering works as a substrate:
//! in-process channels, pipes, or serialized IPC.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::WorkerError;
use crate::selection::YSeries;

/// Fraction of the visible window width added on each side of a bounded
/// query. Pre-fetches adjacent data so small pans and zooms don't require a
/// fresh round-trip.
pub const WINDOW_MARGIN: f64 = 0.2;

// =============================================================================
// Request Direction
// =============================================================================

/// Message sent by the controller to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WindowRequest {
    /// Select data for a visible window. Both bounds absent selects the
    /// full series; both present selects a half-open time window. Bounds
    /// are fractional seconds since epoch.
    Window {
        /// Start of the visible range, if bounded.
        start: Option<f64>,
        /// Stop of the visible range, if bounded.
        stop: Option<f64>,
    },
    /// Ask the worker to shut down. Acknowledged with [`WorkerReply::StopAck`].
    Stop,
}

/// A validated range request, translated from the wire form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeRequest {
    /// Select the full series.
    All,
    /// Select a half-open window. Ordering of the endpoints is the caller's
    /// business; the worker trusts its visible-range semantics.
    Window {
        /// Start of the visible range (seconds since epoch).
        start: f64,
        /// Stop of the visible range (seconds since epoch).
        stop: f64,
    },
}

impl RangeRequest {
    /// Validate endpoint presence: both set or both unset.
    ///
    /// A one-sided window is a programming error on the controller side and
    /// is rejected, never coerced.
    pub fn from_bounds(start: Option<f64>, stop: Option<f64>) -> Result<Self, WorkerError> {
        match (start, stop) {
            (None, None) => Ok(Self::All),
            (Some(start), Some(stop)) => Ok(Self::Window { start, stop }),
            _ => Err(WorkerError::MalformedRequest),
        }
    }
}

/// Expand a visible window by [`WINDOW_MARGIN`] of its width on each side.
///
/// The expanded query always covers strictly more than the visible range,
/// so the plotting client can pan and zoom locally without re-querying at
/// every micro-scroll.
#[must_use]
pub fn expand_window(start: f64, stop: f64) -> (f64, f64) {
    let margin = WINDOW_MARGIN * (stop - start);
    (start - margin, stop + margin)
}

// =============================================================================
// Reply Direction
// =============================================================================

/// Message sent by the worker to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkerReply {
    /// A non-empty selection for the most recent query the worker observed.
    Selection(SelectionFrame),
    /// The most recent query selected no data. Sent explicitly so the
    /// controller never has to infer emptiness from a missing first element.
    Empty,
    /// Acknowledgment of [`WindowRequest::Stop`]; the worker has exited.
    StopAck,
}

/// A selection in transport shape: X normalized to fractional seconds since
/// epoch, Y-series passed through from the provider untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionFrame {
    /// Normalized X values, monotonically non-decreasing.
    pub xs: Vec<f64>,
    /// Y-key to paired min/max sequences, aligned index-for-index with `xs`.
    pub ys: HashMap<String, YSeries>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test]
    fn from_bounds_unbounded() {
        assert_eq!(RangeRequest::from_bounds(None, None).unwrap(), RangeRequest::All);
    }

    #[test]
    fn from_bounds_bounded() {
        assert_eq!(
            RangeRequest::from_bounds(Some(4.5), Some(13.5)).unwrap(),
            RangeRequest::Window { start: 4.5, stop: 13.5 }
        );
    }

    #[test]
    fn from_bounds_rejects_one_sided() {
        assert!(matches!(
            RangeRequest::from_bounds(Some(4.5), None),
            Err(WorkerError::MalformedRequest)
        ));
        assert!(matches!(
            RangeRequest::from_bounds(None, Some(13.5)),
            Err(WorkerError::MalformedRequest)
        ));
    }

    #[test_case(4.5, 13.5, 2.7, 15.3; "typical window")]
    #[test_case(0.0, 10.0, -2.0, 12.0; "zero start")]
    #[test_case(5.0, 5.0, 5.0, 5.0; "degenerate window")]
    fn expand_window_adds_margin(start: f64, stop: f64, expected_start: f64, expected_stop: f64) {
        let (queried_start, queried_stop) = expand_window(start, stop);
        assert!((queried_start - expected_start).abs() < 1e-9);
        assert!((queried_stop - expected_stop).abs() < 1e-9);
    }

    #[test]
    fn expand_window_trusts_inverted_input() {
        // Ordering is not validated; a negative width yields a negative margin.
        let (queried_start, queried_stop) = expand_window(10.0, 4.0);
        assert!((queried_start - 11.2).abs() < 1e-9);
        assert!((queried_stop - 2.8).abs() < 1e-9);
    }

    #[test]
    fn request_serde_round_trip() {
        let window = WindowRequest::Window {
            start: Some(4.5),
            stop: Some(13.5),
        };
        let json = serde_json::to_string(&window).unwrap();
        assert_eq!(json, r#"{"type":"window","start":4.5,"stop":13.5}"#);
        assert_eq!(serde_json::from_str::<WindowRequest>(&json).unwrap(), window);

        let stop = serde_json::to_string(&WindowRequest::Stop).unwrap();
        assert_eq!(stop, r#"{"type":"stop"}"#);
    }

    #[test]
    fn reply_serde_round_trip() {
        let reply = WorkerReply::Selection(SelectionFrame {
            xs: vec![1.0, 5.0],
            ys: HashMap::from([(
                "b".to_string(),
                YSeries {
                    mins: vec![2.0, 6.0],
                    maxs: vec![2.0, 6.0],
                },
            )]),
        });
        let json = serde_json::to_string(&reply).unwrap();
        assert_eq!(serde_json::from_str::<WorkerReply>(&json).unwrap(), reply);

        let ack = serde_json::to_string(&WorkerReply::StopAck).unwrap();
        assert_eq!(ack, r#"{"type":"stop_ack"}"#);
    }
}
