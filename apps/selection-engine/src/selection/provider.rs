//! The selection provider port.
//!
//! The storage engine that owns on-disk series data, samples them, and
//! downsamples to a target resolution is an external collaborator. The
//! worker consumes it through this narrow port and nothing else.

use async_trait::async_trait;
use thiserror::Error;

use super::{AxisKind, AxisValue, Selection};

/// Errors surfaced by a selection provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Failed to read series data.
    #[error("failed to read series data: {0}")]
    Io(#[from] std::io::Error),

    /// Series data could not be decoded.
    #[error("failed to decode series data: {0}")]
    Decode(#[from] serde_json::Error),

    /// A requested series key is not present in the data.
    #[error("series '{0}' not found")]
    MissingSeries(String),

    /// An axis value does not match the provider's X-axis kind.
    #[error("X axis value is {actual:?}, provider expects {expected:?}")]
    AxisType {
        /// The kind the provider stores X values in.
        expected: AxisKind,
        /// The kind that was supplied or found.
        actual: AxisKind,
    },

    /// Series sequences have inconsistent lengths.
    #[error("series shape is inconsistent: {0}")]
    Shape(String),
}

/// A queryable view over a directory of series data.
///
/// Opened once per worker lifetime and exclusively owned by the worker; the
/// worker closes it on every exit path.
///
/// # Contract
///
/// - The X sequence of every selection is homogeneously typed with kind
///   [`SelectionProvider::x_kind`] and monotonically non-decreasing.
/// - For every Y-key, `mins` and `maxs` are equal-length and aligned
///   index-for-index with the X sequence.
#[async_trait]
pub trait SelectionProvider: Send {
    /// The representation this provider stores X values in.
    fn x_kind(&self) -> AxisKind;

    /// Select the full series.
    async fn select_all(&mut self) -> Result<Selection, ProviderError>;

    /// Select the half-open range `[start, stop)`.
    async fn select_range(
        &mut self,
        start: AxisValue,
        stop: AxisValue,
    ) -> Result<Selection, ProviderError>;

    /// Release held resources. Called by the worker on every exit path.
    async fn close(&mut self) -> Result<(), ProviderError>;
}
