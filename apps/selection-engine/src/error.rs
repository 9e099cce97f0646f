//! Worker error taxonomy.
//!
//! Every internal error terminates the worker loop; there are no per-request
//! error responses. The controller distinguishes "worker answered" from
//! "worker terminated" purely by channel state: a closed reply channel with
//! no preceding `StopAck` means abnormal termination.

use thiserror::Error;

use crate::selection::{ProviderError, SelectionError};

/// Errors that terminate the window worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// Exactly one of the window endpoints was present. The worker cannot
    /// infer caller intent safely, so it aborts rather than guessing.
    #[error("malformed range request: start and stop must both be set or both be unset")]
    MalformedRequest,

    /// The selection provider failed (I/O error, missing series, type
    /// mismatch). Not retried; the controller decides whether to restart.
    #[error("selection provider failed: {0}")]
    Provider(#[from] ProviderError),

    /// The provider returned a selection violating its data contract.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// A channel closed before a `Stop` was requested.
    #[error("channel closed before stop was requested")]
    ChannelClosed,
}
