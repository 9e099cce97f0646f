// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines
    )
)]

//! Selection Engine - Core Library
//!
//! Offloads windowed-range data selection to a worker task so an interactive
//! plotting client never blocks while large on-disk series are filtered and
//! downsampled.
//!
//! # Architecture
//!
//! The worker owns the selection provider for its entire lifetime and talks
//! to the controller exclusively over a duplex message channel:
//!
//! ```text
//! controller ──WindowRequest──> WindowWorker ──> SelectionProvider
//! controller <──WorkerReply──── WindowWorker <── SelectionProvider
//! ```
//!
//! Three rules give the protocol its shape:
//!
//! - **Latest-wins coalescing**: when the controller outruns the worker, the
//!   worker drains its backlog without blocking and answers only the most
//!   recent query. Stale requests never reach the provider.
//! - **Margin expansion**: bounded windows are padded by 20% of their width
//!   on each side before querying, pre-fetching data for smooth pan/zoom.
//! - **Fail-fast termination**: malformed requests and provider failures end
//!   the worker instead of producing a guessed or malformed response. `Stop`
//!   followed by `StopAck` is the only clean shutdown path.

/// Engine configuration loading and validation.
pub mod config;

/// Worker error taxonomy.
pub mod error;

/// Channel messages exchanged with the controller.
pub mod protocol;

/// Selection data model and the provider port.
pub mod selection;

/// Tracing subscriber setup.
pub mod telemetry;

/// The window worker loop and controller handle.
pub mod worker;

pub use config::{ChannelConfig, EngineConfig, SeriesConfig, load_config};
pub use error::WorkerError;
pub use protocol::{
    RangeRequest, SelectionFrame, WINDOW_MARGIN, WindowRequest, WorkerReply, expand_window,
};
pub use selection::{
    AxisKind, AxisValue, MemorySelector, ProviderError, Selection, SelectionProvider, XAxisSpec,
    YSeries,
};
pub use worker::{SelectionHandle, WindowWorker, spawn};
