//! Tracing subscriber setup.
//!
//! Structured logging via `tracing` with an fmt layer and `EnvFilter`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log filter (default: `selection_engine=info`)

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "selection_engine=info";

/// Initialize the tracing subscriber.
///
/// Call once at startup, before any spans or events are emitted. Logs go to
/// stderr so the stdout reply stream stays clean.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}
