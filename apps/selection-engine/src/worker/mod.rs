//! The window worker.
//!
//! A long-lived task that owns the selection provider, drains the request
//! channel with latest-wins semantics, translates each surviving request
//! into a provider query, and emits the result back over the reply channel:
//!
//! ```text
//! SelectionHandle ──WindowRequest──> WindowWorker ──> SelectionProvider
//! SelectionHandle <──WorkerReply──── WindowWorker <── SelectionProvider
//! ```
//!
//! On each iteration the worker blocks for the next message, then consumes
//! everything already queued without blocking, keeping only the newest. A
//! `Stop` found anywhere in the backlog is acknowledged immediately and
//! terminates the loop; queries superseded during the drain never reach the
//! provider.

pub mod handle;

pub use handle::SelectionHandle;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, error, info, warn};

use crate::error::WorkerError;
use crate::protocol::{RangeRequest, SelectionFrame, WindowRequest, WorkerReply, expand_window};
use crate::selection::{AxisValue, Selection, SelectionProvider};

/// Default capacity for each direction of the duplex channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 32;

/// The worker half of the selection protocol.
pub struct WindowWorker {
    provider: Box<dyn SelectionProvider>,
    requests: mpsc::Receiver<WindowRequest>,
    replies: mpsc::Sender<WorkerReply>,
}

impl WindowWorker {
    /// Create a worker over an opened provider and a channel pair.
    #[must_use]
    pub fn new(
        provider: Box<dyn SelectionProvider>,
        requests: mpsc::Receiver<WindowRequest>,
        replies: mpsc::Sender<WorkerReply>,
    ) -> Self {
        Self {
            provider,
            requests,
            replies,
        }
    }

    /// Run the worker until a `Stop` arrives or an error terminates it.
    ///
    /// The provider is closed on every exit path; a close failure is logged
    /// but never masks the loop's own outcome.
    pub async fn run(mut self) -> Result<(), WorkerError> {
        info!("Window worker started");
        let outcome = self.serve().await;
        if let Err(close_error) = self.provider.close().await {
            warn!(error = %close_error, "Failed to close selection provider");
        }
        match &outcome {
            Ok(()) => info!("Window worker stopped"),
            Err(reason) => error!(error = %reason, "Window worker terminated"),
        }
        outcome
    }

    async fn serve(&mut self) -> Result<(), WorkerError> {
        loop {
            let Some(head) = self.requests.recv().await else {
                return Err(WorkerError::ChannelClosed);
            };

            let mut window = match head {
                WindowRequest::Stop => return self.acknowledge_stop().await,
                WindowRequest::Window { start, stop } => (start, stop),
            };

            // Latest-wins drain: everything already queued supersedes the
            // message in hand. A Stop short-circuits without touching the
            // stale query.
            loop {
                match self.requests.try_recv() {
                    Ok(WindowRequest::Stop) => return self.acknowledge_stop().await,
                    Ok(WindowRequest::Window { start, stop }) => window = (start, stop),
                    // Disconnection surfaces on the next blocking receive;
                    // the message in hand is still the newest.
                    Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
                }
            }

            let (start, stop) = window;
            let request = RangeRequest::from_bounds(start, stop)?;
            let selection = self.query(request).await?;

            let reply = if selection.is_empty() {
                debug!("Selected window holds no data");
                WorkerReply::Empty
            } else {
                WorkerReply::Selection(SelectionFrame {
                    xs: selection.normalized_xs()?,
                    ys: selection.ys,
                })
            };
            self.send(reply).await?;
        }
    }

    async fn query(&mut self, request: RangeRequest) -> Result<Selection, WorkerError> {
        match request {
            RangeRequest::All => {
                debug!("Selecting full series");
                Ok(self.provider.select_all().await?)
            }
            RangeRequest::Window { start, stop } => {
                let (queried_start, queried_stop) = expand_window(start, stop);
                debug!(
                    start,
                    stop, queried_start, queried_stop, "Selecting expanded window"
                );
                let kind = self.provider.x_kind();
                let selection = self
                    .provider
                    .select_range(
                        AxisValue::from_seconds(kind, queried_start),
                        AxisValue::from_seconds(kind, queried_stop),
                    )
                    .await?;
                Ok(selection)
            }
        }
    }

    async fn acknowledge_stop(&mut self) -> Result<(), WorkerError> {
        self.send(WorkerReply::StopAck).await?;
        info!("Window worker acknowledged stop");
        Ok(())
    }

    async fn send(&mut self, reply: WorkerReply) -> Result<(), WorkerError> {
        self.replies
            .send(reply)
            .await
            .map_err(|_| WorkerError::ChannelClosed)
    }
}

/// Spawn a worker over a fresh channel pair.
///
/// Returns the controller-side handle and the worker task. The task resolves
/// `Ok(())` only for a clean `Stop`/`StopAck` shutdown; any other outcome
/// carries the terminating [`WorkerError`].
#[must_use]
pub fn spawn(
    provider: Box<dyn SelectionProvider>,
    capacity: usize,
) -> (
    SelectionHandle,
    tokio::task::JoinHandle<Result<(), WorkerError>>,
) {
    let (request_tx, request_rx) = mpsc::channel(capacity);
    let (reply_tx, reply_rx) = mpsc::channel(capacity);
    let worker = WindowWorker::new(provider, request_rx, reply_tx);
    let task = tokio::spawn(worker.run());
    (SelectionHandle::new(request_tx, reply_rx), task)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::selection::{AxisKind, AxisValue, MemorySelector, YSeries};

    use super::*;

    fn fixture_provider() -> Box<dyn SelectionProvider> {
        let selector = MemorySelector::from_parts(
            AxisKind::Numeric,
            vec![AxisValue::Number(1.0), AxisValue::Number(2.0)],
            HashMap::from([(
                "y".to_string(),
                YSeries {
                    mins: vec![10.0, 20.0],
                    maxs: vec![10.0, 20.0],
                },
            )]),
        )
        .unwrap();
        Box::new(selector)
    }

    #[tokio::test]
    async fn stop_is_acknowledged_and_worker_exits_cleanly() {
        let (handle, task) = spawn(fixture_provider(), 8);
        handle.stop().await.unwrap();

        let mut handle = handle;
        assert_eq!(handle.recv().await, Some(WorkerReply::StopAck));
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn dropping_the_handle_terminates_abnormally() {
        let (handle, task) = spawn(fixture_provider(), 8);
        drop(handle);

        assert!(matches!(
            task.await.unwrap(),
            Err(WorkerError::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn full_series_request_answers_with_selection() {
        let (mut handle, task) = spawn(fixture_provider(), 8);
        handle.request_all().await.unwrap();

        match handle.recv().await {
            Some(WorkerReply::Selection(frame)) => {
                assert_eq!(frame.xs, vec![1.0, 2.0]);
                assert_eq!(frame.ys["y"].maxs, vec![10.0, 20.0]);
            }
            other => panic!("expected a selection, got {other:?}"),
        }

        handle.stop().await.unwrap();
        assert_eq!(handle.recv().await, Some(WorkerReply::StopAck));
        assert!(task.await.unwrap().is_ok());
    }
}
