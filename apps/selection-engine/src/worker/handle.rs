//! Controller-side handle over the duplex channel.
//!
//! The plotting client holds a [`SelectionHandle`] and nothing else. Because
//! the worker coalesces its backlog, a caller must not assume a response
//! exists for every request it sent; it should read only the most recent
//! reply it cares about, which is what [`SelectionHandle::latest`] does.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::error::WorkerError;
use crate::protocol::{WindowRequest, WorkerReply};

/// The controller half of the selection protocol.
pub struct SelectionHandle {
    requests: mpsc::Sender<WindowRequest>,
    replies: mpsc::Receiver<WorkerReply>,
}

impl SelectionHandle {
    /// Wrap a channel pair connected to a worker.
    #[must_use]
    pub fn new(
        requests: mpsc::Sender<WindowRequest>,
        replies: mpsc::Receiver<WorkerReply>,
    ) -> Self {
        Self { requests, replies }
    }

    /// Send a raw request.
    pub async fn send(&self, request: WindowRequest) -> Result<(), WorkerError> {
        self.requests
            .send(request)
            .await
            .map_err(|_| WorkerError::ChannelClosed)
    }

    /// Ask for the visible window `[start, stop]`, in fractional seconds
    /// since epoch. The worker queries a margin-expanded superset.
    pub async fn request_window(&self, start: f64, stop: f64) -> Result<(), WorkerError> {
        self.send(WindowRequest::Window {
            start: Some(start),
            stop: Some(stop),
        })
        .await
    }

    /// Ask for the full series.
    pub async fn request_all(&self) -> Result<(), WorkerError> {
        self.send(WindowRequest::Window {
            start: None,
            stop: None,
        })
        .await
    }

    /// Ask the worker to shut down; it answers with a final
    /// [`WorkerReply::StopAck`].
    pub async fn stop(&self) -> Result<(), WorkerError> {
        self.send(WindowRequest::Stop).await
    }

    /// Receive the next reply. `None` means the worker terminated; whether
    /// that was clean depends on whether a `StopAck` preceded it.
    pub async fn recv(&mut self) -> Option<WorkerReply> {
        self.replies.recv().await
    }

    /// Drain already-delivered replies without blocking and return the
    /// newest, if any. Superseded replies are discarded.
    pub fn latest(&mut self) -> Option<WorkerReply> {
        let mut latest = None;
        loop {
            match self.replies.try_recv() {
                Ok(reply) => latest = Some(reply),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return latest,
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn latest_discards_superseded_replies() {
        let (request_tx, _request_rx) = mpsc::channel(4);
        let (reply_tx, reply_rx) = mpsc::channel(4);
        let mut handle = SelectionHandle::new(request_tx, reply_rx);

        reply_tx.send(WorkerReply::Empty).await.unwrap();
        reply_tx.send(WorkerReply::StopAck).await.unwrap();

        assert_eq!(handle.latest(), Some(WorkerReply::StopAck));
        assert_eq!(handle.latest(), None);
    }

    #[tokio::test]
    async fn send_to_a_gone_worker_reports_closed_channel() {
        let (request_tx, request_rx) = mpsc::channel(4);
        let (_reply_tx, reply_rx) = mpsc::channel(4);
        let handle = SelectionHandle::new(request_tx, reply_rx);

        drop(request_rx);
        assert!(matches!(
            handle.request_all().await,
            Err(WorkerError::ChannelClosed)
        ));
    }
}
