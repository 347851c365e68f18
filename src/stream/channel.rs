// file: src/stream/channel.rs
// description: single-producer FIFO carrying progress events from the batch task
// reference: tokio unbounded mpsc

use crate::models::ProgressEvent;
use crate::pipeline::ProgressSink;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProgressSender { tx }, ProgressReceiver { rx })
}

/// Producer half. Sending never blocks the batch.
#[derive(Debug, Clone)]
pub struct ProgressSender {
    tx: UnboundedSender<ProgressEvent>,
}

impl ProgressSink for ProgressSender {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            debug!("Progress receiver dropped, event discarded");
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum Received {
    Event(ProgressEvent),
    /// Nothing arrived within the poll timeout.
    Timeout,
    /// Every sender is gone and the queue is empty.
    Closed,
}

#[derive(Debug)]
pub struct ProgressReceiver {
    rx: UnboundedReceiver<ProgressEvent>,
}

impl ProgressReceiver {
    pub async fn recv_timeout(&mut self, limit: Duration) -> Received {
        match tokio::time::timeout(limit, self.rx.recv()).await {
            Ok(Some(event)) => Received::Event(event),
            Ok(None) => Received::Closed,
            Err(_) => Received::Timeout,
        }
    }

    /// Takes an already queued event without waiting.
    pub fn try_recv(&mut self) -> Option<ProgressEvent> {
        self.rx.try_recv().ok()
    }

    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}
