// file: src/stream/delivery.rs
// description: forwards progress events to a sink while the batch runs, then delivers the outcome
// reference: polling consumer over the progress channel with a grace drain

use crate::config::StreamConfig;
use crate::error::{BatchError, StreamError};
use crate::models::{BatchResult, ProgressEvent};
use crate::stream::channel::{ProgressReceiver, Received};
use crate::stream::completion::CompletionTracker;
use crate::stream::frame::StreamFrame;
use crate::stream::sink::StreamSink;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub type BatchTask = JoinHandle<Result<BatchResult, BatchError>>;

/// What the consumer saw.
#[derive(Debug)]
pub struct DeliveryOutcome {
    pub progress_frames: usize,
    /// Events that arrived after every item had already finished.
    pub late_events: usize,
    pub result: Result<BatchResult, BatchError>,
}

pub struct StreamDelivery {
    poll_timeout: Duration,
    grace_timeout: Duration,
    cancel: Option<CancellationToken>,
}

impl StreamDelivery {
    pub fn new(poll_timeout: Duration, grace_timeout: Duration) -> Self {
        Self {
            poll_timeout,
            grace_timeout,
            cancel: None,
        }
    }

    /// `cancel` is only wired in when the config asks for it.
    pub fn from_config(config: &StreamConfig, cancel: CancellationToken) -> Self {
        let delivery = Self::new(config.poll_timeout(), config.grace_timeout());
        if config.cancel_on_disconnect {
            delivery.cancel_on_disconnect(cancel)
        } else {
            delivery
        }
    }

    pub fn cancel_on_disconnect(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Streams every event of a `total`-item batch, then exactly one
    /// results or error frame. A sink failure ends delivery early; the
    /// batch task is then left to finish on its own unless cancellation
    /// is wired in.
    pub async fn run<S>(
        &self,
        total: usize,
        mut receiver: ProgressReceiver,
        mut task: BatchTask,
        sink: &mut S,
    ) -> Result<DeliveryOutcome, StreamError>
    where
        S: StreamSink + ?Sized,
    {
        let mut forwarder = Forwarder {
            sink,
            tracker: CompletionTracker::new(total),
            progress_frames: 0,
            late_events: 0,
            late: false,
        };

        match self.deliver(&mut forwarder, &mut receiver, &mut task).await {
            Ok(result) => Ok(DeliveryOutcome {
                progress_frames: forwarder.progress_frames,
                late_events: forwarder.late_events,
                result,
            }),
            Err(err) => {
                warn!("Stopping progress delivery: {}", err);
                if let Some(cancel) = &self.cancel {
                    info!("Cancelling batch after consumer failure");
                    cancel.cancel();
                }
                Err(err)
            }
        }
    }

    async fn deliver<S>(
        &self,
        forwarder: &mut Forwarder<'_, S>,
        receiver: &mut ProgressReceiver,
        task: &mut BatchTask,
    ) -> Result<Result<BatchResult, BatchError>, StreamError>
    where
        S: StreamSink + ?Sized,
    {
        while !forwarder.tracker.is_complete() {
            if task.is_finished() {
                debug!("Batch task finished before every item reported a terminal event");
                break;
            }

            match receiver.recv_timeout(self.poll_timeout).await {
                Received::Event(event) => forwarder.forward(event).await?,
                Received::Timeout => continue,
                Received::Closed => break,
            }
        }

        if forwarder.tracker.is_complete() {
            forwarder.late = true;
            while let Received::Event(event) = receiver.recv_timeout(self.grace_timeout).await {
                forwarder.forward(event).await?;
            }
        }

        while let Some(event) = receiver.try_recv() {
            forwarder.forward(event).await?;
        }

        let outcome = match task.await {
            Ok(result) => result,
            Err(join_error) => {
                error!("Batch task did not complete: {}", join_error);
                Err(BatchError::TaskFailed(join_error.to_string()))
            }
        };

        let frame = match &outcome {
            Ok(batch) => StreamFrame::Results { data: batch.clone() },
            Err(err) => StreamFrame::Error {
                message: err.to_string(),
            },
        };
        forwarder.sink.send(&frame).await?;

        Ok(outcome)
    }
}

struct Forwarder<'a, S: ?Sized> {
    sink: &'a mut S,
    tracker: CompletionTracker,
    progress_frames: usize,
    late_events: usize,
    late: bool,
}

impl<S> Forwarder<'_, S>
where
    S: StreamSink + ?Sized,
{
    async fn forward(&mut self, event: ProgressEvent) -> Result<(), StreamError> {
        if self.late {
            self.late_events += 1;
        }
        self.tracker.record(&event);
        self.sink.send(&StreamFrame::Progress { data: event }).await?;
        self.progress_frames += 1;
        Ok(())
    }
}
