// file: src/stream/sink.rs
// description: consumers of stream frames: SSE writer and terminal progress bars
// reference: async writer sink and indicatif rendering

use crate::error::StreamError;
use crate::pipeline::ProgressTracker;
use crate::stream::frame::StreamFrame;
use async_trait::async_trait;
use std::io::ErrorKind;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

#[async_trait]
pub trait StreamSink: Send {
    async fn send(&mut self, frame: &StreamFrame) -> Result<(), StreamError>;
}

/// Writes `data: <json>\n\n` frames and flushes after each one.
pub struct SseSink<W> {
    writer: W,
    frames_written: usize,
}

impl<W> SseSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn transport_error(err: std::io::Error) -> StreamError {
    match err.kind() {
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted => {
            StreamError::Disconnected
        }
        _ => StreamError::Transport(err),
    }
}

#[async_trait]
impl<W> StreamSink for SseSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, frame: &StreamFrame) -> Result<(), StreamError> {
        let encoded = frame.to_sse()?;
        self.writer
            .write_all(encoded.as_bytes())
            .await
            .map_err(transport_error)?;
        self.writer.flush().await.map_err(transport_error)?;
        self.frames_written += 1;
        Ok(())
    }
}

/// Renders frames as progress bars on the terminal.
pub struct TerminalSink {
    tracker: ProgressTracker,
}

impl TerminalSink {
    pub fn new(tracker: ProgressTracker) -> Self {
        Self { tracker }
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }
}

#[async_trait]
impl StreamSink for TerminalSink {
    async fn send(&mut self, frame: &StreamFrame) -> Result<(), StreamError> {
        match frame {
            StreamFrame::Progress { data } => self.tracker.observe(data),
            StreamFrame::Results { data } => {
                debug!("Received ranked results for {} documents", data.count);
                self.tracker.finish();
            }
            StreamFrame::Error { message } => {
                warn!("Batch failed: {}", message);
                self.tracker.finish();
            }
        }
        Ok(())
    }
}
