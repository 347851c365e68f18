// file: src/stream/mod.rs
// description: progress channel, completion tally and the stream delivery loop
// reference: internal module structure

pub mod channel;
pub mod completion;
pub mod delivery;
pub mod frame;
pub mod sink;

pub use channel::{ProgressReceiver, ProgressSender, Received, progress_channel};
pub use completion::CompletionTracker;
pub use delivery::{BatchTask, DeliveryOutcome, StreamDelivery};
pub use frame::StreamFrame;
pub use sink::{SseSink, StreamSink, TerminalSink};
