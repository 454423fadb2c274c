//! Fire-and-forget notification capability.
//!
//! A sink is the only thing a command needs to announce that something
//! happened. Whether the event ends up in a log line, an in-process bus or a
//! Redis stream is the sink's business.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The downstream channel is closed, full or unreachable.
    #[error("event sink unavailable: {0}")]
    Unavailable(String),

    #[error("event serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Narrow publish-only capability.
///
/// `publish` must return promptly: implementations either complete in-process
/// or hand the event to a bounded, non-blocking channel. No delivery
/// confirmation and no ordering across calls.
pub trait EventSink<E>: Send + Sync {
    fn publish(&self, event: E) -> Result<(), SinkError>;
}

impl<E, S> EventSink<E> for Arc<S>
where
    S: EventSink<E> + ?Sized,
{
    fn publish(&self, event: E) -> Result<(), SinkError> {
        (**self).publish(event)
    }
}
