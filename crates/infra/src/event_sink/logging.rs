use serde::Serialize;
use tracing::info;

use catalog_events::{Event, EventSink, SinkError};

/// Sink that records every event as an `info` log line.
///
/// Default sink when no bus or stream is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventSink;

impl LoggingEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl<E> EventSink<E> for LoggingEventSink
where
    E: Event + Serialize,
{
    fn publish(&self, event: E) -> Result<(), SinkError> {
        let payload = serde_json::to_string(&event)?;
        info!(
            event_type = event.event_type(),
            event_version = event.version(),
            occurred_at = %event.occurred_at(),
            payload = %payload,
            "event published"
        );
        Ok(())
    }
}
