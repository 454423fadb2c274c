use serde::Serialize;
use serde_json::Value as JsonValue;

use catalog_events::{Event, EventBus, EventEnvelope, EventSink, SinkError};

/// Sink that publishes each event as an `EventEnvelope<JsonValue>` on a bus.
///
/// The bus must not block on publish (the in-memory bus never does).
#[derive(Debug, Clone)]
pub struct BusEventSink<B> {
    bus: B,
}

impl<B> BusEventSink<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<E, B> EventSink<E> for BusEventSink<B>
where
    E: Event + Serialize,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    fn publish(&self, event: E) -> Result<(), SinkError> {
        let envelope = EventEnvelope::from_event(&event)?;
        self.bus
            .publish(envelope)
            .map_err(|e| SinkError::Unavailable(format!("{e:?}")))
    }
}
