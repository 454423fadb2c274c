//! Redis Streams-backed event sink.
//!
//! `publish` never touches the network: envelopes go into a bounded in-process
//! queue and a dedicated worker thread appends them to the stream with `XADD`.
//! A full queue or a stopped worker is reported as `SinkError::Unavailable`.
//!
//! Stream entries carry these fields:
//! - `event_id`, `event_type`, `event_version`, `occurred_at`
//! - `payload`: the full envelope as JSON

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error, instrument, warn};

use catalog_events::{Event, EventEnvelope, EventSink, SinkError};

/// Default stream key for events.
pub const DEFAULT_STREAM_KEY: &str = "catalog:events";

/// Default capacity of the publish queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum RedisStreamsError {
    #[error("Redis connection error: {0}")]
    Connection(String),

    #[error("Redis command error: {0}")]
    Command(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Publishes event envelopes to a Redis stream from a background worker.
///
/// Dropping the sink closes the queue; the worker drains what is left and exits.
#[derive(Debug)]
pub struct RedisStreamsEventSink {
    sender: SyncSender<EventEnvelope<JsonValue>>,
    stream_key: String,
    _worker: JoinHandle<()>,
}

impl RedisStreamsEventSink {
    /// * `redis_url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `stream_key` - Redis stream key (default: "catalog:events")
    pub fn new(
        redis_url: impl AsRef<str>,
        stream_key: Option<String>,
    ) -> Result<Self, RedisStreamsError> {
        Self::with_capacity(redis_url, stream_key, DEFAULT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(
        redis_url: impl AsRef<str>,
        stream_key: Option<String>,
        capacity: usize,
    ) -> Result<Self, RedisStreamsError> {
        let client = redis::Client::open(redis_url.as_ref())
            .map_err(|e| RedisStreamsError::Connection(e.to_string()))?;
        let stream_key = stream_key.unwrap_or_else(|| DEFAULT_STREAM_KEY.to_string());

        let (sender, receiver) = mpsc::sync_channel(capacity.max(1));
        let worker = StreamWriter {
            client,
            stream_key: stream_key.clone(),
            connection: None,
        };
        let handle = thread::Builder::new()
            .name("redis-event-sink".to_string())
            .spawn(move || worker.run(receiver))
            .map_err(|e| RedisStreamsError::Connection(format!("failed to spawn worker: {e}")))?;

        Ok(Self {
            sender,
            stream_key,
            _worker: handle,
        })
    }

    pub fn stream_key(&self) -> &str {
        &self.stream_key
    }
}

impl<E> EventSink<E> for RedisStreamsEventSink
where
    E: Event + Serialize,
{
    fn publish(&self, event: E) -> Result<(), SinkError> {
        let envelope = EventEnvelope::from_event(&event)?;
        self.sender.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => {
                SinkError::Unavailable("redis publish queue is full".to_string())
            }
            TrySendError::Disconnected(_) => {
                SinkError::Unavailable("redis publish worker has stopped".to_string())
            }
        })
    }
}

/// Worker side of the sink: owns the Redis connection.
struct StreamWriter {
    client: redis::Client,
    stream_key: String,
    connection: Option<redis::Connection>,
}

impl StreamWriter {
    fn run(mut self, receiver: Receiver<EventEnvelope<JsonValue>>) {
        while let Ok(envelope) = receiver.recv() {
            if let Err(err) = self.append(&envelope) {
                error!(
                    error = %err,
                    event_id = %envelope.event_id(),
                    event_type = envelope.event_type(),
                    "failed to append event to redis stream"
                );
                // Reconnect on the next event.
                self.connection = None;
            }
        }
        debug!(stream_key = %self.stream_key, "redis event sink worker stopped");
    }

    fn connection(&mut self) -> Result<&mut redis::Connection, RedisStreamsError> {
        if self.connection.is_none() {
            let conn = self
                .client
                .get_connection()
                .map_err(|e| RedisStreamsError::Connection(e.to_string()))?;
            self.connection = Some(conn);
        }
        self.connection
            .as_mut()
            .ok_or_else(|| RedisStreamsError::Connection("no connection".to_string()))
    }

    #[instrument(
        skip(self, envelope),
        fields(stream_key = %self.stream_key, event_id = %envelope.event_id()),
        err
    )]
    fn append(&mut self, envelope: &EventEnvelope<JsonValue>) -> Result<(), RedisStreamsError> {
        let payload = serde_json::to_string(envelope)
            .map_err(|e| RedisStreamsError::Serialization(e.to_string()))?;
        let stream_key = self.stream_key.clone();
        let conn = self.connection()?;

        let _: String = redis::cmd("XADD")
            .arg(&stream_key)
            .arg("*")
            .arg("event_id")
            .arg(envelope.event_id().to_string())
            .arg("event_type")
            .arg(envelope.event_type())
            .arg("event_version")
            .arg(envelope.event_version())
            .arg("occurred_at")
            .arg(envelope.occurred_at().to_rfc3339())
            .arg("payload")
            .arg(&payload)
            .query(conn)
            .map_err(|e| {
                warn!(error = %e, "XADD failed");
                RedisStreamsError::Command(format!("XADD failed: {}", e))
            })?;

        Ok(())
    }
}
