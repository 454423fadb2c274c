//! `EventSink` implementations.
//!
//! - [`LoggingEventSink`]: writes each event as a structured log line
//! - [`BusEventSink`]: wraps events in an envelope and fans them out on an `EventBus`
//! - `RedisStreamsEventSink` (feature `redis`): appends envelopes to a Redis stream

pub mod bus;
pub mod logging;
#[cfg(feature = "redis")]
pub mod redis_streams;

pub use bus::BusEventSink;
pub use logging::LoggingEventSink;
#[cfg(feature = "redis")]
pub use redis_streams::{RedisStreamsError, RedisStreamsEventSink};
