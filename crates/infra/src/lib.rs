//! Infrastructure layer: brand storage backends and event sinks.

pub mod event_sink;
pub mod store;

#[cfg(test)]
mod integration_tests;
