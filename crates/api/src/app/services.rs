//! Infrastructure wiring: store, event sink and the create-brand command.
//!
//! Collaborators are built once at startup and handed to the command by
//! constructor; handlers only see [`AppServices`].

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::info;

use catalog_brands::{BrandCreated, BrandStore, BrandStoreError, CreateBrandCommand};
use catalog_events::{EventEnvelope, EventSink, InMemoryEventBus};
use catalog_infra::event_sink::{BusEventSink, LoggingEventSink};
use catalog_infra::store::{InMemoryBrandStore, PostgresBrandStore};

#[cfg(feature = "redis")]
use catalog_infra::event_sink::{RedisStreamsError, RedisStreamsEventSink};

use crate::config::{ApiConfig, EventSinkKind};

pub type SharedStore = Arc<dyn BrandStore>;
pub type SharedSink = Arc<dyn EventSink<BrandCreated>>;
pub type SharedBus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("brand store setup failed: {0}")]
    Store(#[from] BrandStoreError),

    #[cfg(feature = "redis")]
    #[error("redis event sink setup failed: {0}")]
    Redis(#[from] RedisStreamsError),

    #[error("EVENT_SINK=redis requires the `redis` feature")]
    RedisDisabled,
}

pub struct AppServices {
    store: SharedStore,
    create_brand: CreateBrandCommand<SharedStore, SharedSink>,
    event_bus: Option<SharedBus>,
}

impl AppServices {
    pub fn new(store: SharedStore, sink: SharedSink) -> Self {
        Self {
            create_brand: CreateBrandCommand::new(store.clone(), sink),
            store,
            event_bus: None,
        }
    }

    /// In-memory store and logging sink.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBrandStore::new()), Arc::new(LoggingEventSink::new()))
    }

    /// Publish through an in-process bus; [`AppServices::event_bus`] exposes it
    /// so callers can subscribe.
    pub fn with_event_bus(store: SharedStore) -> Self {
        let bus: SharedBus = Arc::new(InMemoryEventBus::new());
        let mut services = Self::new(store, Arc::new(BusEventSink::new(bus.clone())));
        services.event_bus = Some(bus);
        services
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn create_brand(&self) -> &CreateBrandCommand<SharedStore, SharedSink> {
        &self.create_brand
    }

    pub fn event_bus(&self) -> Option<&SharedBus> {
        self.event_bus.as_ref()
    }
}

/// Build services from configuration.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, ServicesError> {
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            let store = PostgresBrandStore::connect(url).await?;
            store.ensure_schema().await?;
            info!("using postgres brand store");
            Arc::new(store)
        }
        None => {
            info!("DATABASE_URL not set; using in-memory brand store");
            Arc::new(InMemoryBrandStore::new())
        }
    };

    let services = match config.event_sink {
        EventSinkKind::Log => AppServices::new(store, Arc::new(LoggingEventSink::new())),
        EventSinkKind::Bus => AppServices::with_event_bus(store),
        EventSinkKind::Redis => AppServices::new(store, redis_sink(config)?),
    };
    info!(event_sink = ?config.event_sink, "event sink configured");

    Ok(services)
}

#[cfg(feature = "redis")]
fn redis_sink(config: &ApiConfig) -> Result<SharedSink, ServicesError> {
    let sink =
        RedisStreamsEventSink::new(&config.redis_url, Some(config.event_stream_key.clone()))?;
    Ok(Arc::new(sink))
}

#[cfg(not(feature = "redis"))]
fn redis_sink(_config: &ApiConfig) -> Result<SharedSink, ServicesError> {
    Err(ServicesError::RedisDisabled)
}
