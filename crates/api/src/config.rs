//! Process configuration, read from the environment.

use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_JWT_SECRET: &str = "dev-secret";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
pub const DEFAULT_EVENT_STREAM_KEY: &str = "catalog:events";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BIND_ADDR '{0}' is not a socket address")]
    InvalidBindAddr(String),

    #[error("EVENT_SINK '{0}' is not one of: log, bus, redis")]
    UnknownEventSink(String),

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Where `BrandCreated` notifications go.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EventSinkKind {
    /// Structured log line per event.
    #[default]
    Log,
    /// In-process broadcast bus.
    Bus,
    /// Redis stream (requires the `redis` feature).
    Redis,
}

impl core::str::FromStr for EventSinkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "bus" => Ok(Self::Bus),
            "redis" => Ok(Self::Redis),
            _ => Err(ConfigError::UnknownEventSink(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// Postgres connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub event_sink: EventSinkKind,
    pub redis_url: String,
    pub event_stream_key: String,
}

impl ApiConfig {
    /// In-memory store, logging sink, default bind address.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: jwt_secret.into(),
            database_url: None,
            event_sink: EventSinkKind::Log,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            event_stream_key: DEFAULT_EVENT_STREAM_KEY.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if secret.is_empty() => return Err(ConfigError::Empty("JWT_SECRET")),
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set; using insecure dev default");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let event_sink = match lookup("EVENT_SINK") {
            Some(value) => value.parse()?,
            None => EventSinkKind::default(),
        };

        let event_stream_key =
            lookup("EVENT_STREAM_KEY").unwrap_or_else(|| DEFAULT_EVENT_STREAM_KEY.to_string());
        if event_stream_key.trim().is_empty() {
            return Err(ConfigError::Empty("EVENT_STREAM_KEY"));
        }

        Ok(Self {
            bind_addr,
            jwt_secret,
            database_url,
            event_sink,
            redis_url: lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            event_stream_key,
        })
    }
}
