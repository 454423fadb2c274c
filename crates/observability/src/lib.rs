//! Tracing/logging setup shared by the catalog binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide logging from `RUST_LOG` and `LOG_FORMAT`.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    let format = std::env::var("LOG_FORMAT")
        .map(|value| LogFormat::parse(&value))
        .unwrap_or_default();
    self::tracing::init(format);
}
