//! `BrandStore` implementations.
//!
//! The repository contract lives in `catalog-brands`; this module provides the
//! in-memory backend (tests/dev) and the Postgres backend.

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryBrandStore;
pub use postgres::PostgresBrandStore;
