//! Repository boundary for brands.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::brand::{Brand, BrandId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BrandStoreError {
    /// Another brand already uses this name.
    #[error("brand name already exists: {0}")]
    DuplicateName(String),

    /// The backing storage could not complete the operation.
    #[error("brand store unavailable: {0}")]
    Unavailable(String),

    /// The request or the stored data is inconsistent (e.g. unknown id on re-save).
    #[error("invalid brand state: {0}")]
    InvalidState(String),
}

/// Durable storage for brands.
///
/// `save` is atomic: it either stores the brand and returns the stored copy,
/// or fails and stores nothing. On first save the store assigns the id and
/// sets `created_at == updated_at`; later saves advance `updated_at`. Name
/// uniqueness is enforced here and reported as [`BrandStoreError::DuplicateName`].
#[async_trait]
pub trait BrandStore: Send + Sync {
    async fn save(&self, brand: Brand) -> Result<Brand, BrandStoreError>;

    async fn find_by_id(&self, id: BrandId) -> Result<Option<Brand>, BrandStoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Brand>, BrandStoreError>;
}

#[async_trait]
impl<S> BrandStore for Arc<S>
where
    S: BrandStore + ?Sized,
{
    async fn save(&self, brand: Brand) -> Result<Brand, BrandStoreError> {
        (**self).save(brand).await
    }

    async fn find_by_id(&self, id: BrandId) -> Result<Option<Brand>, BrandStoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Brand>, BrandStoreError> {
        (**self).find_by_name(name).await
    }
}
