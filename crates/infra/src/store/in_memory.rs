use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_brands::{Brand, BrandId, BrandStore, BrandStoreError};

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Default)]
struct Brands {
    by_id: HashMap<BrandId, Brand>,
    by_name: HashMap<String, BrandId>,
}

/// In-memory brand store.
///
/// Intended for tests/dev. Every `save` runs under a single write lock, so the
/// uniqueness check and the write are atomic with respect to other saves.
pub struct InMemoryBrandStore {
    brands: RwLock<Brands>,
    clock: Clock,
}

impl InMemoryBrandStore {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    /// Use `clock` for assigned timestamps (deterministic tests).
    pub fn with_clock(clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        Self {
            brands: RwLock::new(Brands::default()),
            clock: Box::new(clock),
        }
    }

    pub fn len(&self) -> usize {
        self.brands.read().map(|b| b.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBrandStore {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for InMemoryBrandStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryBrandStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn poisoned() -> BrandStoreError {
    BrandStoreError::Unavailable("lock poisoned".to_string())
}

fn invalid_state(err: impl ToString) -> BrandStoreError {
    BrandStoreError::InvalidState(err.to_string())
}

#[async_trait]
impl BrandStore for InMemoryBrandStore {
    async fn save(&self, mut brand: Brand) -> Result<Brand, BrandStoreError> {
        let now = (self.clock)();
        let mut brands = self.brands.write().map_err(|_| poisoned())?;
        let name = brand.name().as_str().to_string();

        let stored = match brand.brand_id() {
            None => {
                if brands.by_name.contains_key(&name) {
                    return Err(BrandStoreError::DuplicateName(name));
                }
                brand
                    .assign_identity(BrandId::generate(), now)
                    .map_err(invalid_state)?;
                brand
            }
            Some(id) => {
                let Some(existing) = brands.by_id.get(&id) else {
                    return Err(invalid_state(format!("unknown brand {id}")));
                };
                if brands.by_name.get(&name).is_some_and(|owner| *owner != id) {
                    return Err(BrandStoreError::DuplicateName(name));
                }

                let previous_name = existing.name().as_str().to_string();
                let mut updated = existing.clone();
                updated
                    .update(brand.details().clone(), now)
                    .map_err(invalid_state)?;
                brands.by_name.remove(&previous_name);
                updated
            }
        };

        // assign_identity/update above guarantee an id.
        let id = stored
            .brand_id()
            .ok_or_else(|| invalid_state("stored brand has no id"))?;
        brands.by_name.insert(name, id);
        brands.by_id.insert(id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: BrandId) -> Result<Option<Brand>, BrandStoreError> {
        let brands = self.brands.read().map_err(|_| poisoned())?;
        Ok(brands.by_id.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Brand>, BrandStoreError> {
        let brands = self.brands.read().map_err(|_| poisoned())?;
        Ok(brands
            .by_name
            .get(name)
            .and_then(|id| brands.by_id.get(id))
            .cloned())
    }
}
