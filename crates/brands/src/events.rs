use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult};
use catalog_events::Event;

use crate::brand::{Brand, BrandId};

/// Event: BrandCreated.
///
/// Mirrors the business fields of the persisted brand plus its new id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandCreated {
    pub brand_id: BrandId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl BrandCreated {
    /// Build the notification from a brand the store has already persisted.
    pub fn from_persisted(brand: &Brand) -> DomainResult<Self> {
        let (Some(brand_id), Some(occurred_at)) = (brand.brand_id(), brand.created_at()) else {
            return Err(DomainError::invariant("brand has not been persisted"));
        };

        Ok(Self {
            brand_id,
            name: brand.name().as_str().to_string(),
            description: brand.description().map(str::to_string),
            website: brand.website().map(|w| w.as_str().to_string()),
            logo_url: brand.logo_url().map(|l| l.as_str().to_string()),
            occurred_at,
        })
    }
}

impl Event for BrandCreated {
    fn event_type(&self) -> &'static str {
        "catalog.brand.created"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
