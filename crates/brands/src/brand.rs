use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{
    DomainError, DomainResult, Entity, EntityId, FieldRules, ValidationErrors, ValueObject,
};

pub const NAME_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;
pub const LINK_MAX_CHARS: usize = 255;

/// Brand identifier, assigned by the store on first save.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandId(pub EntityId);

impl BrandId {
    pub fn new(id: EntityId) -> Self {
        Self(id)
    }

    /// Fresh time-ordered identifier (stores call this, commands never do).
    pub fn generate() -> Self {
        Self(EntityId::new())
    }
}

impl core::fmt::Display for BrandId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for BrandId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Brand name: non-blank, at most [`NAME_MAX_CHARS`] characters.
///
/// The value is kept exactly as supplied; blankness is judged after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrandName(String);

impl BrandName {
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationErrors> {
        let value = value.into();
        let mut rules = FieldRules::new();
        rules.not_blank("name", &value);
        if !rules.has_violations() {
            rules.max_chars("name", &value, NAME_MAX_CHARS);
        }
        rules.finish()?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for BrandName {}

impl core::fmt::Display for BrandName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A web link (website, logo) stored as a syntactically valid URI reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WebLink(String);

impl WebLink {
    /// `field` names the input attribute in any reported violation.
    pub fn parse(field: &str, value: impl Into<String>) -> Result<Self, ValidationErrors> {
        let value = value.into();
        let mut rules = FieldRules::new();
        rules.max_chars(field, &value, LINK_MAX_CHARS);
        if !rules.has_violations() {
            rules.uri_reference(field, &value);
        }
        rules.finish()?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl ValueObject for WebLink {}

impl core::fmt::Display for WebLink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated business fields of a brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandDetails {
    pub name: BrandName,
    pub description: Option<String>,
    pub website: Option<WebLink>,
    pub logo_url: Option<WebLink>,
}

impl ValueObject for BrandDetails {}

/// Entity: Brand.
///
/// Identity and timestamps are absent until the store persists the brand for
/// the first time. After that the id never changes and `updated_at` never moves
/// backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    id: Option<BrandId>,
    details: BrandDetails,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Brand {
    /// A not-yet-persisted brand.
    pub fn new(details: BrandDetails) -> Self {
        Self {
            id: None,
            details,
            created_at: None,
            updated_at: None,
        }
    }

    /// Rebuild a persisted brand from storage.
    pub fn restore(
        id: BrandId,
        details: BrandDetails,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if updated_at < created_at {
            return Err(DomainError::invariant("updated_at precedes created_at"));
        }
        Ok(Self {
            id: Some(id),
            details,
            created_at: Some(created_at),
            updated_at: Some(updated_at),
        })
    }

    pub fn brand_id(&self) -> Option<BrandId> {
        self.id
    }

    pub fn details(&self) -> &BrandDetails {
        &self.details
    }

    pub fn name(&self) -> &BrandName {
        &self.details.name
    }

    pub fn description(&self) -> Option<&str> {
        self.details.description.as_deref()
    }

    pub fn website(&self) -> Option<&WebLink> {
        self.details.website.as_ref()
    }

    pub fn logo_url(&self) -> Option<&WebLink> {
        self.details.logo_url.as_ref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// First persistence: set the id and both timestamps to `at`.
    pub fn assign_identity(&mut self, id: BrandId, at: DateTime<Utc>) -> DomainResult<()> {
        if self.id.is_some() {
            return Err(DomainError::invariant("brand identity is immutable"));
        }
        self.id = Some(id);
        self.created_at = Some(at);
        self.updated_at = Some(at);
        Ok(())
    }

    /// Record a mutation at `at`. A clock running backwards leaves `updated_at` as is.
    pub fn touch(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        let current = self
            .updated_at
            .ok_or_else(|| DomainError::invariant("brand has not been persisted"))?;
        self.updated_at = Some(current.max(at));
        Ok(())
    }

    /// Replace the business fields of a persisted brand.
    pub fn update(&mut self, details: BrandDetails, at: DateTime<Utc>) -> DomainResult<()> {
        if self.is_new() {
            return Err(DomainError::invariant("cannot update a brand that was never persisted"));
        }
        self.touch(at)?;
        self.details = details;
        Ok(())
    }
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> Option<&Self::Id> {
        self.id.as_ref()
    }
}
