//! Create-brand command: validate → construct → persist → notify → respond.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use catalog_core::ValidationErrors;
use catalog_events::EventSink;

use crate::brand::{Brand, BrandId};
use crate::events::BrandCreated;
use crate::store::{BrandStore, BrandStoreError};
use crate::validation::validate_create;

/// Command input, as decoded by the transport adapter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBrandInput {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
}

/// Command output: the persisted brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBrandOutput {
    pub id: BrandId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<&Brand> for CreateBrandOutput {
    type Error = CreateBrandError;

    fn try_from(brand: &Brand) -> Result<Self, Self::Error> {
        let (Some(id), Some(created_at), Some(updated_at)) =
            (brand.brand_id(), brand.created_at(), brand.updated_at())
        else {
            return Err(CreateBrandError::Store(
                "store returned a brand without identity".to_string(),
            ));
        };

        Ok(Self {
            id,
            name: brand.name().as_str().to_string(),
            description: brand.description().map(str::to_string),
            website: brand.website().map(|w| w.as_str().to_string()),
            logo_url: brand.logo_url().map(|l| l.as_str().to_string()),
            created_at,
            updated_at,
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CreateBrandError {
    /// Caller-supplied data violates one or more field constraints.
    #[error("invalid brand: {0}")]
    Validation(#[from] ValidationErrors),

    /// The name is already taken.
    #[error("brand name already exists: {0}")]
    Conflict(String),

    /// Infrastructure failure at or below the store boundary.
    #[error("brand could not be stored: {0}")]
    Store(String),
}

impl From<BrandStoreError> for CreateBrandError {
    fn from(value: BrandStoreError) -> Self {
        match value {
            BrandStoreError::DuplicateName(name) => CreateBrandError::Conflict(name),
            BrandStoreError::Unavailable(msg) | BrandStoreError::InvalidState(msg) => {
                CreateBrandError::Store(msg)
            }
        }
    }
}

/// Creates a brand and announces it.
///
/// Holds no mutable state; one instance can serve concurrent requests. The
/// store is called at most once per execution and never retried. Publication
/// happens only after a successful save and its failure is logged, never
/// returned.
pub struct CreateBrandCommand<S, K> {
    store: S,
    sink: K,
}

impl<S, K> CreateBrandCommand<S, K>
where
    S: BrandStore,
    K: EventSink<BrandCreated>,
{
    pub fn new(store: S, sink: K) -> Self {
        Self { store, sink }
    }

    #[instrument(skip_all, fields(brand.name = %input.name))]
    pub async fn execute(
        &self,
        input: CreateBrandInput,
    ) -> Result<CreateBrandOutput, CreateBrandError> {
        let details = validate_create(&input).inspect_err(|errors| {
            debug!(violations = errors.len(), "brand input rejected");
        })?;

        let saved = self.store.save(Brand::new(details)).await?;

        let output = CreateBrandOutput::try_from(&saved)?;
        let event = BrandCreated::from_persisted(&saved)
            .map_err(|e| CreateBrandError::Store(e.to_string()))?;

        if let Err(err) = self.sink.publish(event) {
            warn!(
                brand.id = %output.id,
                error = %err,
                "brand created but notification was not published"
            );
        }

        info!(brand.id = %output.id, "brand created");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use catalog_events::SinkError;

    use super::*;

    #[derive(Default)]
    struct RecordingStore {
        saved: Mutex<Vec<Brand>>,
        calls: AtomicUsize,
        fail_with: Option<BrandStoreError>,
        skip_identity: bool,
    }

    impl RecordingStore {
        fn failing(err: BrandStoreError) -> Self {
            Self {
                fail_with: Some(err),
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BrandStore for RecordingStore {
        async fn save(&self, mut brand: Brand) -> Result<Brand, BrandStoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }

            let mut saved = self.saved.lock().unwrap();
            if saved.iter().any(|b| b.name() == brand.name()) {
                return Err(BrandStoreError::DuplicateName(brand.name().to_string()));
            }
            if !self.skip_identity {
                brand
                    .assign_identity(BrandId::generate(), Utc::now())
                    .map_err(|e| BrandStoreError::InvalidState(e.to_string()))?;
            }
            saved.push(brand.clone());
            Ok(brand)
        }

        async fn find_by_id(&self, id: BrandId) -> Result<Option<Brand>, BrandStoreError> {
            let saved = self.saved.lock().unwrap();
            Ok(saved.iter().find(|b| b.brand_id() == Some(id)).cloned())
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Brand>, BrandStoreError> {
            let saved = self.saved.lock().unwrap();
            Ok(saved.iter().find(|b| b.name().as_str() == name).cloned())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<BrandCreated>>,
    }

    impl EventSink<BrandCreated> for RecordingSink {
        fn publish(&self, event: BrandCreated) -> Result<(), SinkError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    struct FailingSink;

    impl EventSink<BrandCreated> for FailingSink {
        fn publish(&self, _event: BrandCreated) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("broker down".to_string()))
        }
    }

    fn sportmaster() -> CreateBrandInput {
        CreateBrandInput {
            name: "SportMaster".to_string(),
            description: Some("Leading sports equipment manufacturer".to_string()),
            website: Some("https://sportmaster.com".to_string()),
            logo_url: Some("sportmaster-logo.png".to_string()),
        }
    }

    #[tokio::test]
    async fn creates_brand_and_emits_one_notification() {
        let store = std::sync::Arc::new(RecordingStore::default());
        let sink = std::sync::Arc::new(RecordingSink::default());
        let command = CreateBrandCommand::new(store.clone(), sink.clone());

        let output = command.execute(sportmaster()).await.unwrap();

        assert_eq!(output.name, "SportMaster");
        assert_eq!(output.description.as_deref(), Some("Leading sports equipment manufacturer"));
        assert_eq!(output.website.as_deref(), Some("https://sportmaster.com"));
        assert_eq!(output.logo_url.as_deref(), Some("sportmaster-logo.png"));
        assert_eq!(output.created_at, output.updated_at);

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.brand_id, output.id);
        assert_eq!(event.name, output.name);
        assert_eq!(event.description, output.description);
        assert_eq!(event.website, output.website);
        assert_eq!(event.logo_url, output.logo_url);

        let stored = store.find_by_id(output.id).await.unwrap().unwrap();
        assert_eq!(stored.name().as_str(), "SportMaster");
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_side_effects() {
        let store = std::sync::Arc::new(RecordingStore::default());
        let sink = std::sync::Arc::new(RecordingSink::default());
        let command = CreateBrandCommand::new(store.clone(), sink.clone());

        let err = command
            .execute(CreateBrandInput {
                name: String::new(),
                ..CreateBrandInput::default()
            })
            .await
            .unwrap_err();

        match err {
            CreateBrandError::Validation(errors) => assert!(errors.has_field("name")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.calls(), 0);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_website_is_rejected() {
        let store = std::sync::Arc::new(RecordingStore::default());
        let command = CreateBrandCommand::new(store.clone(), RecordingSink::default());

        let err = command
            .execute(CreateBrandInput {
                website: Some("https://exa mple.com".to_string()),
                ..sportmaster()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CreateBrandError::Validation(ref e) if e.has_field("website")));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn duplicate_name_maps_to_conflict() {
        let command = CreateBrandCommand::new(RecordingStore::default(), RecordingSink::default());

        command.execute(sportmaster()).await.unwrap();
        let err = command.execute(sportmaster()).await.unwrap_err();

        assert_eq!(err, CreateBrandError::Conflict("SportMaster".to_string()));
    }

    #[tokio::test]
    async fn store_failure_propagates_and_skips_publication() {
        let store =
            RecordingStore::failing(BrandStoreError::Unavailable("connection refused".to_string()));
        let sink = std::sync::Arc::new(RecordingSink::default());
        let command = CreateBrandCommand::new(store, sink.clone());

        let err = command.execute(sportmaster()).await.unwrap_err();

        assert_eq!(err, CreateBrandError::Store("connection refused".to_string()));
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sink_failure_does_not_affect_the_result() {
        let store = std::sync::Arc::new(RecordingStore::default());
        let command = CreateBrandCommand::new(store.clone(), FailingSink);

        let output = command.execute(sportmaster()).await.unwrap();

        assert_eq!(output.name, "SportMaster");
        assert!(store.find_by_id(output.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn store_returning_unpersisted_brand_is_a_store_failure() {
        let store = RecordingStore {
            skip_identity: true,
            ..RecordingStore::default()
        };
        let sink = std::sync::Arc::new(RecordingSink::default());
        let command = CreateBrandCommand::new(store, sink.clone());

        let err = command.execute(sportmaster()).await.unwrap_err();

        assert!(matches!(err, CreateBrandError::Store(_)));
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn identical_inputs_with_distinct_names_create_distinct_brands() {
        let command = CreateBrandCommand::new(RecordingStore::default(), RecordingSink::default());

        let a = command.execute(sportmaster()).await.unwrap();
        let b = command
            .execute(CreateBrandInput {
                name: "SportMaster Kids".to_string(),
                ..sportmaster()
            })
            .await
            .unwrap();

        assert_ne!(a.id, b.id);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn runtime() -> tokio::runtime::Runtime {
            tokio::runtime::Builder::new_current_thread().build().unwrap()
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 64,
                ..ProptestConfig::default()
            })]

            /// Property: valid inputs come back unchanged with an id and equal timestamps.
            #[test]
            fn valid_inputs_round_trip(
                name in "[A-Za-z][A-Za-z0-9 ]{0,99}",
                description in proptest::option::of("[ -~]{0,500}"),
                website in proptest::option::of("https://[a-z]{1,20}\\.com"),
            ) {
                let command =
                    CreateBrandCommand::new(RecordingStore::default(), RecordingSink::default());
                let input = CreateBrandInput { name, description, website, logo_url: None };

                let output = runtime().block_on(command.execute(input.clone())).unwrap();

                prop_assert_eq!(output.name, input.name);
                prop_assert_eq!(output.description, input.description);
                prop_assert_eq!(output.website, input.website);
                prop_assert_eq!(output.created_at, output.updated_at);
            }

            /// Property: blank or overlong names never reach the store.
            #[test]
            fn invalid_names_never_reach_the_store(
                name in prop_oneof!["[ \\t]{0,10}", "[A-Za-z]{101,140}"],
            ) {
                let store = std::sync::Arc::new(RecordingStore::default());
                let command = CreateBrandCommand::new(store.clone(), RecordingSink::default());

                let result = runtime().block_on(command.execute(CreateBrandInput {
                    name,
                    ..CreateBrandInput::default()
                }));

                prop_assert!(matches!(result, Err(CreateBrandError::Validation(_))));
                prop_assert_eq!(store.calls(), 0);
            }
        }
    }
}
