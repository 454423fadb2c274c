//! Integration tests for the create-brand pipeline.
//!
//! Tests: Command → InMemoryBrandStore → BusEventSink → subscriber
//!
//! Verifies:
//! - A created brand is persisted and announced exactly once
//! - Rejected input and duplicate names leave store and bus untouched

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::Value as JsonValue;

    use catalog_brands::{BrandStore, CreateBrandCommand, CreateBrandError, CreateBrandInput};
    use catalog_events::{EventBus, EventEnvelope, InMemoryEventBus, Subscription};

    use crate::event_sink::BusEventSink;
    use crate::store::InMemoryBrandStore;

    type Bus = Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>;

    fn setup() -> (
        CreateBrandCommand<Arc<InMemoryBrandStore>, BusEventSink<Bus>>,
        Arc<InMemoryBrandStore>,
        Subscription<EventEnvelope<JsonValue>>,
    ) {
        let store = Arc::new(InMemoryBrandStore::new());
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        let subscription = bus.subscribe();
        let command = CreateBrandCommand::new(store.clone(), BusEventSink::new(bus));
        (command, store, subscription)
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
    async fn create_brand_persists_and_announces() {
        let (command, store, subscription) = setup();

        let output = command.execute(sportmaster()).await.unwrap();

        let stored = store.find_by_id(output.id).await.unwrap().unwrap();
        assert_eq!(stored.name().as_str(), "SportMaster");
        assert_eq!(Some(output.created_at), stored.created_at());

        let envelope = subscription.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(envelope.event_type(), "catalog.brand.created");
        assert_eq!(envelope.payload()["brand_id"], output.id.to_string());
        assert_eq!(envelope.payload()["logo_url"], "sportmaster-logo.png");
        assert!(subscription.try_recv().is_err());
    }

    #[tokio::test]
    async fn invalid_input_touches_nothing() {
        let (command, store, subscription) = setup();

        let err = command
            .execute(CreateBrandInput {
                name: "  ".to_string(),
                ..sportmaster()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CreateBrandError::Validation(_)));
        assert!(store.is_empty());
        assert!(subscription.try_recv().is_err());
    }

    #[tokio::test]
    async fn duplicate_name_is_announced_once() {
        let (command, store, subscription) = setup();

        command.execute(sportmaster()).await.unwrap();
        let err = command.execute(sportmaster()).await.unwrap_err();

        assert!(matches!(err, CreateBrandError::Conflict(_)));
        assert_eq!(store.len(), 1);
        assert!(subscription.recv_timeout(Duration::from_secs(1)).is_ok());
        assert!(subscription.try_recv().is_err());
    }
}
