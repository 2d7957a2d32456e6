//! Webhook dispatch against the injected store and notifier.
//!
//! Holds no state between requests; everything persistent lives behind
//! `PatientStore`.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    error::Result,
    models::{PatientFields, PatientRecord},
    notify::Notifier,
    storage::PatientStore,
    time::{iso_timestamp, Clock},
    webhook::WebhookRequest,
};

/// Result of handling one webhook.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A call started; nothing was persisted.
    CallStarted,

    /// A call ended; nothing was persisted.
    CallEnded,

    /// Patient data was stored.
    PatientSaved(PatientRecord),

    /// The payload was acknowledged without side effects.
    Received,
}

/// Routes classified webhooks to storage and notification.
#[derive(Clone)]
pub struct WebhookDispatcher {
    store: Arc<dyn PatientStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl WebhookDispatcher {
    /// Creates a dispatcher over the given collaborators.
    pub fn new(store: Arc<dyn PatientStore>, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self { store, notifier, clock }
    }

    /// Classifies and handles a raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON, if `save_data` arguments
    /// are malformed, or if the store cannot be loaded or saved.
    /// Notification failures are logged and do not fail the dispatch.
    pub async fn dispatch(&self, body: &[u8]) -> Result<DispatchOutcome> {
        debug!(payload = %String::from_utf8_lossy(body), "Received webhook data");

        let request = WebhookRequest::classify(body)?;
        self.execute(request).await
    }

    /// Handles an already classified webhook.
    #[instrument(name = "dispatch_webhook", skip_all, fields(kind = request.kind()))]
    pub async fn execute(&self, request: WebhookRequest) -> Result<DispatchOutcome> {
        match request {
            WebhookRequest::CallStarted => {
                info!("Call started");
                Ok(DispatchOutcome::CallStarted)
            },
            WebhookRequest::CallEnded => {
                info!("Call ended");
                Ok(DispatchOutcome::CallEnded)
            },
            WebhookRequest::SaveData(fields) => {
                let record = self.save_patient(fields).await?;
                Ok(DispatchOutcome::PatientSaved(record))
            },
            WebhookRequest::Unrecognized => {
                debug!("Acknowledging unrecognized webhook");
                Ok(DispatchOutcome::Received)
            },
        }
    }

    async fn save_patient(&self, fields: PatientFields) -> Result<PatientRecord> {
        let timestamp = iso_timestamp(self.clock.now_system());
        let record = self.store.append(fields, timestamp).await?;

        info!(patient_id = %record.id, store = %self.store.location(), "Saved patient data");

        if let Err(e) = self.notifier.notify(&record).await {
            warn!(patient_id = %record.id, error = %e, kind = e.kind(), "Failed to notify team");
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use serde_json::json;

    use super::*;
    use crate::{
        error::IntakeError,
        models::{PatientId, StoreDocument},
        notify::NoOpNotifier,
        storage::MemoryStore,
        time::TestClock,
    };

    #[derive(Debug)]
    struct FailingNotifier;

    #[async_trait::async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(&self, _record: &PatientRecord) -> Result<()> {
            Err(IntakeError::Other(anyhow::anyhow!("log unavailable")))
        }
    }

    fn dispatcher(store: &MemoryStore, notifier: Arc<dyn Notifier>) -> WebhookDispatcher {
        let clock = TestClock::with_start_time(UNIX_EPOCH + Duration::from_secs(1_760_866_200));
        WebhookDispatcher::new(Arc::new(store.clone()), notifier, Arc::new(clock))
    }

    fn save_data(name: &str) -> Vec<u8> {
        json!({"function_call": {"name": "save_data", "arguments": {"name": name}}})
            .to_string()
            .into_bytes()
    }

    #[tokio::test]
    async fn save_data_stamps_id_and_timestamp() {
        let store = MemoryStore::new();
        let dispatcher = dispatcher(&store, Arc::new(NoOpNotifier::new()));

        let outcome = dispatcher.dispatch(&save_data("Jane Doe")).await.unwrap();

        let DispatchOutcome::PatientSaved(record) = outcome else { panic!("expected save") };
        assert_eq!(record.id, PatientId(1));
        assert_eq!(record.timestamp, iso_timestamp(UNIX_EPOCH + Duration::from_secs(1_760_866_200)));
        assert_eq!(store.snapshot().await.patients, vec![record]);
    }

    #[tokio::test]
    async fn save_data_continues_existing_numbering() {
        let mut seeded = StoreDocument::new();
        seeded.insert(PatientFields::new(), "2026-10-18T17:00:00.000000+00:00");
        let store = MemoryStore::with_document(seeded);
        let dispatcher = dispatcher(&store, Arc::new(NoOpNotifier::new()));

        let outcome = dispatcher.dispatch(&save_data("Jane Doe")).await.unwrap();

        let DispatchOutcome::PatientSaved(record) = outcome else { panic!("expected save") };
        assert_eq!(record.id, PatientId(2));
        assert_eq!(store.snapshot().await.len(), 2);
    }

    #[tokio::test]
    async fn lifecycle_events_do_not_touch_store() {
        let store = MemoryStore::new();
        let dispatcher = dispatcher(&store, Arc::new(NoOpNotifier::new()));

        let started = dispatcher.dispatch(br#"{"event":"call_started"}"#).await.unwrap();
        let ended = dispatcher.dispatch(br#"{"event":"call_ended"}"#).await.unwrap();

        assert_eq!(started, DispatchOutcome::CallStarted);
        assert_eq!(ended, DispatchOutcome::CallEnded);
        assert!(store.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_save() {
        let store = MemoryStore::new();
        let dispatcher = dispatcher(&store, Arc::new(FailingNotifier));

        let outcome = dispatcher.dispatch(&save_data("Jane Doe")).await.unwrap();

        assert!(matches!(outcome, DispatchOutcome::PatientSaved(_)));
        assert_eq!(store.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_is_surfaced() {
        let store = MemoryStore::new();
        store.inject_failure("disk full").await;
        let dispatcher = dispatcher(&store, Arc::new(NoOpNotifier::new()));

        let error = dispatcher.dispatch(&save_data("Jane Doe")).await.unwrap_err();

        assert!(error.to_string().contains("disk full"));
    }

    #[tokio::test]
    async fn unrecognized_payload_is_received() {
        let store = MemoryStore::new();
        let dispatcher = dispatcher(&store, Arc::new(NoOpNotifier::new()));

        let outcome = dispatcher.dispatch(br#"{"event":"call_analyzed"}"#).await.unwrap();

        assert_eq!(outcome, DispatchOutcome::Received);
    }
}
