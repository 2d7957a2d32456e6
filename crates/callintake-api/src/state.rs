//! Shared application state handed to every handler.

use std::sync::Arc;

use callintake_core::{Clock, NotificationLog, Notifier, PatientStore, WebhookDispatcher};

/// Service name reported by `/health` unless configured otherwise.
pub const DEFAULT_SERVICE_NAME: &str = "Voice Agent MVP";

/// Cloneable handle to the service's collaborators.
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher for `/webhook`
    pub dispatcher: WebhookDispatcher,
    /// Store read by `/patients`
    pub store: Arc<dyn PatientStore>,
    /// Log read by `/notifications`
    pub notification_log: NotificationLog,
    /// Time source for response timestamps
    pub clock: Arc<dyn Clock>,
    /// Name reported by `/health`
    pub service_name: String,
}

impl AppState {
    /// Wires the dispatcher and read endpoints to the same store.
    pub fn new(
        store: Arc<dyn PatientStore>,
        notifier: Arc<dyn Notifier>,
        notification_log: NotificationLog,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let dispatcher = WebhookDispatcher::new(Arc::clone(&store), notifier, Arc::clone(&clock));

        Self {
            dispatcher,
            store,
            notification_log,
            clock,
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }

    /// Overrides the name reported by `/health`.
    #[must_use]
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }
}
