//! Notifier double that records what it was asked to announce.

use std::sync::Arc;

use callintake_core::{IntakeError, Notifier, PatientRecord, Result};
use tokio::sync::RwLock;

/// Captures notified records, optionally failing every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    records: Arc<RwLock<Vec<PatientRecord>>>,
    failure: Option<String>,
}

impl RecordingNotifier {
    /// Creates a notifier that records and succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that records and then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { records: Arc::default(), failure: Some(message.into()) }
    }

    /// Returns the records notified so far.
    pub async fn records(&self) -> Vec<PatientRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, record: &PatientRecord) -> Result<()> {
        self.records.write().await.push(record.clone());

        match &self.failure {
            Some(message) => Err(IntakeError::Other(anyhow::anyhow!("{message}"))),
            None => Ok(()),
        }
    }
}
