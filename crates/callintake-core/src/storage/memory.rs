//! In-memory store for tests.

use std::{future::Future, pin::Pin, sync::Arc};

use tokio::sync::RwLock;

use super::PatientStore;
use crate::{
    error::{IntakeError, Result},
    models::{PatientFields, PatientRecord, StoreDocument},
};

/// Keeps the document in memory.
///
/// Clones share state. A failure message injected with `inject_failure`
/// makes every subsequent operation fail until `clear_failure` is called.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    document: Arc<RwLock<StoreDocument>>,
    failure: Arc<RwLock<Option<String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `document`.
    pub fn with_document(document: StoreDocument) -> Self {
        Self { document: Arc::new(RwLock::new(document)), failure: Arc::default() }
    }

    /// Makes subsequent operations fail with `message`.
    pub async fn inject_failure(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    /// Removes an injected failure.
    pub async fn clear_failure(&self) {
        *self.failure.write().await = None;
    }

    /// Returns a copy of the current document.
    pub async fn snapshot(&self) -> StoreDocument {
        self.document.read().await.clone()
    }

    async fn check_failure(&self) -> Result<()> {
        match self.failure.read().await.as_ref() {
            Some(message) => Err(IntakeError::Other(anyhow::anyhow!("{message}"))),
            None => Ok(()),
        }
    }
}

impl PatientStore for MemoryStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<StoreDocument>> + Send + '_>> {
        Box::pin(async move {
            self.check_failure().await?;
            Ok(self.document.read().await.clone())
        })
    }

    fn save(&self, document: StoreDocument) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            self.check_failure().await?;
            *self.document.write().await = document;
            Ok(())
        })
    }

    fn append(
        &self,
        fields: PatientFields,
        timestamp: String,
    ) -> Pin<Box<dyn Future<Output = Result<PatientRecord>> + Send + '_>> {
        Box::pin(async move {
            self.check_failure().await?;
            let mut document = self.document.write().await;
            Ok(document.insert(fields, timestamp).clone())
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
