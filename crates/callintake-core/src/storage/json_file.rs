//! Flat-file JSON store.

use std::{
    future::Future,
    io::ErrorKind,
    path::{Path, PathBuf},
    pin::Pin,
};

use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::PatientStore;
use crate::{
    error::{IntakeError, Result},
    models::{PatientFields, PatientRecord, StoreDocument},
};

/// Stores the document as a single JSON file.
///
/// Writes go to a uniquely named sibling file that is then renamed over the
/// target, so readers never observe a half-written document. Saves and
/// appends are serialized by an async mutex; separate processes sharing the
/// same file are not coordinated.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is created on the first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    /// Returns the document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<StoreDocument> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Store document absent, starting empty");
                return Ok(StoreDocument::new());
            },
            Err(source) => return Err(IntakeError::StoreRead { path: self.path.clone(), source }),
        };

        serde_json::from_slice(&bytes)
            .map_err(|source| IntakeError::MalformedDocument { path: self.path.clone(), source })
    }

    async fn write_document(&self, document: &StoreDocument) -> Result<()> {
        let content = serde_json::to_vec_pretty(document).map_err(IntakeError::Serialization)?;
        let tmp_path = self.temp_path();

        if let Err(source) = tokio::fs::write(&tmp_path, content).await {
            return Err(IntakeError::StoreWrite { path: self.path.clone(), source });
        }

        if let Err(source) = tokio::fs::rename(&tmp_path, &self.path).await {
            if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
                warn!(path = %tmp_path.display(), error = %e, "Failed to remove temporary store file");
            }
            return Err(IntakeError::StoreWrite { path: self.path.clone(), source });
        }

        debug!(path = %self.path.display(), records = document.len(), "Store document written");
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "store".to_string(), |name| name.to_string_lossy().into_owned());

        self.path.with_file_name(format!(".{name}-{}.tmp", Uuid::new_v4()))
    }
}

impl PatientStore for JsonFileStore {
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<StoreDocument>> + Send + '_>> {
        Box::pin(self.read_document())
    }

    fn save(&self, document: StoreDocument) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;
            self.write_document(&document).await
        })
    }

    fn append(
        &self,
        fields: PatientFields,
        timestamp: String,
    ) -> Pin<Box<dyn Future<Output = Result<PatientRecord>> + Send + '_>> {
        Box::pin(async move {
            let _guard = self.write_lock.lock().await;

            let mut document = self.read_document().await?;
            let record = document.insert(fields, timestamp).clone();
            self.write_document(&document).await?;

            Ok(record)
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
