//! Persistence of the patient store document.
//!
//! The dispatcher only sees `PatientStore`, so the backend can change
//! without touching webhook handling. Two implementations ship with the
//! crate:
//!
//! - `JsonFileStore` keeps the whole document in one pretty-printed JSON
//!   file, rewritten through a temporary file and an atomic rename.
//! - `MemoryStore` keeps the document in memory and can inject failures,
//!   for tests that should not touch the filesystem.
//!
//! Both serialize `append` so ids stay unique within one process.

use std::{future::Future, pin::Pin};

use crate::{
    error::Result,
    models::{PatientFields, PatientRecord, StoreDocument},
};

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage operations required by the webhook dispatcher.
pub trait PatientStore: Send + Sync + 'static {
    /// Loads the full document.
    ///
    /// A missing document is not an error and yields an empty one. An
    /// unreadable or malformed document is surfaced to the caller.
    fn load(&self) -> Pin<Box<dyn Future<Output = Result<StoreDocument>> + Send + '_>>;

    /// Overwrites the persisted document in full.
    fn save(&self, document: StoreDocument) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Appends a new record.
    ///
    /// Loads the document, stamps `fields` with the next id and the given
    /// timestamp, saves, and returns the stored record. Implementations
    /// hold a lock for the whole read-modify-write.
    fn append(
        &self,
        fields: PatientFields,
        timestamp: String,
    ) -> Pin<Box<dyn Future<Output = Result<PatientRecord>> + Send + '_>>;

    /// Describes where records are kept, for logging.
    fn location(&self) -> String;
}
