//! Core domain models, storage and webhook dispatch.
//!
//! Provides the patient record model, the storage abstraction the
//! dispatcher is built on, operator notifications, and the classification
//! of inbound voice-agent webhooks. The HTTP layer depends on these types
//! and contains no intake logic of its own.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dispatch;
pub mod error;
pub mod models;
pub mod notify;
pub mod storage;
pub mod time;
pub mod webhook;

pub use dispatch::{DispatchOutcome, WebhookDispatcher};
pub use error::{IntakeError, Result};
pub use models::{PatientFields, PatientId, PatientRecord, StoreDocument};
pub use notify::{NoOpNotifier, NotificationLog, Notifier, TeamNotifier};
pub use storage::{JsonFileStore, MemoryStore, PatientStore};
pub use time::{Clock, RealClock, TestClock};
pub use webhook::WebhookRequest;
