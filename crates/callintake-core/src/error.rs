//! Error types and result handling for intake operations.
//!
//! Separates malformed webhook input from persistence failures so the HTTP
//! layer and the logs can tell them apart. Clients only ever see the
//! rendered message.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Result type alias using `IntakeError`.
pub type Result<T> = std::result::Result<T, IntakeError>;

/// Errors raised while classifying, persisting or notifying.
#[derive(Debug, Error)]
pub enum IntakeError {
    /// The webhook body is not valid JSON.
    #[error("invalid JSON payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// `function_call.arguments` is present but not a JSON object.
    #[error("function_call arguments must be an object, got {kind}")]
    InvalidArguments {
        /// JSON type that was received instead
        kind: &'static str,
    },

    /// The store document exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    StoreRead {
        /// Location of the store document
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The store document could not be written.
    #[error("failed to write {}: {source}", path.display())]
    StoreWrite {
        /// Location of the store document
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// The store document is not valid JSON or has the wrong shape.
    #[error("malformed store document {}: {source}", path.display())]
    MalformedDocument {
        /// Location of the store document
        path: PathBuf,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The notification log could not be read or appended to.
    #[error("notification log {}: {source}", path.display())]
    NotificationLog {
        /// Location of the notification log
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Generic error for wrapping other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntakeError {
    /// Returns a stable label for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_) => "invalid_payload",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::StoreRead { .. } => "store_read",
            Self::StoreWrite { .. } => "store_write",
            Self::MalformedDocument { .. } => "malformed_document",
            Self::Serialization(_) => "serialization",
            Self::NotificationLog { .. } => "notification_log",
            Self::Other(_) => "other",
        }
    }

    /// Returns whether the error was caused by the webhook body rather than
    /// by local storage.
    pub const fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidPayload(_) | Self::InvalidArguments { .. })
    }
}
