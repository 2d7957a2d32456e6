//! Operator notifications for newly saved patients.
//!
//! A saved record is announced twice: a banner on standard output for
//! whoever watches the console, and an entry appended to a plain-text
//! notification log that the API can serve back verbatim.
//!
//! ```text
//! [2026-10-19T09:30:00.000000+00:00] NEW PATIENT CALL
//! Name: Jane Doe
//! DOB: N/A
//! Phone: 555-1234
//! Reason: Checkup
//! Timestamp: 09:30 AM
//! --------------------------------------------------
//! ```

use std::{
    borrow::Cow,
    fmt::Write as _,
    io::{ErrorKind, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::{
    error::{IntakeError, Result},
    models::PatientRecord,
    time::{iso_timestamp, wall_clock, Clock},
};

/// Rendered in place of a missing field.
pub const PLACEHOLDER: &str = "N/A";

const RULE_WIDTH: usize = 50;

/// Fields shown in notifications, as (record key, log label, console label).
const DISPLAY_FIELDS: [(&str, &str, &str); 4] = [
    ("name", "Name", "📞 Name"),
    ("date_of_birth", "DOB", "🎂 DOB"),
    ("phone", "Phone", "📱 Phone"),
    ("reason", "Reason", "🩺 Reason"),
];

/// Receives newly saved patient records.
///
/// The dispatcher treats failures as best-effort: they are logged and do
/// not change the webhook response.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Announces a saved record.
    async fn notify(&self, record: &PatientRecord) -> Result<()>;
}

/// Notifier that discards all records.
#[derive(Debug, Default)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    /// Creates a new no-op notifier.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _record: &PatientRecord) -> Result<()> {
        Ok(())
    }
}

/// Append-only text file of rendered notifications.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    path: PathBuf,
}

impl NotificationLog {
    /// Creates a log at `path`; the file is created on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the log path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `entry` to the end of the log.
    pub async fn append(&self, entry: &str) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|source| self.error(source))?;

        file.write_all(entry.as_bytes()).await.map_err(|source| self.error(source))?;
        file.flush().await.map_err(|source| self.error(source))
    }

    /// Reads the whole log, or `None` if nothing was ever written.
    pub async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(self.error(source)),
        }
    }

    fn error(&self, source: std::io::Error) -> IntakeError {
        IntakeError::NotificationLog { path: self.path.clone(), source }
    }
}

/// Announces records on stdout and in the notification log.
#[derive(Debug, Clone)]
pub struct TeamNotifier {
    log: NotificationLog,
    clock: Arc<dyn Clock>,
    console: bool,
}

impl TeamNotifier {
    /// Creates a notifier writing to `log`, reading the time from `clock`.
    pub fn new(log: NotificationLog, clock: Arc<dyn Clock>) -> Self {
        Self { log, clock, console: true }
    }

    /// Enables or disables the stdout banner.
    #[must_use]
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }
}

#[async_trait::async_trait]
impl Notifier for TeamNotifier {
    async fn notify(&self, record: &PatientRecord) -> Result<()> {
        let at = self.clock.now_system();

        if self.console {
            let banner = render_console(record, at);
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = stdout.write_all(banner.as_bytes()).and_then(|()| stdout.flush()) {
                warn!(error = %e, "Failed to write console notification");
            }
        }

        self.log.append(&render_log_entry(record, at)).await?;
        info!(patient_id = %record.id, log = %self.log.path().display(), "Team notified");
        Ok(())
    }
}

/// Renders a record field for display, `N/A` when missing or null.
pub fn display_field<'a>(record: &'a PatientRecord, key: &str) -> Cow<'a, str> {
    match record.field(key) {
        None | Some(Value::Null) => Cow::Borrowed(PLACEHOLDER),
        Some(Value::String(text)) => Cow::Borrowed(text),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Renders the stdout banner for a record announced at `at`.
pub fn render_console(record: &PatientRecord, at: SystemTime) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "🚨 NEW PATIENT CALL RECEIVED!");
    let _ = writeln!(out, "{rule}");
    for (key, _, label) in DISPLAY_FIELDS {
        let _ = writeln!(out, "{label}: {}", display_field(record, key));
    }
    let _ = writeln!(out, "⏰ Time: {}", wall_clock(at));
    let _ = writeln!(out, "{rule}");

    out
}

/// Renders the notification log entry for a record announced at `at`.
pub fn render_log_entry(record: &PatientRecord, at: SystemTime) -> String {
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "[{}] NEW PATIENT CALL", iso_timestamp(at));
    for (key, label, _) in DISPLAY_FIELDS {
        let _ = writeln!(out, "{label}: {}", display_field(record, key));
    }
    let _ = writeln!(out, "Timestamp: {}", wall_clock(at));
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    out
}
