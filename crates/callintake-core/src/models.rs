//! Patient records and the persisted store document.
//!
//! Caller-supplied intake fields are kept as an ordered JSON map so that
//! arbitrary extras survive a round trip untouched. The two fields the
//! server owns, `id` and `timestamp`, are typed separately and always
//! serialized after the caller's fields.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form fields collected by the voice agent (name, phone, ...).
pub type PatientFields = Map<String, Value>;

/// Keys reserved for server-assigned values.
const RESERVED_KEYS: [&str; 2] = ["id", "timestamp"];

/// Sequential patient identifier.
///
/// Assigned as the number of already stored records plus one, so the
/// first patient is `1`.
///
/// # Example
///
/// ```
/// use callintake_core::models::PatientId;
/// assert_eq!(PatientId::following(0), PatientId(1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub u64);

impl PatientId {
    /// Placeholder for records loaded without an `id`.
    pub const UNASSIGNED: Self = Self(0);

    /// Returns the id for a record inserted after `existing` records.
    pub fn following(existing: usize) -> Self {
        let existing = u64::try_from(existing).unwrap_or(u64::MAX - 1);
        Self(existing.saturating_add(1))
    }

    /// Whether this is the placeholder for a missing `id`.
    pub fn is_unassigned(&self) -> bool {
        *self == Self::UNASSIGNED
    }
}

impl Default for PatientId {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PatientId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A stored patient intake record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Caller-supplied fields in arrival order.
    #[serde(flatten)]
    pub fields: PatientFields,

    /// Server-assigned identifier.
    ///
    /// Records written elsewhere may lack one; they load as
    /// `PatientId::UNASSIGNED` and are written back without the key.
    #[serde(default, skip_serializing_if = "PatientId::is_unassigned")]
    pub id: PatientId,

    /// ISO-8601 creation time.
    ///
    /// Kept as text so documents written by other tools load unchanged. An
    /// absent timestamp loads as empty and stays absent on save.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

impl PatientRecord {
    /// Creates a record, discarding any caller-supplied `id` or `timestamp`.
    pub fn new(fields: PatientFields, id: PatientId, timestamp: impl Into<String>) -> Self {
        let fields = fields.into_iter().filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str())).collect();

        Self { fields, id, timestamp: timestamp.into() }
    }

    /// Returns a caller-supplied field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns a caller-supplied field as a string slice, if it is a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

/// The persisted collection of patient records.
///
/// Top-level keys other than `patients` are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Records in insertion order.
    pub patients: Vec<PatientRecord>,

    /// Any other top-level keys found in the document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StoreDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id the next inserted record will receive.
    pub fn next_id(&self) -> PatientId {
        PatientId::following(self.patients.len())
    }

    /// Stamps `fields` with the next id and `timestamp` and appends them.
    pub fn insert(&mut self, fields: PatientFields, timestamp: impl Into<String>) -> &PatientRecord {
        let record = PatientRecord::new(fields, self.next_id(), timestamp);
        self.patients.push(record);
        &self.patients[self.patients.len() - 1]
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Whether the document holds no records.
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
