//! Invariant checks over the persisted store.

use anyhow::{ensure, Result};
use callintake_core::{PatientId, StoreDocument};
use serde_json::{Map, Value};

/// Properties that must hold for any store written by one process.
pub struct Invariants;

impl Invariants {
    /// Ids are exactly `1..=N` in document order.
    pub fn sequential_ids(document: &StoreDocument) -> Result<()> {
        for (index, record) in document.patients.iter().enumerate() {
            let expected = PatientId::following(index);
            ensure!(
                record.id == expected,
                "record at position {index} has id {}, expected {expected}",
                record.id
            );
        }
        Ok(())
    }

    /// Every record carries a non-empty timestamp.
    pub fn timestamps_present(document: &StoreDocument) -> Result<()> {
        for record in &document.patients {
            ensure!(!record.timestamp.is_empty(), "record {} has an empty timestamp", record.id);
        }
        Ok(())
    }

    /// Records hold exactly the submitted arguments, in submission order,
    /// ignoring the reserved `id` and `timestamp` keys.
    pub fn matches_submissions(document: &StoreDocument, submitted: &[Map<String, Value>]) -> Result<()> {
        ensure!(
            document.len() == submitted.len(),
            "store holds {} records, {} were submitted",
            document.len(),
            submitted.len()
        );

        for (record, arguments) in document.patients.iter().zip(submitted) {
            let expected: Map<String, Value> = arguments
                .iter()
                .filter(|(key, _)| key.as_str() != "id" && key.as_str() != "timestamp")
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            ensure!(record.fields == expected, "record {} does not match its submission", record.id);
        }
        Ok(())
    }
}
