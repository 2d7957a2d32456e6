//! Webhook payload builders.

use serde_json::{json, Map, Value};

/// Payload announcing a call has started.
pub fn call_started() -> Value {
    json!({"event": "call_started"})
}

/// Payload announcing a call has ended.
pub fn call_ended() -> Value {
    json!({"event": "call_ended"})
}

/// Builder for `save_data` function call payloads.
///
/// ```
/// use callintake_testing::SaveDataBuilder;
///
/// let payload = SaveDataBuilder::with_defaults().phone("555-0100").build();
/// assert_eq!(payload["function_call"]["name"], "save_data");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SaveDataBuilder {
    arguments: Map<String, Value>,
    omit_arguments: bool,
    event: Option<String>,
}

impl SaveDataBuilder {
    /// Creates a builder with empty arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder with a complete intake record.
    pub fn with_defaults() -> Self {
        Self::new()
            .name("Jane Doe")
            .date_of_birth("1990-04-12")
            .phone("555-1234")
            .reason("Annual checkup")
    }

    /// Sets the caller's name.
    #[must_use]
    pub fn name(self, name: &str) -> Self {
        self.field("name", json!(name))
    }

    /// Sets the caller's date of birth.
    #[must_use]
    pub fn date_of_birth(self, dob: &str) -> Self {
        self.field("date_of_birth", json!(dob))
    }

    /// Sets the caller's phone number.
    #[must_use]
    pub fn phone(self, phone: &str) -> Self {
        self.field("phone", json!(phone))
    }

    /// Sets the reason for the call.
    #[must_use]
    pub fn reason(self, reason: &str) -> Self {
        self.field("reason", json!(reason))
    }

    /// Sets an arbitrary argument.
    #[must_use]
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.arguments.insert(key.to_string(), value);
        self
    }

    /// Removes an argument.
    #[must_use]
    pub fn without(mut self, key: &str) -> Self {
        self.arguments = std::mem::take(&mut self.arguments)
            .into_iter()
            .filter(|(existing, _)| existing != key)
            .collect();
        self
    }

    /// Leaves `arguments` out of the function call entirely.
    #[must_use]
    pub fn omit_arguments(mut self) -> Self {
        self.omit_arguments = true;
        self
    }

    /// Adds a top-level `event` alongside the function call.
    #[must_use]
    pub fn event(mut self, event: &str) -> Self {
        self.event = Some(event.to_string());
        self
    }

    /// Builds the webhook payload.
    pub fn build(self) -> Value {
        let mut function_call = Map::new();
        function_call.insert("name".to_string(), json!("save_data"));
        if !self.omit_arguments {
            function_call.insert("arguments".to_string(), Value::Object(self.arguments));
        }

        let mut payload = Map::new();
        if let Some(event) = self.event {
            payload.insert("event".to_string(), json!(event));
        }
        payload.insert("function_call".to_string(), Value::Object(function_call));

        Value::Object(payload)
    }
}
