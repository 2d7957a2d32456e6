//! Classification of inbound voice-agent webhooks.
//!
//! The platform sends two shapes: lifecycle events carrying an `event`
//! field, and function calls carrying `function_call.name` plus an
//! `arguments` map. Classification turns a raw body into exactly one
//! `WebhookRequest` before anything is dispatched.
//!
//! Precedence:
//! 1. `event` of `call_started` or `call_ended`
//! 2. `function_call` object named `save_data`
//! 3. anything else is acknowledged as unrecognized
//!
//! A body that is valid JSON but not an object is treated like an empty
//! object.

use serde_json::Value;

use crate::{
    error::{IntakeError, Result},
    models::PatientFields,
};

/// Event name sent when a call connects.
pub const CALL_STARTED: &str = "call_started";

/// Event name sent when a call hangs up.
pub const CALL_ENDED: &str = "call_ended";

/// Function the agent calls once it has collected intake details.
pub const SAVE_DATA_FUNCTION: &str = "save_data";

/// A classified webhook.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookRequest {
    /// A call has started.
    CallStarted,

    /// A call has ended.
    CallEnded,

    /// The agent asks to persist collected patient fields.
    SaveData(PatientFields),

    /// Any other payload; acknowledged without side effects.
    Unrecognized,
}

impl WebhookRequest {
    /// Classifies a raw webhook body.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidPayload` if the body is not JSON and
    /// `IntakeError::InvalidArguments` if a `save_data` call carries
    /// arguments that are not an object.
    pub fn classify(body: &[u8]) -> Result<Self> {
        let payload: Value = serde_json::from_slice(body).map_err(IntakeError::InvalidPayload)?;
        Self::from_value(payload)
    }

    /// Classifies an already parsed payload.
    pub fn from_value(payload: Value) -> Result<Self> {
        let Value::Object(mut payload) = payload else { return Ok(Self::Unrecognized) };

        match payload.get("event").and_then(Value::as_str) {
            Some(CALL_STARTED) => return Ok(Self::CallStarted),
            Some(CALL_ENDED) => return Ok(Self::CallEnded),
            _ => {},
        }

        let Some(Value::Object(mut function_call)) = payload.remove("function_call") else {
            return Ok(Self::Unrecognized);
        };

        if function_call.get("name").and_then(Value::as_str) != Some(SAVE_DATA_FUNCTION) {
            return Ok(Self::Unrecognized);
        }

        match function_call.remove("arguments") {
            None => Ok(Self::SaveData(PatientFields::new())),
            Some(Value::Object(arguments)) => Ok(Self::SaveData(arguments)),
            Some(other) => Err(IntakeError::InvalidArguments { kind: json_kind(&other) }),
        }
    }

    /// Returns a short label for logging.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CallStarted => CALL_STARTED,
            Self::CallEnded => CALL_ENDED,
            Self::SaveData(_) => SAVE_DATA_FUNCTION,
            Self::Unrecognized => "unrecognized",
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
