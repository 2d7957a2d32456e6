//! Proptest strategies for webhook payloads.

use proptest::{collection, option, prelude::*};
use serde_json::{json, Map, Value};

/// A generated webhook together with what it should do to the store.
#[derive(Debug, Clone)]
pub enum WebhookAction {
    /// `call_started` or `call_ended`.
    Lifecycle(Value),
    /// A `save_data` call with the given arguments.
    Save(Map<String, Value>),
    /// A payload that must be acknowledged without side effects.
    Other(Value),
}

impl WebhookAction {
    /// Returns the payload to POST.
    pub fn payload(&self) -> Value {
        match self {
            Self::Lifecycle(payload) | Self::Other(payload) => payload.clone(),
            Self::Save(arguments) => json!({
                "function_call": {"name": "save_data", "arguments": arguments},
            }),
        }
    }
}

/// Short printable text.
pub fn text_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .'-]{0,24}"
}

/// Scalar JSON values used for optional extras.
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        text_strategy().prop_map(Value::String),
    ]
}

/// `save_data` arguments with any subset of the standard intake fields,
/// a few extras, and occasionally caller-supplied `id`/`timestamp` keys.
pub fn patient_arguments_strategy() -> impl Strategy<Value = Map<String, Value>> {
    (
        option::of(text_strategy()),
        option::of("[0-9]{4}-[0-9]{2}-[0-9]{2}"),
        option::of("[0-9]{3}-[0-9]{4}"),
        option::of(text_strategy()),
        collection::btree_map("x_[a-z]{1,8}", scalar_strategy(), 0..3),
        option::of(any::<u16>()),
        option::of("20[0-9]{2}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}"),
    )
        .prop_map(|(name, dob, phone, reason, extras, spoofed_id, spoofed_timestamp)| {
            let mut arguments = Map::new();
            for (key, value) in [("name", name), ("date_of_birth", dob), ("phone", phone), ("reason", reason)] {
                if let Some(value) = value {
                    arguments.insert(key.to_string(), Value::String(value));
                }
            }
            for (key, value) in extras {
                arguments.insert(key, value);
            }
            if let Some(id) = spoofed_id {
                arguments.insert("id".to_string(), json!(id));
            }
            if let Some(timestamp) = spoofed_timestamp {
                arguments.insert("timestamp".to_string(), Value::String(timestamp));
            }
            arguments
        })
}

/// Payloads that are acknowledged without touching the store.
pub fn other_payload_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!({})),
        Just(json!({"event": "call_analyzed"})),
        text_strategy().prop_map(|name| json!({"function_call": {"name": format!("fn_{name}")}})),
        any::<i64>().prop_map(|n| json!([n])),
        Just(json!(null)),
    ]
}

/// Any single webhook action.
pub fn webhook_action_strategy() -> impl Strategy<Value = WebhookAction> {
    prop_oneof![
        1 => Just(WebhookAction::Lifecycle(json!({"event": "call_started"}))),
        1 => Just(WebhookAction::Lifecycle(json!({"event": "call_ended"}))),
        3 => patient_arguments_strategy().prop_map(WebhookAction::Save),
        1 => other_payload_strategy().prop_map(WebhookAction::Other),
    ]
}

/// A sequence of webhook actions as one call session might produce.
pub fn webhook_session_strategy(max_len: usize) -> impl Strategy<Value = Vec<WebhookAction>> {
    collection::vec(webhook_action_strategy(), 0..max_len)
}
