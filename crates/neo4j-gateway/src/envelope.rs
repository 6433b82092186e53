//! Uniform success/error envelope returned to agent frameworks.
//!
//! Wire shape:
//!
//! ```text
//! success: { "status": "success", "<payload_key>": <payload> }
//! error:   { "status": "error", "error_message": "<string>" }
//! ```

use neo4j_types::{normalize_record, GraphValue};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Payload key used for query results.
pub const QUERY_RESULT_KEY: &str = "query_result";

/// Key holding the message of an error envelope.
pub const ERROR_MESSAGE_KEY: &str = "error_message";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Outcome of a tool call. Exactly one of payload or message is present,
/// selected by the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success { key: String, payload: Value },
    Error { message: String },
}

/// Build a success envelope holding `payload` under `key`.
pub fn tool_success(key: impl Into<String>, payload: Value) -> Envelope {
    Envelope::Success {
        key: key.into(),
        payload,
    }
}

/// Build an error envelope.
pub fn tool_error(message: impl Into<String>) -> Envelope {
    Envelope::Error {
        message: message.into(),
    }
}

/// Normalize materialized records and wrap them under [`QUERY_RESULT_KEY`].
///
/// Records keep their order. Values that are not records are normalized as-is.
pub fn records_to_envelope(records: Vec<GraphValue>) -> Envelope {
    let rows = records
        .into_iter()
        .map(|record| match record {
            GraphValue::Record(columns) => normalize_record(columns),
            other => neo4j_types::normalize(other),
        })
        .collect();
    tool_success(QUERY_RESULT_KEY, Value::Array(rows))
}

impl Envelope {
    pub fn status(&self) -> Status {
        match self {
            Envelope::Success { .. } => Status::Success,
            Envelope::Error { .. } => Status::Error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }

    /// The success payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Envelope::Success { payload, .. } => Some(payload),
            Envelope::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Envelope::Success { .. } => None,
            Envelope::Error { message } => Some(message),
        }
    }

    /// The envelope as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut object = serde_json::Map::new();
        object.insert("status".to_string(), status_value(self.status()));
        match self {
            Envelope::Success { key, payload } => {
                object.insert(key.clone(), payload.clone());
            }
            Envelope::Error { message } => {
                object.insert(ERROR_MESSAGE_KEY.to_string(), Value::String(message.clone()));
            }
        }
        Value::Object(object)
    }
}

fn status_value(status: Status) -> Value {
    match status {
        Status::Success => Value::String("success".to_string()),
        Status::Error => Value::String("error".to_string()),
    }
}

impl Serialize for Envelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("status", &self.status())?;
        match self {
            Envelope::Success { key, payload } => map.serialize_entry(key, payload)?,
            Envelope::Error { message } => map.serialize_entry(ERROR_MESSAGE_KEY, message)?,
        }
        map.end()
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        envelope.to_json()
    }
}
