//! Forward conversion: JSON query parameters → Neo4j BoltType.
//!
//! Callers pass query parameters as a JSON object. Each value is converted to
//! the Bolt type the driver sends over the wire.

use neo4rs::{
    BoltBoolean, BoltFloat, BoltInteger, BoltList, BoltMap, BoltNull, BoltString, BoltType,
};
use serde_json::Value;

/// Query parameters: parameter name to value.
pub type Parameters = serde_json::Map<String, Value>;

/// Convert a JSON value to a BoltType.
///
/// Integers that fit in `i64` become Bolt integers; every other number
/// becomes a Bolt float.
pub fn json_to_bolt(value: Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::Boolean(BoltBoolean::new(b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::Integer(BoltInteger::new(i)),
            None => match n.as_f64() {
                Some(f) => BoltType::Float(BoltFloat::new(f)),
                None => BoltType::Null(BoltNull),
            },
        },
        Value::String(s) => BoltType::String(BoltString::new(&s)),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(json_to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(entries) => {
            let mut map = BoltMap::new();
            for (key, item) in entries {
                map.put(BoltString::new(&key), json_to_bolt(item));
            }
            BoltType::Map(map)
        }
    }
}

/// Convert every parameter value, keeping the parameter names.
pub fn parameters_to_bolt(parameters: Parameters) -> Vec<(String, BoltType)> {
    parameters
        .into_iter()
        .map(|(name, value)| (name, json_to_bolt(value)))
        .collect()
}
