//! Recursive conversion of [`GraphValue`] into plain JSON.
//!
//! The output contains only objects, arrays, strings, numbers, booleans and
//! null, so it can be serialized and handed to any caller as-is.
//!
//! | Input | Output |
//! |---|---|
//! | Record, Map | object, every value normalized |
//! | List | array, every element normalized |
//! | Node | `{"id", "labels", "properties"}` |
//! | Relationship | `{"id", "type", "start_node", "end_node", "properties"}` |
//! | Path | `{"nodes", "relationships"}` |
//! | DateTime, LocalDateTime | ISO-8601 string |
//! | Date, Time, LocalTime, Duration | canonical string |
//! | everything else | the equivalent JSON primitive |

use serde_json::{Map, Number, Value};

use crate::value::{GraphNode, GraphPath, GraphRelationship, GraphValue};

/// Normalize a graph value into JSON. Never fails.
pub fn normalize(value: GraphValue) -> Value {
    match value {
        GraphValue::Record(columns) => normalize_entries(columns),
        GraphValue::Map(entries) => normalize_entries(entries),
        GraphValue::List(items) => Value::Array(items.into_iter().map(normalize).collect()),
        GraphValue::Node(node) => normalize_node(node),
        GraphValue::Relationship(rel) => normalize_relationship(rel),
        GraphValue::Path(path) => normalize_path(path),
        GraphValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
        GraphValue::LocalDateTime(dt) => {
            Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string())
        }
        GraphValue::Date(date) => Value::String(date.to_string()),
        GraphValue::Time(time) => Value::String(time.to_string()),
        GraphValue::LocalTime(time) => Value::String(time.to_string()),
        GraphValue::Duration(duration) => Value::String(duration.to_string()),
        GraphValue::Null => Value::Null,
        GraphValue::Boolean(b) => Value::Bool(b),
        GraphValue::Integer(i) => Value::Number(i.into()),
        // NaN and infinities have no JSON form
        GraphValue::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        GraphValue::String(s) => Value::String(s),
        GraphValue::Bytes(bytes) => Value::String(hex::encode(bytes)),
        GraphValue::Point(point) => {
            let mut coordinates = vec![point.x, point.y];
            coordinates.extend(point.z);
            Value::Array(
                coordinates
                    .into_iter()
                    .map(|c| Number::from_f64(c).map(Value::Number).unwrap_or(Value::Null))
                    .collect(),
            )
        }
    }
}

/// Normalize one result row into a JSON object keyed by column name.
pub fn normalize_record(columns: Vec<(String, GraphValue)>) -> Value {
    normalize(GraphValue::Record(columns))
}

fn normalize_entries(entries: Vec<(String, GraphValue)>) -> Value {
    let object: Map<String, Value> = entries
        .into_iter()
        .map(|(key, value)| (key, normalize(value)))
        .collect();
    Value::Object(object)
}

fn normalize_node(node: GraphNode) -> Value {
    let mut object = Map::new();
    object.insert("id".to_string(), Value::Number(node.id.into()));
    object.insert(
        "labels".to_string(),
        Value::Array(node.labels.into_iter().map(Value::String).collect()),
    );
    object.insert("properties".to_string(), normalize_entries(node.properties));
    Value::Object(object)
}

fn normalize_relationship(rel: GraphRelationship) -> Value {
    let mut object = Map::new();
    object.insert("id".to_string(), Value::Number(rel.id.into()));
    object.insert("type".to_string(), Value::String(rel.rel_type));
    object.insert(
        "start_node".to_string(),
        Value::Number(rel.start_node_id.into()),
    );
    object.insert("end_node".to_string(), Value::Number(rel.end_node_id.into()));
    object.insert("properties".to_string(), normalize_entries(rel.properties));
    Value::Object(object)
}

fn normalize_path(path: GraphPath) -> Value {
    let mut object = Map::new();
    object.insert(
        "nodes".to_string(),
        Value::Array(path.nodes.into_iter().map(normalize_node).collect()),
    );
    object.insert(
        "relationships".to_string(),
        Value::Array(
            path.relationships
                .into_iter()
                .map(normalize_relationship)
                .collect(),
        ),
    );
    Value::Object(object)
}
