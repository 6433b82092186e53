//! Reverse conversion: Neo4j BoltType → GraphValue
//!
//! This is the ingestion boundary. Every Bolt variant the driver can hand back
//! maps onto one [`GraphValue`] variant, so the rest of the crate never touches
//! driver types.
//!
//! ## Totality
//!
//! Conversion never fails. Temporal values the driver refuses to convert into
//! chrono types (out-of-range dates, unknown zone ids) fall back to the Bolt
//! value's debug text.
//!
//! ## Paths
//!
//! Bolt paths carry unbounded relationships plus an index sequence that
//! describes the walk. Start and end node ids are resolved from that sequence,
//! honoring relationships traversed against their direction.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use neo4rs::{BoltMap, BoltNode, BoltPath, BoltRelation, BoltType, DeError};
use serde::de::IntoDeserializer;
use serde::Deserialize;

use crate::value::{
    GraphDuration, GraphNode, GraphPath, GraphPoint, GraphRelationship, GraphValue, TimeWithOffset,
};

impl GraphValue {
    /// Convert a Neo4j BoltType into a GraphValue.
    pub fn from_bolt(bolt: BoltType) -> Self {
        convert_bolt_to_graph_value(bolt)
    }

    /// Build a record from `(column, value)` pairs as returned by a row.
    pub fn record_from_bolt<I, K>(columns: I) -> Self
    where
        I: IntoIterator<Item = (K, BoltType)>,
        K: Into<String>,
    {
        GraphValue::Record(
            columns
                .into_iter()
                .map(|(key, value)| (key.into(), convert_bolt_to_graph_value(value)))
                .collect(),
        )
    }
}

impl From<BoltType> for GraphValue {
    fn from(bolt: BoltType) -> Self {
        convert_bolt_to_graph_value(bolt)
    }
}

/// Convert a Neo4j BoltType to a GraphValue.
pub fn convert_bolt_to_graph_value(bolt: BoltType) -> GraphValue {
    match bolt {
        BoltType::Null(_) => GraphValue::Null,

        BoltType::Boolean(b) => GraphValue::Boolean(b.value),

        BoltType::Integer(i) => GraphValue::Integer(i.value),

        BoltType::Float(f) => GraphValue::Float(f.value),

        BoltType::String(s) => GraphValue::String(s.value),

        BoltType::Bytes(b) => GraphValue::Bytes(b.value.to_vec()),

        BoltType::List(list) => GraphValue::List(
            list.value
                .into_iter()
                .map(convert_bolt_to_graph_value)
                .collect(),
        ),

        BoltType::Map(map) => GraphValue::Map(convert_properties(map)),

        BoltType::Node(node) => GraphValue::Node(convert_node(node)),

        BoltType::Relation(rel) => GraphValue::Relationship(convert_relation(rel)),

        // Outside of a path there is no walk to recover the endpoints from.
        BoltType::UnboundedRelation(rel) => GraphValue::Relationship(GraphRelationship::new(
            rel.id.value,
            rel.typ.value,
            -1,
            -1,
            convert_properties(rel.properties),
        )),

        BoltType::Path(path) => GraphValue::Path(convert_path(path)),

        BoltType::Date(date) => {
            let fallback = format!("{date:?}");
            let converted: Result<NaiveDate, _> = date.try_into();
            match converted {
                Ok(d) => GraphValue::Date(d),
                Err(e) => unconvertible("Date", fallback, e),
            }
        }

        BoltType::Time(time) => {
            let (time, offset): (NaiveTime, FixedOffset) = time.into();
            GraphValue::Time(TimeWithOffset { time, offset })
        }

        BoltType::LocalTime(local_time) => {
            let time: NaiveTime = local_time.into();
            GraphValue::LocalTime(time)
        }

        BoltType::DateTime(dt) => {
            let fallback = format!("{dt:?}");
            let converted: Result<DateTime<FixedOffset>, _> = dt.try_into();
            match converted {
                Ok(dt) => GraphValue::DateTime(dt),
                Err(e) => unconvertible("DateTime", fallback, e),
            }
        }

        BoltType::LocalDateTime(local_dt) => {
            let fallback = format!("{local_dt:?}");
            let converted: Result<NaiveDateTime, _> = local_dt.try_into();
            match converted {
                Ok(dt) => GraphValue::LocalDateTime(dt),
                Err(e) => unconvertible("LocalDateTime", fallback, e),
            }
        }

        BoltType::DateTimeZoneId(dt_zone) => {
            // Resolved to the offset in effect at that instant
            let converted: Result<DateTime<FixedOffset>, _> = (&dt_zone).try_into();
            match converted {
                Ok(dt) => GraphValue::DateTime(dt),
                Err(e) => unconvertible("DateTimeZoneId", format!("{dt_zone:?}"), e),
            }
        }

        duration @ BoltType::Duration(_) => convert_duration(duration),

        BoltType::Point2D(point) => GraphValue::Point(GraphPoint {
            srid: point.sr_id.value,
            x: point.x.value,
            y: point.y.value,
            z: None,
        }),

        BoltType::Point3D(point) => GraphValue::Point(GraphPoint {
            srid: point.sr_id.value,
            x: point.x.value,
            y: point.y.value,
            z: Some(point.z.value),
        }),
    }
}

/// Read a duration as its raw `(months, days, seconds, nanoseconds)` fields.
///
/// The driver's `std::time::Duration` conversion folds months into seconds, so
/// the components are deserialized directly instead.
fn convert_duration(bolt: BoltType) -> GraphValue {
    let components: Result<(i64, i64, i64, i64), DeError> =
        Deserialize::deserialize(IntoDeserializer::<'_, DeError>::into_deserializer(&bolt));
    match components {
        Ok((months, days, seconds, nanoseconds)) => match u32::try_from(nanoseconds) {
            Ok(nanoseconds) => {
                GraphValue::Duration(GraphDuration::new(months, days, seconds, nanoseconds))
            }
            Err(e) => unconvertible("Duration", format!("{bolt:?}"), e),
        },
        Err(e) => unconvertible("Duration", format!("{bolt:?}"), e),
    }
}

fn unconvertible(kind: &str, fallback: String, error: impl std::fmt::Display) -> GraphValue {
    tracing::debug!("Keeping Neo4j {kind} as text, conversion failed: {error}");
    GraphValue::String(fallback)
}

fn convert_properties(map: BoltMap) -> Vec<(String, GraphValue)> {
    let mut properties: Vec<(String, GraphValue)> = map
        .value
        .into_iter()
        .map(|(key, value)| (key.value, convert_bolt_to_graph_value(value)))
        .collect();
    // Bolt maps are unordered; sort so output is stable across runs
    properties.sort_by(|a, b| a.0.cmp(&b.0));
    properties
}

fn convert_node(node: BoltNode) -> GraphNode {
    let labels = node
        .labels
        .value
        .into_iter()
        .filter_map(|label| match label {
            BoltType::String(s) => Some(s.value),
            _ => None,
        })
        .collect();

    GraphNode::new(node.id.value, labels, convert_properties(node.properties))
}

fn convert_relation(rel: BoltRelation) -> GraphRelationship {
    GraphRelationship::new(
        rel.id.value,
        rel.typ.value,
        rel.start_node_id.value,
        rel.end_node_id.value,
        convert_properties(rel.properties),
    )
}

/// Rebuild the walk described by a Bolt path.
///
/// `indices` alternates a 1-based relationship index (negative when the
/// relationship is traversed end-to-start) and a 0-based node index. The walk
/// always begins at the first node.
fn convert_path(path: BoltPath) -> GraphPath {
    let nodes: Vec<GraphNode> = path
        .nodes
        .value
        .into_iter()
        .filter_map(|n| match n {
            BoltType::Node(node) => Some(convert_node(node)),
            _ => None,
        })
        .collect();

    let rels: Vec<UnboundRelationship> = path
        .rels
        .value
        .into_iter()
        .filter_map(|r| match r {
            BoltType::UnboundedRelation(rel) => Some((
                rel.id.value,
                rel.typ.value,
                convert_properties(rel.properties),
            )),
            _ => None,
        })
        .collect();

    let indices: Vec<i64> = path
        .indices
        .value
        .into_iter()
        .filter_map(|i| match i {
            BoltType::Integer(i) => Some(i.value),
            _ => None,
        })
        .collect();

    resolve_walk(nodes, rels, &indices)
}

/// A path relationship before its endpoints are known: id, type, properties.
type UnboundRelationship = (i64, String, Vec<(String, GraphValue)>);

fn resolve_walk(
    nodes: Vec<GraphNode>,
    rels: Vec<UnboundRelationship>,
    indices: &[i64],
) -> GraphPath {
    let Some(first) = nodes.first() else {
        return GraphPath {
            nodes: Vec::new(),
            relationships: Vec::new(),
        };
    };

    let mut walk_nodes = vec![first.clone()];
    let mut walk_rels = Vec::with_capacity(indices.len() / 2);
    let mut previous = first.id;

    for step in indices.chunks_exact(2) {
        let (rel_index, node_index) = (step[0], step[1]);
        let Some(node) = usize::try_from(node_index).ok().and_then(|i| nodes.get(i)) else {
            break;
        };
        let Some((id, rel_type, properties)) = usize::try_from(rel_index.unsigned_abs())
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| rels.get(i))
        else {
            break;
        };

        let (start, end) = if rel_index > 0 {
            (previous, node.id)
        } else {
            (node.id, previous)
        };
        walk_rels.push(GraphRelationship::new(
            *id,
            rel_type.clone(),
            start,
            end,
            properties.clone(),
        ));
        walk_nodes.push(node.clone());
        previous = node.id;
    }

    GraphPath {
        nodes: walk_nodes,
        relationships: walk_rels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};
    use neo4rs::{
        BoltBoolean, BoltBytes, BoltDate, BoltDateTime, BoltDuration, BoltFloat, BoltInteger,
        BoltList, BoltLocalDateTime, BoltNull, BoltString,
    };

    #[test]
    fn test_null_conversion() {
        assert_eq!(
            convert_bolt_to_graph_value(BoltType::Null(BoltNull)),
            GraphValue::Null
        );
    }

    #[test]
    fn test_scalar_conversion() {
        assert_eq!(
            GraphValue::from_bolt(BoltType::Boolean(BoltBoolean::new(true))),
            GraphValue::Boolean(true)
        );
        assert_eq!(
            GraphValue::from_bolt(BoltType::Integer(BoltInteger::new(i64::MAX))),
            GraphValue::Integer(i64::MAX)
        );
        assert_eq!(
            GraphValue::from_bolt(BoltType::Float(BoltFloat::new(1.5))),
            GraphValue::Float(1.5)
        );
        assert_eq!(
            GraphValue::from_bolt(BoltType::String(BoltString::new("hello world"))),
            GraphValue::String("hello world".to_string())
        );
    }

    #[test]
    fn test_nan_is_kept_for_normalization() {
        let value = GraphValue::from_bolt(BoltType::Float(BoltFloat::new(f64::NAN)));
        assert!(matches!(value, GraphValue::Float(f) if f.is_nan()));
    }

    #[test]
    fn test_bytes_conversion() {
        let bytes = vec![0xDE, 0xAD, 0xBE, 0xEF];
        let value = GraphValue::from_bolt(BoltType::Bytes(BoltBytes::new(bytes.clone().into())));
        assert_eq!(value, GraphValue::Bytes(bytes));
    }

    #[test]
    fn test_list_conversion_keeps_order() {
        let mut bolt_list = BoltList::new();
        bolt_list.push(BoltType::Integer(BoltInteger::new(3)));
        bolt_list.push(BoltType::String(BoltString::new("a")));
        bolt_list.push(BoltType::Null(BoltNull));

        assert_eq!(
            GraphValue::from_bolt(BoltType::List(bolt_list)),
            GraphValue::List(vec![
                GraphValue::Integer(3),
                GraphValue::String("a".to_string()),
                GraphValue::Null,
            ])
        );
    }

    #[test]
    fn test_map_conversion_sorted_by_key() {
        let mut bolt_map = BoltMap::new();
        bolt_map.put("name".into(), BoltType::String(BoltString::new("Alice")));
        bolt_map.put("age".into(), BoltType::Integer(BoltInteger::new(30)));

        assert_eq!(
            GraphValue::from_bolt(BoltType::Map(bolt_map)),
            GraphValue::Map(vec![
                ("age".to_string(), GraphValue::Integer(30)),
                ("name".to_string(), GraphValue::String("Alice".to_string())),
            ])
        );
    }

    #[test]
    fn test_record_from_columns() {
        let record = GraphValue::record_from_bolt(vec![
            ("x", BoltType::Integer(BoltInteger::new(1))),
            ("y", BoltType::Boolean(BoltBoolean::new(false))),
        ]);
        assert_eq!(
            record,
            GraphValue::Record(vec![
                ("x".to_string(), GraphValue::Integer(1)),
                ("y".to_string(), GraphValue::Boolean(false)),
            ])
        );
    }

    #[test]
    fn test_date_conversion() {
        let naive_date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let value = GraphValue::from_bolt(BoltType::Date(BoltDate::from(naive_date)));
        match value {
            GraphValue::Date(d) => {
                assert_eq!(d.year(), 2024);
                assert_eq!(d.month(), 6);
                assert_eq!(d.day(), 15);
            }
            other => panic!("Expected Date, got {other:?}"),
        }
    }

    #[test]
    fn test_local_datetime_conversion() {
        let naive_dt = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            NaiveTime::from_hms_opt(10, 30, 45).unwrap(),
        );
        let value = GraphValue::from_bolt(BoltType::LocalDateTime(BoltLocalDateTime::from(
            naive_dt,
        )));
        match value {
            GraphValue::LocalDateTime(dt) => {
                assert_eq!(dt.hour(), 10);
                assert_eq!(dt.minute(), 30);
                assert_eq!(dt.second(), 45);
            }
            other => panic!("Expected LocalDateTime, got {other:?}"),
        }
    }

    #[test]
    fn test_datetime_keeps_offset() {
        let dt = FixedOffset::east_opt(3600)
            .unwrap()
            .from_local_datetime(&NaiveDateTime::new(
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            ))
            .unwrap();
        let value = GraphValue::from_bolt(BoltType::DateTime(BoltDateTime::from(dt)));
        match value {
            GraphValue::DateTime(converted) => {
                assert_eq!(converted, dt);
                assert_eq!(converted.offset().local_minus_utc(), 3600);
            }
            other => panic!("Expected DateTime, got {other:?}"),
        }
    }

    fn node(id: i64) -> GraphNode {
        GraphNode::new(id, vec!["Person".to_string()], vec![])
    }

    fn unbound(id: i64) -> UnboundRelationship {
        (id, "KNOWS".to_string(), vec![])
    }

    fn bolt_duration(months: i64, days: i64, seconds: i64, nanoseconds: i64) -> BoltType {
        BoltType::Duration(BoltDuration::new(
            BoltInteger::new(months),
            BoltInteger::new(days),
            BoltInteger::new(seconds),
            BoltInteger::new(nanoseconds),
        ))
    }

    #[test]
    fn test_duration_keeps_months() {
        // duration({months: 1})
        let converted = GraphValue::from_bolt(bolt_duration(1, 0, 0, 0));
        assert_eq!(
            converted,
            GraphValue::Duration(GraphDuration::new(1, 0, 0, 0))
        );
        assert_eq!(crate::normalize(converted), serde_json::json!("P1M"));
    }

    #[test]
    fn test_duration_negative_fraction() {
        // duration({seconds: -1.5})
        let converted = GraphValue::from_bolt(bolt_duration(0, 0, -2, 500_000_000));
        assert_eq!(
            converted,
            GraphValue::Duration(GraphDuration::new(0, 0, -2, 500_000_000))
        );
        assert_eq!(crate::normalize(converted), serde_json::json!("PT-1.5S"));
    }

    #[test]
    fn test_duration_all_components() {
        let converted = GraphValue::from_bolt(bolt_duration(14, 3, 14_706, 5));
        assert_eq!(
            converted,
            GraphValue::Duration(GraphDuration::new(14, 3, 14_706, 5))
        );
    }

    #[test]
    fn test_walk_forward() {
        // (5)-[:KNOWS]->(6)-[:KNOWS]->(7)
        let path = resolve_walk(
            vec![node(5), node(6), node(7)],
            vec![unbound(90), unbound(91)],
            &[1, 1, 2, 2],
        );
        let ids: Vec<i64> = path.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 6, 7]);
        assert_eq!(path.relationships.len(), 2);
        assert_eq!(path.relationships[0].id, 90);
        assert_eq!(path.relationships[0].start_node_id, 5);
        assert_eq!(path.relationships[0].end_node_id, 6);
        assert_eq!(path.relationships[1].start_node_id, 6);
        assert_eq!(path.relationships[1].end_node_id, 7);
    }

    #[test]
    fn test_walk_against_direction() {
        // (5)<-[:KNOWS]-(6)
        let path = resolve_walk(vec![node(5), node(6)], vec![unbound(90)], &[-1, 1]);
        assert_eq!(path.relationships[0].start_node_id, 6);
        assert_eq!(path.relationships[0].end_node_id, 5);
    }

    #[test]
    fn test_walk_revisits_nodes() {
        // (5)-[:KNOWS]->(6)-[:KNOWS]->(5)
        let path = resolve_walk(
            vec![node(5), node(6)],
            vec![unbound(90), unbound(91)],
            &[1, 1, 2, 0],
        );
        let ids: Vec<i64> = path.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![5, 6, 5]);
        assert_eq!(path.relationships[1].start_node_id, 6);
        assert_eq!(path.relationships[1].end_node_id, 5);
    }

    #[test]
    fn test_walk_single_node() {
        let path = resolve_walk(vec![node(5)], vec![], &[]);
        assert_eq!(path.nodes.len(), 1);
        assert!(path.relationships.is_empty());
    }

    #[test]
    fn test_walk_stops_at_bad_index() {
        let path = resolve_walk(vec![node(5), node(6)], vec![unbound(90)], &[1, 1, 3, 0]);
        assert_eq!(path.nodes.len(), 2);
        assert_eq!(path.relationships.len(), 1);
    }
}
