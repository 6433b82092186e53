//! Driver-independent representation of Neo4j result values.
//!
//! Every value coming out of the Bolt client is converted into a [`GraphValue`]
//! at the ingestion boundary (see [`crate::reverse`]). Normalization then works
//! on this closed set of variants only.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A single value as produced by a graph query.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
    List(Vec<GraphValue>),
    /// Generic property or literal map.
    Map(Vec<(String, GraphValue)>),
    /// One result row: column name to value, in column order.
    Record(Vec<(String, GraphValue)>),
    Node(GraphNode),
    Relationship(GraphRelationship),
    Path(GraphPath),
    /// Zoned or offset date-time.
    DateTime(DateTime<FixedOffset>),
    LocalDateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(TimeWithOffset),
    LocalTime(NaiveTime),
    Duration(GraphDuration),
    Point(GraphPoint),
}

/// A node with its internal id, labels and properties.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: i64,
    pub labels: Vec<String>,
    pub properties: Vec<(String, GraphValue)>,
}

impl GraphNode {
    pub fn new(id: i64, labels: Vec<String>, properties: Vec<(String, GraphValue)>) -> Self {
        Self {
            id,
            labels,
            properties,
        }
    }
}

/// A directed, typed relationship between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphRelationship {
    pub id: i64,
    pub rel_type: String,
    pub start_node_id: i64,
    pub end_node_id: i64,
    pub properties: Vec<(String, GraphValue)>,
}

impl GraphRelationship {
    pub fn new(
        id: i64,
        rel_type: impl Into<String>,
        start_node_id: i64,
        end_node_id: i64,
        properties: Vec<(String, GraphValue)>,
    ) -> Self {
        Self {
            id,
            rel_type: rel_type.into(),
            start_node_id,
            end_node_id,
            properties,
        }
    }
}

/// A walk through the graph: nodes and relationships in traversal order.
///
/// A path of `n` relationships holds `n + 1` nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPath {
    pub nodes: Vec<GraphNode>,
    pub relationships: Vec<GraphRelationship>,
}

/// Time of day with a UTC offset (Cypher `TIME`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWithOffset {
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

impl fmt::Display for TimeWithOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time, self.offset)
    }
}

/// Cypher `DURATION`, kept in its calendar components.
///
/// Same layout as Bolt: `nanoseconds` is always in `0..1_000_000_000` and adds
/// to `seconds`, so `-1.5s` is stored as `seconds = -2, nanoseconds = 500_000_000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GraphDuration {
    pub months: i64,
    pub days: i64,
    pub seconds: i64,
    pub nanoseconds: u32,
}

impl GraphDuration {
    pub fn new(months: i64, days: i64, seconds: i64, nanoseconds: u32) -> Self {
        Self {
            months,
            days,
            seconds,
            nanoseconds,
        }
    }
}

const NANOS_PER_SECOND: u128 = 1_000_000_000;

impl fmt::Display for GraphDuration {
    /// ISO-8601 duration, e.g. `P1Y2M3DT4H5M6.5S`. A zero duration prints `PT0S`.
    ///
    /// Negative components carry their own sign, as Cypher prints them:
    /// `PT-1H-30M`, `PT-1.5S`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = self.months / 12;
        let months = self.months % 12;

        let total_nanos =
            i128::from(self.seconds) * 1_000_000_000 + i128::from(self.nanoseconds);
        let sign = if total_nanos < 0 { "-" } else { "" };
        let magnitude = total_nanos.unsigned_abs();
        let hours = magnitude / (3_600 * NANOS_PER_SECOND);
        let minutes = (magnitude / (60 * NANOS_PER_SECOND)) % 60;
        let seconds = (magnitude / NANOS_PER_SECOND) % 60;
        let fraction = magnitude % NANOS_PER_SECOND;

        write!(f, "P")?;
        if years != 0 {
            write!(f, "{years}Y")?;
        }
        if months != 0 {
            write!(f, "{months}M")?;
        }
        if self.days != 0 {
            write!(f, "{}D", self.days)?;
        }

        let has_time = magnitude != 0;
        let is_zero = self.months == 0 && self.days == 0 && !has_time;
        if has_time || is_zero {
            write!(f, "T")?;
            if hours != 0 {
                write!(f, "{sign}{hours}H")?;
            }
            if minutes != 0 {
                write!(f, "{sign}{minutes}M")?;
            }
            if seconds != 0 || fraction != 0 || is_zero {
                if fraction == 0 {
                    write!(f, "{sign}{seconds}S")?;
                } else {
                    let fraction = format!("{fraction:09}");
                    write!(f, "{sign}{seconds}.{}S", fraction.trim_end_matches('0'))?;
                }
            }
        }
        Ok(())
    }
}

/// A spatial point in a coordinate reference system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphPoint {
    pub srid: i64,
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl From<GraphNode> for GraphValue {
    fn from(node: GraphNode) -> Self {
        GraphValue::Node(node)
    }
}

impl From<GraphRelationship> for GraphValue {
    fn from(rel: GraphRelationship) -> Self {
        GraphValue::Relationship(rel)
    }
}

impl From<GraphPath> for GraphValue {
    fn from(path: GraphPath) -> Self {
        GraphValue::Path(path)
    }
}

impl From<bool> for GraphValue {
    fn from(b: bool) -> Self {
        GraphValue::Boolean(b)
    }
}

impl From<i64> for GraphValue {
    fn from(i: i64) -> Self {
        GraphValue::Integer(i)
    }
}

impl From<f64> for GraphValue {
    fn from(f: f64) -> Self {
        GraphValue::Float(f)
    }
}

impl From<&str> for GraphValue {
    fn from(s: &str) -> Self {
        GraphValue::String(s.to_string())
    }
}

impl From<String> for GraphValue {
    fn from(s: String) -> Self {
        GraphValue::String(s)
    }
}

/// Already-normalized JSON maps back onto the primitive variants, so feeding
/// normalized output through normalization again is the identity.
impl From<serde_json::Value> for GraphValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => GraphValue::Null,
            serde_json::Value::Bool(b) => GraphValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => GraphValue::Integer(i),
                // u64 beyond i64 and all fractional numbers
                None => n.as_f64().map(GraphValue::Float).unwrap_or(GraphValue::Null),
            },
            serde_json::Value::String(s) => GraphValue::String(s),
            serde_json::Value::Array(items) => {
                GraphValue::List(items.into_iter().map(GraphValue::from).collect())
            }
            serde_json::Value::Object(map) => GraphValue::Map(
                map.into_iter()
                    .map(|(k, v)| (k, GraphValue::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_duration_display_calendar_components() {
        let d = GraphDuration::new(14, 3, 4 * 3600 + 5 * 60 + 6, 0);
        assert_eq!(d.to_string(), "P1Y2M3DT4H5M6S");
    }

    #[test]
    fn test_duration_display_zero() {
        assert_eq!(GraphDuration::default().to_string(), "PT0S");
    }

    #[test]
    fn test_duration_display_fractional_seconds() {
        let d = GraphDuration::new(0, 0, 6, 500_000_000);
        assert_eq!(d.to_string(), "PT6.5S");

        let d = GraphDuration::new(0, 0, 0, 7);
        assert_eq!(d.to_string(), "PT0.000000007S");
    }

    #[test]
    fn test_duration_display_date_only() {
        let d = GraphDuration::new(0, 10, 0, 0);
        assert_eq!(d.to_string(), "P10D");
    }

    #[test]
    fn test_duration_display_negative_components() {
        // duration({seconds: -1.5})
        let d = GraphDuration::new(0, 0, -2, 500_000_000);
        assert_eq!(d.to_string(), "PT-1.5S");

        // duration({hours: -1, minutes: -30})
        let d = GraphDuration::new(0, 0, -5_400, 0);
        assert_eq!(d.to_string(), "PT-1H-30M");

        let d = GraphDuration::new(-14, -3, 0, 0);
        assert_eq!(d.to_string(), "P-1Y-2M-3D");
    }

    #[test]
    fn test_duration_display_months_stay_months() {
        assert_eq!(GraphDuration::new(1, 0, 0, 0).to_string(), "P1M");
        assert_eq!(GraphDuration::new(12, 0, 0, 0).to_string(), "P1Y");
    }

    #[test]
    fn test_time_with_offset_display() {
        let t = TimeWithOffset {
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            offset: FixedOffset::east_opt(3600).unwrap(),
        };
        assert_eq!(t.to_string(), "14:30:00+01:00");
    }

    #[test]
    fn test_from_json_value() {
        let value = GraphValue::from(json!({"a": [1, 2.5, null, true, "x"]}));
        assert_eq!(
            value,
            GraphValue::Map(vec![(
                "a".to_string(),
                GraphValue::List(vec![
                    GraphValue::Integer(1),
                    GraphValue::Float(2.5),
                    GraphValue::Null,
                    GraphValue::Boolean(true),
                    GraphValue::String("x".to_string()),
                ])
            )])
        );
    }
}
