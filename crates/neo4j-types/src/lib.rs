//! Neo4j/Bolt value normalization.
//!
//! This crate turns values returned by the Neo4j driver into plain JSON that
//! any caller can serialize without knowing about graph types.
//!
//! # Modules
//!
//! - [`value`] - [`GraphValue`], the closed set of values a query can return
//! - [`reverse`] - Neo4j BoltType → GraphValue
//! - [`forward`] - JSON query parameters → Neo4j BoltType
//! - [`normalize`](mod@normalize) - GraphValue → JSON
//!
//! # Example
//!
//! ```
//! use neo4j_types::{normalize, GraphNode, GraphValue};
//! use serde_json::json;
//!
//! let node = GraphNode::new(
//!     5,
//!     vec!["Person".to_string()],
//!     vec![("name".to_string(), GraphValue::from("Ann"))],
//! );
//! assert_eq!(
//!     normalize(GraphValue::Node(node)),
//!     json!({"id": 5, "labels": ["Person"], "properties": {"name": "Ann"}})
//! );
//! ```

pub mod forward;
pub mod normalize;
pub mod reverse;
pub mod value;

pub use forward::{json_to_bolt, parameters_to_bolt, Parameters};
pub use normalize::{normalize, normalize_record};
pub use reverse::convert_bolt_to_graph_value;
pub use value::{
    GraphDuration, GraphNode, GraphPath, GraphPoint, GraphRelationship, GraphValue, TimeWithOffset,
};
