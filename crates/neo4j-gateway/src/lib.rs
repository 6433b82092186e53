//! Neo4j query gateway for agent frameworks.
//!
//! Runs Cypher queries and returns every outcome as an [`Envelope`]:
//!
//! ```text
//! { "status": "success", "query_result": [ {...}, ... ] }
//! { "status": "error", "error_message": "..." }
//! ```
//!
//! Result values are normalized into plain JSON by `neo4j_types`, so nodes,
//! relationships, paths and temporal values arrive as objects and strings.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> neo4j_gateway::Result<()> {
//! use neo4j_gateway::Neo4jGateway;
//!
//! let gateway = Neo4jGateway::from_env().await?;
//! let envelope = gateway.run_query("RETURN 1 AS x").await;
//! println!("{}", serde_json::to_string(&envelope).unwrap_or_default());
//! gateway.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
mod gateway;
mod neo4j_client;
pub mod session;
pub mod testing;

pub use config::GatewayConfig;
pub use envelope::{
    records_to_envelope, tool_error, tool_success, Envelope, Status, QUERY_RESULT_KEY,
};
pub use error::{ErrorKind, GatewayError, Result};
pub use gateway::{Neo4jGateway, QueryGateway};
pub use neo4j_client::{new_neo4j_client, Neo4jSession, Neo4jSessionFactory};
pub use neo4j_types::Parameters;
pub use session::{GraphSession, SessionFactory, SessionOutcome};
