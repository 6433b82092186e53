//! Neo4j client utilities
//!
//! This module provides utilities for creating and managing Neo4j Graph
//! connections and the auto-commit sessions the gateway runs queries in.

use std::collections::BTreeMap;

use async_trait::async_trait;
use neo4j_types::{parameters_to_bolt, GraphValue, Parameters};
use neo4rs::{BoltType, ConfigBuilder, DetachedRowStream, Graph, Query};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::session::{GraphSession, SessionFactory, SessionOutcome};

/// Create a new Neo4j Graph connection and check that the server answers.
///
/// The driver connects lazily, so a `RETURN 1` round trip forces the handshake
/// and surfaces bad credentials or unreachable hosts at construction time.
pub async fn new_neo4j_client(config: &GatewayConfig) -> Result<Graph> {
    let neo4j_config = ConfigBuilder::default()
        .uri(&config.uri)
        .user(config.username.clone())
        .password(config.password.clone())
        .db(config.database.clone())
        .build()
        .map_err(|e| GatewayError::InvalidConfig(e.to_string()))?;

    let graph = Graph::connect(neo4j_config).map_err(|e| GatewayError::Connection(e.to_string()))?;

    graph
        .run(Query::new("RETURN 1".to_string()))
        .await
        .map_err(|e| GatewayError::Connection(e.to_string()))?;

    Ok(graph)
}

/// Opens auto-commit sessions on a shared [`Graph`].
#[derive(Clone)]
pub struct Neo4jSessionFactory {
    graph: Graph,
}

impl Neo4jSessionFactory {
    pub fn new(graph: Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl SessionFactory for Neo4jSessionFactory {
    type Session = Neo4jSession;

    async fn open_session(&self, database: &str) -> Result<Neo4jSession> {
        Ok(Neo4jSession {
            graph: self.graph.clone(),
            database: database.to_string(),
            stream: None,
        })
    }
}

/// One auto-commit query against a fixed database.
///
/// The pooled connection is checked out when the query starts and held by the
/// row stream until the session is released. Statements that manage their own
/// transactions, such as `CALL { ... } IN TRANSACTIONS`, run here unchanged.
pub struct Neo4jSession {
    graph: Graph,
    database: String,
    stream: Option<DetachedRowStream>,
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn execute(&mut self, query: &str, parameters: Parameters) -> Result<Vec<GraphValue>> {
        let query = parameters_to_bolt(parameters)
            .into_iter()
            .fold(Query::new(query.to_string()), |q, (name, value)| {
                q.param(&name, value)
            });

        let stream = self
            .graph
            .execute_on(self.database.as_str(), query)
            .await
            .map_err(|e| GatewayError::Query(e.to_string()))?;
        let stream = self.stream.insert(stream);

        let mut records = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| GatewayError::Query(e.to_string()))?
        {
            let columns: BTreeMap<String, BoltType> = row
                .to()
                .map_err(|e| GatewayError::Materialize(e.to_string()))?;
            records.push(GraphValue::record_from_bolt(columns));
        }

        tracing::debug!("Fetched {} rows from Neo4j", records.len());
        Ok(records)
    }

    async fn release(self, outcome: SessionOutcome) -> Result<()> {
        // Auto-commit: the server already committed or discarded the work.
        // Dropping the stream returns its connection to the pool.
        tracing::trace!(
            "Releasing session on database '{}' ({outcome:?})",
            self.database
        );
        drop(self.stream);
        Ok(())
    }
}
