//! The query gateway: run a query, get an envelope back.
//!
//! # Lifecycle
//!
//! - One gateway per process, built once with [`Neo4jGateway::connect`] or
//!   [`Neo4jGateway::from_env`] and passed by reference to whatever needs it.
//! - Every [`QueryGateway::run`] call opens its own session, and releases it
//!   before returning on both the success and the error path.
//! - [`Neo4jGateway::close`] consumes the gateway and releases the connection.
//!
//! # Errors
//!
//! Construction errors are returned. Errors raised while a query runs are never
//! returned; they come back as an error envelope instead.

use neo4j_types::Parameters;
use neo4rs::Graph;

use crate::config::GatewayConfig;
use crate::envelope::{records_to_envelope, tool_error, Envelope};
use crate::error::Result;
use crate::neo4j_client::{new_neo4j_client, Neo4jSessionFactory};
use crate::session::{GraphSession, SessionFactory, SessionOutcome};

/// Runs queries through sessions opened by `F` against one fixed database.
pub struct QueryGateway<F> {
    factory: F,
    database: String,
}

/// The gateway backed by the Neo4j driver.
pub type Neo4jGateway = QueryGateway<Neo4jSessionFactory>;

impl<F: SessionFactory> QueryGateway<F> {
    pub fn new(factory: F, database: impl Into<String>) -> Self {
        Self {
            factory,
            database: database.into(),
        }
    }

    /// Name of the database every session targets.
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Run `query` with `parameters` and wrap the normalized records.
    ///
    /// Never fails: any error is reported as an error envelope. A single
    /// attempt is made.
    pub async fn run(&self, query: &str, parameters: Parameters) -> Envelope {
        tracing::debug!("Running query on database '{}': {}", self.database, query);
        match self.execute_in_session(query, parameters).await {
            Ok(records) => {
                tracing::debug!("Query returned {} records", records.len());
                records_to_envelope(records)
            }
            Err(e) => {
                tracing::warn!("Query failed ({:?}): {}", e.kind(), e);
                tool_error(e.to_string())
            }
        }
    }

    /// Run a query without parameters.
    pub async fn run_query(&self, query: &str) -> Envelope {
        self.run(query, Parameters::new()).await
    }

    async fn execute_in_session(
        &self,
        query: &str,
        parameters: Parameters,
    ) -> Result<Vec<neo4j_types::GraphValue>> {
        let mut session = self.factory.open_session(&self.database).await?;

        match session.execute(query, parameters).await {
            Ok(records) => {
                session.release(SessionOutcome::Commit).await?;
                Ok(records)
            }
            Err(e) => {
                if let Err(release_err) = session.release(SessionOutcome::Rollback).await {
                    tracing::warn!("Failed to release session after query error: {release_err}");
                }
                Err(e)
            }
        }
    }
}

impl Neo4jGateway {
    /// Connect to Neo4j. Fails if the server cannot be reached; not retried.
    pub async fn connect(config: GatewayConfig) -> Result<Self> {
        tracing::debug!("Connecting to Neo4j at: {}", config.uri);
        let graph = new_neo4j_client(&config).await?;
        tracing::info!(
            "Connected to Neo4j at {} (database '{}')",
            config.uri,
            config.database
        );
        Ok(Self::new(Neo4jSessionFactory::new(graph), config.database))
    }

    /// Load [`GatewayConfig`] from the environment and connect.
    pub async fn from_env() -> Result<Self> {
        let config = GatewayConfig::from_env()?;
        Self::connect(config).await
    }

    /// The raw driver handle. Queries run through it bypass normalization and
    /// envelopes.
    pub fn graph(&self) -> &Graph {
        self.factory.graph()
    }

    /// Release the connection handle. Consuming `self` makes a second close
    /// impossible; the pool is torn down when the last handle goes away.
    pub fn close(self) {
        tracing::info!("Closing Neo4j connection to database '{}'", self.database);
    }
}
