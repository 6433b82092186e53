//! Session traits.
//!
//! The gateway talks to the database only through these traits, so the same
//! envelope and lifecycle logic runs against the real driver
//! ([`crate::Neo4jSessionFactory`]) and against in-memory doubles in tests.

use async_trait::async_trait;
use neo4j_types::{GraphValue, Parameters};

use crate::error::Result;

/// How a session ends.
///
/// Sessions that run auto-commit queries have already been committed or
/// discarded by the server and only hand back their connection. Sessions with
/// their own unit of work commit or roll it back here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The query succeeded.
    Commit,
    /// The query failed.
    Rollback,
}

/// Opens one session per query.
///
/// Implementations must allow concurrent `open_session` calls on a shared
/// reference; sessions themselves are never shared.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: GraphSession;

    /// Open a session against `database`.
    async fn open_session(&self, database: &str) -> Result<Self::Session>;
}

/// A scoped execution context owned by a single query call.
#[async_trait]
pub trait GraphSession: Send {
    /// Run `query` and eagerly fetch every row.
    ///
    /// Each returned value is a [`GraphValue::Record`].
    async fn execute(&mut self, query: &str, parameters: Parameters) -> Result<Vec<GraphValue>>;

    /// End the session. Called exactly once per opened session.
    async fn release(self, outcome: SessionOutcome) -> Result<()>;
}
