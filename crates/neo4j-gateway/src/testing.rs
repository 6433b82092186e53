//! In-memory session doubles.
//!
//! [`InMemorySessionFactory`] answers queries from a closure and counts how
//! sessions are opened and released, so gateway behavior can be checked
//! without a running database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use neo4j_types::{GraphValue, Parameters};

use crate::error::{GatewayError, Result};
use crate::session::{GraphSession, SessionFactory, SessionOutcome};

type Responder = dyn Fn(&str, &Parameters) -> std::result::Result<Vec<GraphValue>, String>
    + Send
    + Sync;

/// Session lifecycle counters shared between a factory and its sessions.
#[derive(Debug, Default)]
pub struct SessionCounters {
    opened: AtomicUsize,
    committed: AtomicUsize,
    rolled_back: AtomicUsize,
    databases: Mutex<Vec<String>>,
}

impl SessionCounters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::SeqCst)
    }

    pub fn rolled_back(&self) -> usize {
        self.rolled_back.load(Ordering::SeqCst)
    }

    /// Sessions released, whichever way they ended.
    pub fn released(&self) -> usize {
        self.committed() + self.rolled_back()
    }

    /// Database names sessions were opened against, in order.
    pub fn databases(&self) -> Vec<String> {
        match self.databases.lock() {
            Ok(databases) => databases.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn record_open(&self, database: &str) {
        self.opened.fetch_add(1, Ordering::SeqCst);
        match self.databases.lock() {
            Ok(mut databases) => databases.push(database.to_string()),
            Err(poisoned) => poisoned.into_inner().push(database.to_string()),
        }
    }
}

/// A [`SessionFactory`] whose sessions answer from a closure.
#[derive(Clone)]
pub struct InMemorySessionFactory {
    responder: Arc<Responder>,
    open_error: Option<String>,
    release_error: Option<String>,
    counters: Arc<SessionCounters>,
}

impl InMemorySessionFactory {
    /// `responder` receives the query text and parameters and returns the
    /// records, or an error message.
    pub fn new<R>(responder: R) -> Self
    where
        R: Fn(&str, &Parameters) -> std::result::Result<Vec<GraphValue>, String>
            + Send
            + Sync
            + 'static,
    {
        Self {
            responder: Arc::new(responder),
            open_error: None,
            release_error: None,
            counters: Arc::new(SessionCounters::default()),
        }
    }

    /// Make every `open_session` call fail with `message`.
    pub fn failing_open(mut self, message: impl Into<String>) -> Self {
        self.open_error = Some(message.into());
        self
    }

    /// Make every commit and rollback fail with `message`. The release is
    /// still counted.
    pub fn failing_release(mut self, message: impl Into<String>) -> Self {
        self.release_error = Some(message.into());
        self
    }

    pub fn counters(&self) -> Arc<SessionCounters> {
        Arc::clone(&self.counters)
    }
}

#[async_trait]
impl SessionFactory for InMemorySessionFactory {
    type Session = InMemorySession;

    async fn open_session(&self, database: &str) -> Result<InMemorySession> {
        if let Some(message) = &self.open_error {
            return Err(GatewayError::Session(message.clone()));
        }
        self.counters.record_open(database);
        Ok(InMemorySession {
            responder: Arc::clone(&self.responder),
            release_error: self.release_error.clone(),
            counters: Arc::clone(&self.counters),
        })
    }
}

/// Session handed out by [`InMemorySessionFactory`].
pub struct InMemorySession {
    responder: Arc<Responder>,
    release_error: Option<String>,
    counters: Arc<SessionCounters>,
}

#[async_trait]
impl GraphSession for InMemorySession {
    async fn execute(&mut self, query: &str, parameters: Parameters) -> Result<Vec<GraphValue>> {
        (self.responder)(query, &parameters).map_err(GatewayError::Query)
    }

    async fn release(self, outcome: SessionOutcome) -> Result<()> {
        match outcome {
            SessionOutcome::Commit => self.counters.committed.fetch_add(1, Ordering::SeqCst),
            SessionOutcome::Rollback => self.counters.rolled_back.fetch_add(1, Ordering::SeqCst),
        };
        match self.release_error {
            Some(message) => Err(GatewayError::Session(message)),
            None => Ok(()),
        }
    }
}
