//! Error types for the query gateway.
//!
//! Construction errors are returned to the caller. Every error raised while a
//! query runs is turned into an error envelope by the gateway instead.

use thiserror::Error;

/// Errors raised by the gateway and its sessions.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required setting is absent from the configuration.
    #[error("Missing required setting {0}")]
    MissingSetting(&'static str),

    /// The driver rejected the connection settings.
    #[error("Invalid Neo4j configuration: {0}")]
    InvalidConfig(String),

    /// The database could not be reached.
    #[error("{0}")]
    Connection(String),

    /// A session could not be opened or released.
    #[error("{0}")]
    Session(String),

    /// The database rejected or failed the query.
    #[error("{0}")]
    Query(String),

    /// Result rows could not be fetched or decoded.
    #[error("{0}")]
    Materialize(String),
}

/// Coarse classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connection,
    Session,
    Query,
    Materialize,
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::MissingSetting(_) | GatewayError::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            GatewayError::Connection(_) => ErrorKind::Connection,
            GatewayError::Session(_) => ErrorKind::Session,
            GatewayError::Query(_) => ErrorKind::Query,
            GatewayError::Materialize(_) => ErrorKind::Materialize,
        }
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_messages_are_kept_verbatim() {
        let err = GatewayError::Query("Invalid input 'INVALID'".to_string());
        assert_eq!(err.to_string(), "Invalid input 'INVALID'");
        assert_eq!(err.kind(), ErrorKind::Query);
    }

    #[test]
    fn test_configuration_kinds() {
        assert_eq!(
            GatewayError::MissingSetting("NEO4J_URI").kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            GatewayError::MissingSetting("NEO4J_URI").to_string(),
            "Missing required setting NEO4J_URI"
        );
        assert_eq!(
            GatewayError::InvalidConfig("bad uri".to_string()).kind(),
            ErrorKind::Configuration
        );
    }
}
