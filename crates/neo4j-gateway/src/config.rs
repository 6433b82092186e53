//! Connection settings for the gateway.

use crate::error::{GatewayError, Result};

pub const URI_VAR: &str = "NEO4J_URI";
pub const USERNAME_VAR: &str = "NEO4J_USERNAME";
pub const PASSWORD_VAR: &str = "NEO4J_PASSWORD";
pub const DATABASE_VAR: &str = "NEO4J_DATABASE";

/// Username, and database name, used when none is configured.
pub const DEFAULT_USERNAME: &str = "neo4j";

/// Resolved connection settings (library type without clap).
#[derive(Clone)]
pub struct GatewayConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

impl GatewayConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::resolve(
            lookup(URI_VAR),
            lookup(USERNAME_VAR),
            lookup(PASSWORD_VAR),
            lookup(DATABASE_VAR),
        )
    }

    /// Apply defaults to optional settings.
    ///
    /// Empty strings count as unset. The username defaults to
    /// [`DEFAULT_USERNAME`]; the database defaults to the configured username,
    /// then to [`DEFAULT_USERNAME`].
    pub fn resolve(
        uri: Option<String>,
        username: Option<String>,
        password: Option<String>,
        database: Option<String>,
    ) -> Result<Self> {
        let uri = non_empty(uri).ok_or(GatewayError::MissingSetting(URI_VAR))?;
        let password = non_empty(password).ok_or(GatewayError::MissingSetting(PASSWORD_VAR))?;
        let username = non_empty(username);
        let database = non_empty(database)
            .or_else(|| username.clone())
            .unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let username = username.unwrap_or_else(|| DEFAULT_USERNAME.to_string());

        Ok(Self {
            uri,
            username,
            password,
            database,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
