//! neo4j-adk Library
//!
//! Runs Cypher queries against Neo4j and returns agent-friendly envelopes.
//!
//! # Crates
//!
//! - `neo4j_types` - normalization of driver values into plain JSON
//! - `neo4j_gateway` - connection, per-query sessions and envelopes
//!
//! # CLI Usage
//!
//! ```bash
//! # Connection settings come from the environment or flags
//! export NEO4J_URI=bolt://localhost:7687 NEO4J_PASSWORD=password
//!
//! neo4j-adk query "MATCH (p:Person) RETURN p LIMIT 5"
//! neo4j-adk query "MATCH (p:Person {name: \$name}) RETURN p" --param name='"Ann"'
//! ```

use clap::Parser;

pub use neo4j_gateway as gateway;
pub use neo4j_types as types;

pub use neo4j_gateway::{
    tool_error, tool_success, Envelope, GatewayConfig, GatewayError, Neo4jGateway, Parameters,
    QueryGateway, Status, QUERY_RESULT_KEY,
};
pub use neo4j_types::{normalize, GraphValue};

#[derive(Parser, Clone, Debug)]
pub struct Neo4jOpts {
    /// Neo4j connection URI
    #[arg(long, env = "NEO4J_URI")]
    pub uri: Option<String>,

    /// Neo4j username (default: neo4j)
    #[arg(long, env = "NEO4J_USERNAME")]
    pub username: Option<String>,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Target database (default: the username, else neo4j)
    #[arg(long, env = "NEO4J_DATABASE")]
    pub database: Option<String>,
}

impl TryFrom<Neo4jOpts> for GatewayConfig {
    type Error = GatewayError;

    fn try_from(opts: Neo4jOpts) -> Result<Self, Self::Error> {
        GatewayConfig::resolve(opts.uri, opts.username, opts.password, opts.database)
    }
}

/// Parse a `name=value` query parameter.
///
/// The value is read as JSON when it parses, otherwise kept as a plain
/// string, so `limit=10` passes an integer and `name=Ann` a string.
pub fn parse_param(s: &str) -> anyhow::Result<(String, serde_json::Value)> {
    let Some((name, raw)) = s.split_once('=') else {
        anyhow::bail!("Invalid parameter format: '{s}'. Expected format: 'name=value'");
    };
    if name.is_empty() {
        anyhow::bail!("Invalid parameter format: '{s}'. Parameter name is empty");
    }
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((name.to_string(), value))
}

/// Collect `name=value` arguments into query parameters. Later names win.
pub fn parse_params(entries: &[String]) -> anyhow::Result<Parameters> {
    let mut parameters = Parameters::new();
    for entry in entries {
        let (name, value) = parse_param(entry)?;
        parameters.insert(name, value);
    }
    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_param_json_values() {
        assert_eq!(parse_param("limit=10").unwrap(), ("limit".to_string(), json!(10)));
        assert_eq!(
            parse_param("names=[\"Ann\",\"Bob\"]").unwrap(),
            ("names".to_string(), json!(["Ann", "Bob"]))
        );
        assert_eq!(parse_param("flag=true").unwrap().1, json!(true));
    }

    #[test]
    fn test_parse_param_plain_string() {
        assert_eq!(parse_param("name=Ann").unwrap(), ("name".to_string(), json!("Ann")));
        assert_eq!(parse_param("expr=a=b").unwrap().1, json!("a=b"));
        assert_eq!(parse_param("empty=").unwrap().1, json!(""));
    }

    #[test]
    fn test_parse_param_invalid() {
        assert!(parse_param("no-equals-sign").is_err());
        assert!(parse_param("=10").is_err());
    }

    #[test]
    fn test_parse_params_later_wins() {
        let parameters =
            parse_params(&["a=1".to_string(), "b=x".to_string(), "a=2".to_string()]).unwrap();
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters["a"], json!(2));
        assert_eq!(parameters["b"], json!("x"));
    }

    #[test]
    fn test_opts_into_config() {
        let opts = Neo4jOpts {
            uri: Some("bolt://localhost:7687".to_string()),
            username: Some("companies".to_string()),
            password: Some("secret".to_string()),
            database: None,
        };
        let config = GatewayConfig::try_from(opts).unwrap();
        assert_eq!(config.database, "companies");
    }

    #[test]
    fn test_opts_without_uri_fail() {
        let opts = Neo4jOpts {
            uri: None,
            username: None,
            password: Some("secret".to_string()),
            database: None,
        };
        assert!(matches!(
            GatewayConfig::try_from(opts),
            Err(GatewayError::MissingSetting("NEO4J_URI"))
        ));
    }
}
