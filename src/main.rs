//! Command-line interface for neo4j-adk
//!
//! # Usage Examples
//!
//! ```bash
//! # Run a query, settings from NEO4J_URI / NEO4J_USERNAME / NEO4J_PASSWORD / NEO4J_DATABASE
//! neo4j-adk query "MATCH (n) RETURN count(n) AS nodes"
//!
//! # Explicit connection flags and parameters
//! neo4j-adk query "MATCH (p:Person) WHERE p.age > \$age RETURN p" \
//!   --uri bolt://localhost:7687 --password password \
//!   --param age=30 --pretty
//! ```
//!
//! The envelope is printed as JSON on stdout. The exit status is 0 for a
//! success envelope and 1 otherwise.

use anyhow::Context;
use clap::{Parser, Subcommand};
use neo4j_adk::{parse_params, GatewayConfig, Neo4jGateway, Neo4jOpts};

#[derive(Parser)]
#[command(name = "neo4j-adk")]
#[command(about = "Run Neo4j queries and print agent-friendly JSON envelopes")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Cypher query and print its envelope
    Query {
        /// Cypher query text
        cypher: String,

        /// Query parameter as name=value; the value is parsed as JSON when possible
        #[arg(long = "param", value_name = "NAME=VALUE")]
        params: Vec<String>,

        /// Pretty-print the envelope
        #[arg(long)]
        pretty: bool,

        /// Neo4j connection options
        #[command(flatten)]
        neo4j: Neo4jOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if !run(Cli::parse()).await? {
        std::process::exit(1);
    }
    Ok(())
}

/// Returns whether the query succeeded.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    match cli.command {
        Commands::Query {
            cypher,
            params,
            pretty,
            neo4j,
        } => {
            let parameters = parse_params(&params)?;
            tracing::debug!("Parsed {} query parameters", parameters.len());
            let config = GatewayConfig::try_from(neo4j)
                .context("Failed to read Neo4j connection settings")?;
            let gateway = Neo4jGateway::connect(config)
                .await
                .context("Failed to connect to Neo4j")?;

            let envelope = gateway.run(&cypher, parameters).await;
            gateway.close();

            let output = if pretty {
                serde_json::to_string_pretty(&envelope)?
            } else {
                serde_json::to_string(&envelope)?
            };
            println!("{output}");

            Ok(envelope.is_success())
        }
    }
}
