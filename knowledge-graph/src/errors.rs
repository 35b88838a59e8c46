//! Unified error type for the knowledge-graph crate.

use thiserror::Error;

/// Errors produced while configuring or querying a Neo4j database.
#[derive(Debug, Error)]
pub enum GraphError {
    // ── Configuration / environment ──────────────────────────────────────────
    /// Required environment variable is missing or empty.
    #[error("missing env variable: {key}")]
    EnvMissing { key: String },

    /// Failed to parse an environment variable into the expected type.
    #[error("failed to parse env variable: {key} = '{value}'")]
    EnvParse { key: String, value: String },

    /// Configuration value is not acceptable (e.g. unsafe index name).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Driver / transport ──────────────────────────────────────────────────
    /// Connection pool could not be created or the server did not answer the ping.
    #[error("neo4j connection to '{database}' failed: {source}")]
    Connect {
        database: String,
        #[source]
        source: neo4rs::Error,
    },

    /// A query failed on the server or in transit.
    #[error("neo4j query failed ({context}): {source}")]
    Query {
        context: &'static str,
        #[source]
        source: neo4rs::Error,
    },

    /// A row could not be mapped into the expected shape.
    #[error("unexpected row shape ({context}): {source}")]
    Row {
        context: &'static str,
        #[source]
        source: neo4rs::DeError,
    },
}
