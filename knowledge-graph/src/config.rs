//! Connection settings for one Neo4j database, read from prefixed env variables.

use serde::{Deserialize, Serialize};

use crate::errors::GraphError;

/// Env prefix of the clinical guideline database.
pub const GUIDELINE_PREFIX: &str = "GUIDELINE";
/// Env prefix of the recipe / nutrition database.
pub const RECIPE_PREFIX: &str = "RECIPE";

const DEFAULT_MAX_CONNECTIONS: usize = 4;
const DEFAULT_FETCH_SIZE: usize = 200;

/// Connection settings for a single database.
#[derive(Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Bolt URI, e.g. `neo4j+s://xxxx.databases.neo4j.io`.
    pub uri: String,
    pub username: String,
    pub password: String,
    /// Database name inside the DBMS (shown in the UI sidebar).
    pub database: String,
    pub max_connections: usize,
    pub fetch_size: usize,
}

// Hand-written so the password never ends up in logs.
impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("fetch_size", &self.fetch_size)
            .finish()
    }
}

impl GraphConfig {
    /// Build configuration from environment variables with the given prefix.
    ///
    /// Environment variables used (for prefix `P`):
    /// - `P_URI`, `P_USERNAME`, `P_PASSWORD`, `P_DATABASE` (required)
    /// - `P_MAX_CONNECTIONS` (default: 4)
    /// - `P_FETCH_SIZE` (default: 200)
    pub fn from_env(prefix: &str) -> Result<Self, GraphError> {
        Self::from_lookup(prefix, |key| std::env::var(key).ok())
    }

    /// Same as [`GraphConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(prefix: &str, lookup: F) -> Result<Self, GraphError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> Result<String, GraphError> {
            let key = format!("{prefix}_{name}");
            match lookup(&key) {
                Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
                _ => Err(GraphError::EnvMissing { key }),
            }
        };
        let optional_usize = |name: &str, default: usize| -> Result<usize, GraphError> {
            let key = format!("{prefix}_{name}");
            match lookup(&key) {
                Some(v) if !v.trim().is_empty() => {
                    v.trim().parse::<usize>().map_err(|_| GraphError::EnvParse { key, value: v })
                }
                _ => Ok(default),
            }
        };

        let cfg = Self {
            uri: required("URI")?,
            username: required("USERNAME")?,
            password: required("PASSWORD")?,
            database: required("DATABASE")?,
            max_connections: optional_usize("MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            fetch_size: optional_usize("FETCH_SIZE", DEFAULT_FETCH_SIZE)?,
        };

        if cfg.max_connections == 0 {
            return Err(GraphError::InvalidConfig(format!(
                "{prefix}_MAX_CONNECTIONS must be > 0"
            )));
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn reads_prefixed_keys_with_defaults() {
        let cfg = GraphConfig::from_lookup(
            RECIPE_PREFIX,
            lookup(&[
                ("RECIPE_URI", "neo4j://localhost:7687"),
                ("RECIPE_USERNAME", "neo4j"),
                ("RECIPE_PASSWORD", "secret"),
                ("RECIPE_DATABASE", "foodgraph"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.database, "foodgraph");
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.fetch_size, DEFAULT_FETCH_SIZE);
        assert!(!format!("{cfg:?}").contains("secret"));
    }

    #[test]
    fn missing_and_malformed_keys_are_reported() {
        let err = GraphConfig::from_lookup(
            GUIDELINE_PREFIX,
            lookup(&[("GUIDELINE_URI", "neo4j://x"), ("GUIDELINE_USERNAME", "  ")]),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::EnvMissing { ref key } if key == "GUIDELINE_USERNAME"));

        let err = GraphConfig::from_lookup(
            GUIDELINE_PREFIX,
            lookup(&[
                ("GUIDELINE_URI", "neo4j://x"),
                ("GUIDELINE_USERNAME", "neo4j"),
                ("GUIDELINE_PASSWORD", "pw"),
                ("GUIDELINE_DATABASE", "disease"),
                ("GUIDELINE_FETCH_SIZE", "lots"),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::EnvParse { .. }));
    }
}
