//! Neo4j access for the two knowledge bases used by the advisor.
//!
//! Public API:
//! - [`GraphClient`]: pooled connection to one database (guideline or recipe).
//! - [`guideline::fetch_recommendations`]: guideline evidence for recommendation ids.
//! - [`recipe::find_recipes`]: bottom-up recipe search under nutrient limits.
//! - [`vector_index`]: similarity search and embedding maintenance on the guideline graph.

pub mod config;
pub mod errors;
pub mod guideline;
pub mod recipe;
pub mod vector_index;

use neo4rs::{ConfigBuilder, Graph, Query, query};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

pub use config::GraphConfig;
pub use errors::GraphError;
pub use guideline::{GuidelineRow, RecommendationDoc};
pub use recipe::{NutrientLimits, RecipeRow};

/// Pooled client for one Neo4j database.
///
/// Cheap to clone; clones share the same connection pool.
#[derive(Clone)]
pub struct GraphClient {
    graph: Graph,
    database: String,
}

impl GraphClient {
    /// Creates the pool and runs a `RETURN 1` ping.
    ///
    /// The driver pool is lazy, so the ping forces a real Bolt handshake and an
    /// unreachable server fails here instead of on the first user request.
    ///
    /// # Errors
    /// Returns [`GraphError::Connect`] if the pool cannot be built or the ping fails.
    pub async fn connect(cfg: &GraphConfig) -> Result<Self, GraphError> {
        let connect_err = |source: neo4rs::Error| GraphError::Connect {
            database: cfg.database.clone(),
            source,
        };

        let neo4j_config = ConfigBuilder::default()
            .uri(&cfg.uri)
            .user(&cfg.username)
            .password(&cfg.password)
            .db(cfg.database.as_str())
            .max_connections(cfg.max_connections)
            .fetch_size(cfg.fetch_size)
            .build()
            .map_err(connect_err)?;

        let graph = Graph::connect(neo4j_config).await.map_err(connect_err)?;
        graph.run(query("RETURN 1")).await.map_err(connect_err)?;

        info!(
            uri = %cfg.uri,
            database = %cfg.database,
            max_connections = cfg.max_connections,
            "neo4j connection ready"
        );

        Ok(Self {
            graph,
            database: cfg.database.clone(),
        })
    }

    /// Name of the database this client talks to.
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Runs a statement that returns no rows.
    pub async fn run(&self, q: Query, context: &'static str) -> Result<(), GraphError> {
        self.graph
            .run(q)
            .await
            .map_err(|source| GraphError::Query { context, source })
    }

    /// Runs a query and maps every row onto `T` by column name.
    ///
    /// # Errors
    /// - [`GraphError::Query`] on server/transport failures
    /// - [`GraphError::Row`] when a row does not match `T`
    pub async fn fetch_all<T>(&self, q: Query, context: &'static str) -> Result<Vec<T>, GraphError>
    where
        T: DeserializeOwned,
    {
        let mut stream = self
            .graph
            .execute(q)
            .await
            .map_err(|source| GraphError::Query { context, source })?;

        let mut out = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|source| GraphError::Query { context, source })?
        {
            out.push(
                row.to::<T>()
                    .map_err(|source| GraphError::Row { context, source })?,
            );
        }

        debug!(
            database = %self.database,
            context,
            rows = out.len(),
            "query completed"
        );
        Ok(out)
    }
}
