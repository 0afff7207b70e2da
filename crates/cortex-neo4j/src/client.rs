// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graph store client speaking the Neo4j HTTP transaction API.
//!
//! Every read is a single auto-commit transaction against
//! `/db/{database}/tx/commit`. The store holds state written by the
//! knowledge-graph engine; this client never writes.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use cortex_config::Neo4jConfig;
use cortex_core::error::CortexError;
use cortex_core::traits::GraphStore;
use cortex_core::types::{EntityDefinition, EntityNode, RelationshipEdge, RelationshipFact};

use crate::types::{
    cell_datetime, cell_i64, cell_str, CypherStatement, RowEntry, TxRequest, TxResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Ranked entity definitions for compilation synthesis. Degree counts all
/// touching relationships regardless of direction; entities without a
/// summary carry no signal and are excluded at the source.
const ENTITY_DEFINITIONS_QUERY: &str = "\
MATCH (n:Entity)-[r:RELATES_TO]-(other:Entity)
WHERE n <> other
  AND n.group_id = $group_id
  AND n.summary IS NOT NULL AND n.summary <> \"\"
WITH n, count(r) AS degree
WHERE degree >= $min_degree
RETURN n.name AS name, n.summary AS summary, degree
ORDER BY degree DESC";

/// Currently-valid relationships for compilation synthesis. The temporal
/// predicate is re-applied in process after decoding.
const CURRENT_RELATIONSHIPS_QUERY: &str = "\
MATCH (source:Entity)-[r:RELATES_TO]->(target:Entity)
WHERE r.group_id = $group_id
  AND (r.invalid_at IS NULL OR r.invalid_at > datetime())
  AND NOT 'Episode' IN labels(source)
  AND NOT 'Episode' IN labels(target)
RETURN source.name AS source_name, r.name AS relation_name, target.name AS target_name,
       r.fact AS fact, r.valid_at AS valid_at, r.invalid_at AS invalid_at
ORDER BY r.valid_at DESC";

/// All summarized entities for graph visualization, unranked by any floor.
const ENTITY_NODES_QUERY: &str = "\
MATCH (n:Entity)-[r:RELATES_TO]-(other:Entity)
WHERE n <> other
  AND n.group_id = $group_id
  AND n.summary IS NOT NULL AND n.summary <> \"\"
WITH n, count(r) AS degree
RETURN n.uuid AS id, n.name AS name, degree AS val, n.summary AS summary
ORDER BY degree DESC";

/// Currently-valid edges for graph visualization, keyed by store UUIDs.
const RELATIONSHIP_EDGES_QUERY: &str = "\
MATCH (source:Entity)-[r:RELATES_TO]->(target:Entity)
WHERE r.group_id = $group_id
  AND (r.invalid_at IS NULL OR r.invalid_at > datetime())
  AND NOT 'Episode' IN labels(source)
  AND NOT 'Episode' IN labels(target)
RETURN source.uuid AS source, target.uuid AS target, r.name AS label, r.fact AS fact,
       r.invalid_at AS invalid_at";

/// Read-only Neo4j client implementing [`GraphStore`].
#[derive(Debug)]
pub struct Neo4jStore {
    client: reqwest::Client,
    tx_url: String,
    user: String,
    password: String,
}

impl Neo4jStore {
    /// Builds a store client from configuration.
    ///
    /// Fails fast when the basic-auth password is absent so the gap is
    /// reported at startup rather than on the first query.
    pub fn new(config: &Neo4jConfig) -> Result<Self, CortexError> {
        let password = config
            .password
            .clone()
            .ok_or_else(|| CortexError::Config("neo4j.password is required".into()))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CortexError::graph("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            tx_url: tx_commit_url(&config.http_url, &config.database),
            user: config.user.clone(),
            password,
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str, database: &str) -> Self {
        self.tx_url = tx_commit_url(base_url, database);
        self
    }

    /// Runs one Cypher statement and returns its rows.
    async fn run(
        &self,
        statement: &str,
        parameters: serde_json::Value,
    ) -> Result<Vec<RowEntry>, CortexError> {
        let body = TxRequest {
            statements: vec![CypherStatement {
                statement: statement.to_string(),
                parameters,
            }],
        };

        let response = self
            .client
            .post(&self.tx_url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&body)
            .send()
            .await
            .map_err(|e| CortexError::graph("graph store request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CortexError::Graph {
                message: format!("graph store returned {status}: {detail}"),
                source: None,
            });
        }

        let parsed: TxResponse = response
            .json()
            .await
            .map_err(|e| CortexError::graph("malformed graph store response", e))?;

        if let Some(err) = parsed.errors.first() {
            return Err(CortexError::Graph {
                message: format!("graph store query failed: {}: {}", err.code, err.message),
                source: None,
            });
        }

        let rows = parsed
            .results
            .into_iter()
            .next()
            .map(|result| result.data)
            .unwrap_or_default();
        debug!(rows = rows.len(), "graph store query returned");
        Ok(rows)
    }
}

fn tx_commit_url(base_url: &str, database: &str) -> String {
    format!(
        "{}/db/{database}/tx/commit",
        base_url.trim_end_matches('/')
    )
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn entity_definitions(
        &self,
        group_id: &str,
        min_degree: i64,
    ) -> Result<Vec<EntityDefinition>, CortexError> {
        let rows = self
            .run(
                ENTITY_DEFINITIONS_QUERY,
                json!({ "group_id": group_id, "min_degree": min_degree }),
            )
            .await?;
        Ok(rows
            .iter()
            .map(|entry| EntityDefinition {
                name: cell_str(&entry.row, 0).unwrap_or_default(),
                summary: cell_str(&entry.row, 1).unwrap_or_default(),
                degree: cell_i64(&entry.row, 2).unwrap_or(0),
            })
            .collect())
    }

    async fn current_relationships(
        &self,
        group_id: &str,
    ) -> Result<Vec<RelationshipFact>, CortexError> {
        let rows = self
            .run(CURRENT_RELATIONSHIPS_QUERY, json!({ "group_id": group_id }))
            .await?;
        Ok(rows
            .iter()
            .map(|entry| RelationshipFact {
                source_name: cell_str(&entry.row, 0).unwrap_or_default(),
                relation_name: cell_str(&entry.row, 1),
                target_name: cell_str(&entry.row, 2).unwrap_or_default(),
                fact: cell_str(&entry.row, 3),
                valid_at: cell_datetime(&entry.row, 4),
                invalid_at: cell_datetime(&entry.row, 5),
            })
            .collect())
    }

    async fn entity_nodes(&self, group_id: &str) -> Result<Vec<EntityNode>, CortexError> {
        let rows = self
            .run(ENTITY_NODES_QUERY, json!({ "group_id": group_id }))
            .await?;
        Ok(rows
            .iter()
            .map(|entry| EntityNode {
                id: cell_str(&entry.row, 0).unwrap_or_default(),
                name: cell_str(&entry.row, 1).unwrap_or_default(),
                degree: cell_i64(&entry.row, 2).unwrap_or(1),
                summary: cell_str(&entry.row, 3).unwrap_or_default(),
            })
            .collect())
    }

    async fn relationship_edges(
        &self,
        group_id: &str,
    ) -> Result<Vec<RelationshipEdge>, CortexError> {
        let rows = self
            .run(RELATIONSHIP_EDGES_QUERY, json!({ "group_id": group_id }))
            .await?;
        Ok(rows
            .iter()
            .map(|entry| RelationshipEdge {
                source_id: cell_str(&entry.row, 0).unwrap_or_default(),
                target_id: cell_str(&entry.row, 1).unwrap_or_default(),
                label: cell_str(&entry.row, 2),
                fact: cell_str(&entry.row, 3),
                invalid_at: cell_datetime(&entry.row, 4),
            })
            .collect())
    }
}
