// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock graph store with pre-loaded rows for deterministic testing.

use std::sync::Mutex;

use async_trait::async_trait;

use cortex_core::error::CortexError;
use cortex_core::traits::GraphStore;
use cortex_core::types::{EntityDefinition, EntityNode, RelationshipEdge, RelationshipFact};

/// A mock [`GraphStore`] that serves pre-loaded rows.
///
/// Definitions are filtered by the requested degree floor the way the real
/// store's query does, so degree-threshold behavior is observable in tests.
/// Rows are returned only for the configured group id; any other group reads
/// empty, mirroring a store scoped per user.
#[derive(Default)]
pub struct MockGraphStore {
    group_id: String,
    definitions: Vec<EntityDefinition>,
    relationships: Vec<RelationshipFact>,
    nodes: Vec<EntityNode>,
    edges: Vec<RelationshipEdge>,
    fail_with: Mutex<Option<String>>,
}

impl MockGraphStore {
    /// Creates an empty store scoped to `group_id`.
    pub fn for_group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            ..Self::default()
        }
    }

    pub fn with_definitions(mut self, definitions: Vec<EntityDefinition>) -> Self {
        self.definitions = definitions;
        self
    }

    pub fn with_relationships(mut self, relationships: Vec<RelationshipFact>) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn with_nodes(mut self, nodes: Vec<EntityNode>) -> Self {
        self.nodes = nodes;
        self
    }

    pub fn with_edges(mut self, edges: Vec<RelationshipEdge>) -> Self {
        self.edges = edges;
        self
    }

    /// Makes every subsequent read fail with a graph store error.
    pub fn fail_with(self, message: impl Into<String>) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.into());
        self
    }

    fn check_failure(&self) -> Result<(), CortexError> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(CortexError::Graph {
                message: message.clone(),
                source: None,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn entity_definitions(
        &self,
        group_id: &str,
        min_degree: i64,
    ) -> Result<Vec<EntityDefinition>, CortexError> {
        self.check_failure()?;
        if group_id != self.group_id {
            return Ok(Vec::new());
        }
        Ok(self
            .definitions
            .iter()
            .filter(|d| d.degree >= min_degree)
            .cloned()
            .collect())
    }

    async fn current_relationships(
        &self,
        group_id: &str,
    ) -> Result<Vec<RelationshipFact>, CortexError> {
        self.check_failure()?;
        if group_id != self.group_id {
            return Ok(Vec::new());
        }
        Ok(self.relationships.clone())
    }

    async fn entity_nodes(&self, group_id: &str) -> Result<Vec<EntityNode>, CortexError> {
        self.check_failure()?;
        if group_id != self.group_id {
            return Ok(Vec::new());
        }
        Ok(self.nodes.clone())
    }

    async fn relationship_edges(
        &self,
        group_id: &str,
    ) -> Result<Vec<RelationshipEdge>, CortexError> {
        self.check_failure()?;
        if group_id != self.group_id {
            return Ok(Vec::new());
        }
        Ok(self.edges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(name: &str, degree: i64) -> EntityDefinition {
        EntityDefinition {
            name: name.to_string(),
            summary: format!("summary of {name}"),
            degree,
        }
    }

    #[tokio::test]
    async fn definitions_respect_degree_floor() {
        let store = MockGraphStore::for_group("user-1")
            .with_definitions(vec![definition("A", 5), definition("B", 1)]);

        let defs = store.entity_definitions("user-1", 2).await.unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "A");
    }

    #[tokio::test]
    async fn other_groups_read_empty() {
        let store =
            MockGraphStore::for_group("user-1").with_definitions(vec![definition("A", 5)]);
        assert!(store
            .entity_definitions("user-2", 0)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn failure_mode_maps_to_graph_error() {
        let store = MockGraphStore::for_group("user-1").fail_with("connection refused");
        let err = store.entity_nodes("user-1").await.unwrap_err();
        assert_eq!(err.code(), "GRAPH_UNAVAILABLE");
    }
}
