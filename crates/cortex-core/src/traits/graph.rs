// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only seam to the graph datastore.

use async_trait::async_trait;

use crate::error::CortexError;
use crate::types::{EntityDefinition, EntityNode, RelationshipEdge, RelationshipFact};

/// Direct read access to the graph datastore, bypassing the knowledge-graph
/// engine's own read path.
///
/// All queries are scoped by `group_id` (the user identifier). The store only
/// ever sees state the engine previously wrote; reads occur after the writing
/// job reached a terminal state, so eventual consistency relative to the
/// engine is acceptable.
#[async_trait]
pub trait GraphStore: Send + Sync + 'static {
    /// Entities with connectivity degree >= `min_degree` and a non-empty
    /// summary, ordered by degree descending.
    async fn entity_definitions(
        &self,
        group_id: &str,
        min_degree: i64,
    ) -> Result<Vec<EntityDefinition>, CortexError>;

    /// Currently-valid directed relationships among the group's entities,
    /// ordered by validity time descending.
    async fn current_relationships(
        &self,
        group_id: &str,
    ) -> Result<Vec<RelationshipFact>, CortexError>;

    /// All entity nodes for visualization, excluding episodic bookkeeping
    /// records.
    async fn entity_nodes(&self, group_id: &str) -> Result<Vec<EntityNode>, CortexError>;

    /// Currently-valid relationship edges for visualization, keyed by store
    /// UUIDs.
    async fn relationship_edges(
        &self,
        group_id: &str,
    ) -> Result<Vec<RelationshipEdge>, CortexError>;
}
