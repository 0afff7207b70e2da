// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Projects graph store records into a force-graph node/link structure.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cortex_core::error::CortexError;
use cortex_core::traits::GraphStore;

/// A visualization node; `val` is the connectivity degree and drives the
/// rendered node size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub val: i64,
    pub summary: String,
}

/// A visualization link between two node ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    pub label: String,
    pub fact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphProjection {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

/// Read-only projection of a group's current graph state.
pub struct GraphView {
    store: Arc<dyn GraphStore>,
}

impl GraphView {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Fetches nodes and currently-valid links for one group.
    ///
    /// Rows missing their identifying fields are dropped rather than
    /// surfaced as errors; a missing relationship label falls back to the
    /// store's generic `RELATES_TO`.
    pub async fn view(&self, group_id: &str) -> Result<GraphProjection, CortexError> {
        let now = Utc::now();

        let nodes: Vec<GraphNode> = self
            .store
            .entity_nodes(group_id)
            .await?
            .into_iter()
            .filter(|node| !node.id.is_empty() && !node.name.is_empty())
            .map(|node| GraphNode {
                id: node.id,
                name: node.name,
                val: node.degree,
                summary: node.summary,
            })
            .collect();

        let links: Vec<GraphLink> = self
            .store
            .relationship_edges(group_id)
            .await?
            .into_iter()
            .filter(|edge| edge.is_current(now))
            .filter(|edge| !edge.source_id.is_empty() && !edge.target_id.is_empty())
            .map(|edge| GraphLink {
                source: edge.source_id,
                target: edge.target_id,
                label: edge.label.unwrap_or_else(|| "RELATES_TO".to_string()),
                fact: edge.fact,
            })
            .collect();

        debug!(
            group_id,
            nodes = nodes.len(),
            links = links.len(),
            "graph projection assembled"
        );
        Ok(GraphProjection { nodes, links })
    }
}
