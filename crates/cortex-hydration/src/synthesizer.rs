// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds a user's knowledge compilation from the graph store.
//!
//! Reads go straight to the datastore rather than through the enrichment
//! engine, which keeps this path fast and off the engine's request queue.

use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use cortex_config::HydrationConfig;
use cortex_core::error::CortexError;
use cortex_core::traits::GraphStore;

use crate::compilation::KnowledgeCompilation;

/// Compilation synthesizer over a [`GraphStore`].
pub struct Synthesizer {
    store: Arc<dyn GraphStore>,
    min_degree: i64,
}

impl Synthesizer {
    pub fn new(store: Arc<dyn GraphStore>, config: &HydrationConfig) -> Self {
        Self {
            store,
            min_degree: config.min_degree,
        }
    }

    /// Synthesizes the compilation text for one user.
    ///
    /// Returns an empty string when the graph holds nothing presentable for
    /// the user; callers treat that as "no knowledge yet", not an error.
    pub async fn synthesize(&self, group_id: &str) -> Result<String, CortexError> {
        let definitions = self
            .store
            .entity_definitions(group_id, self.min_degree)
            .await?;
        let relationships = self.store.current_relationships(group_id).await?;

        let compilation = KnowledgeCompilation::build(&definitions, &relationships, Utc::now());
        debug!(
            group_id,
            definitions = compilation.definition_count(),
            relations = compilation.relation_count(),
            "synthesized knowledge compilation"
        );
        Ok(compilation.render())
    }
}
