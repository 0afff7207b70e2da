// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Forwards free-text memory corrections to the knowledge-graph engine.
//!
//! Edge invalidation and re-creation happen entirely inside the engine;
//! this layer only shapes the correction into an episode and translates
//! errors.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use cortex_core::error::CortexError;
use cortex_core::gate::AdmissionGate;
use cortex_core::traits::EnrichmentEngine;
use cortex_core::types::{EpisodeInput, EpisodeKind};

const CORRECTION_EPISODE_NAME: &str = "user_memory_correction";
const CORRECTION_SOURCE_DESCRIPTION: &str =
    "User-initiated memory correction via Memory Explorer";

pub struct CorrectionDispatcher {
    engine: Arc<dyn EnrichmentEngine>,
    gate: AdmissionGate,
}

impl CorrectionDispatcher {
    pub fn new(engine: Arc<dyn EnrichmentEngine>, gate: AdmissionGate) -> Self {
        Self { engine, gate }
    }

    /// Submits a correction episode for the group and waits for the engine
    /// to accept it.
    pub async fn correct(&self, group_id: &str, text: &str) -> Result<(), CortexError> {
        info!(group_id, "applying memory correction");

        let episode = EpisodeInput {
            name: CORRECTION_EPISODE_NAME.to_string(),
            body: text.to_string(),
            kind: EpisodeKind::Text,
            source_description: CORRECTION_SOURCE_DESCRIPTION.to_string(),
            group_id: group_id.to_string(),
            reference_time: Utc::now(),
        };

        let _permit = self.gate.admit().await?;
        self.engine.add_episode(episode).await?;

        info!(group_id, "memory correction applied");
        Ok(())
    }
}
