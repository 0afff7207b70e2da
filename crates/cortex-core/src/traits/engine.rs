// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write seam to the temporal knowledge-graph engine.

use async_trait::async_trait;

use crate::error::CortexError;
use crate::types::{EpisodeInput, EpisodeOutcome};

/// The external engine that owns entity resolution, duplicate merging,
/// temporal edge invalidation, and embedding generation.
///
/// Cortex only ever hands it episodes; everything else happens inside the
/// engine. Calls can take minutes for large transcripts, so callers hold an
/// admission permit and run off the request path.
#[async_trait]
pub trait EnrichmentEngine: Send + Sync + 'static {
    /// Submits one enrichment episode and waits for extraction to finish.
    async fn add_episode(&self, episode: EpisodeInput) -> Result<EpisodeOutcome, CortexError>;
}
