// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`EnrichmentEngine`](cortex_core::traits::EnrichmentEngine) implementation
//! backed by the Graphiti-style enrichment service.
//!
//! The engine owns entity resolution, duplicate merging, temporal edge
//! invalidation, and embeddings; Cortex submits episodes here and reads the
//! resulting graph directly from the datastore.

mod client;
mod types;

pub use client::GraphitiClient;
pub use types::{EpisodeRequest, EpisodeResponse};
