// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared test doubles for the Cortex workspace.
//!
//! Mocks implement the upstream traits in `cortex-core` so service crates can
//! be tested without Neo4j, the enrichment service, or Gemini running.

mod mock_backend;
mod mock_engine;
mod mock_store;

pub use mock_backend::MockGenerationBackend;
pub use mock_engine::MockEnrichmentEngine;
pub use mock_store::MockGraphStore;
