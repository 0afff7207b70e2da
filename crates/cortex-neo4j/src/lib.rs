// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Neo4j-backed [`GraphStore`](cortex_core::traits::GraphStore) implementation.
//!
//! Cortex reads the knowledge graph directly over the Neo4j HTTP transaction
//! API rather than through the enrichment engine, which keeps the hot
//! synthesis path off the engine's request queue. All writes to the graph
//! remain the engine's business.

mod client;
mod types;

pub use client::Neo4jStore;
