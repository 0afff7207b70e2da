// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream seam traits for the three external systems Cortex orchestrates.
//!
//! Service crates depend only on these traits; concrete HTTP clients live in
//! their own crates and are wired in by the binary. All traits use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod engine;
pub mod generation;
pub mod graph;

// Re-export all traits at the traits module level for convenience.
pub use engine::EnrichmentEngine;
pub use generation::{FragmentStream, GenerationBackend};
pub use graph::GraphStore;
