// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cortex knowledge-compilation service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Cortex workspace. The three upstream
//! clients (graph store, enrichment engine, generation backend) implement
//! traits defined here.

pub mod error;
pub mod gate;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CortexError;
pub use gate::AdmissionGate;
pub use types::{
    EntityDefinition, EntityNode, EpisodeInput, EpisodeKind, EpisodeOutcome, GenerationRequest,
    GenerationTurn, RelationshipEdge, RelationshipFact, TurnRole,
};

// Re-export all upstream traits at crate root.
pub use traits::generation::FragmentStream;
pub use traits::{EnrichmentEngine, GenerationBackend, GraphStore};
