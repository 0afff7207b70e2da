// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compilation synthesis: ranked, temporally-filtered graph rows rendered
//! into a bounded text block for prompt assembly.

mod compilation;
mod synthesizer;

pub use compilation::KnowledgeCompilation;
pub use synthesizer::Synthesizer;
