// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`GenerationBackend`](cortex_core::traits::GenerationBackend) implementation
//! backed by Gemini's `streamGenerateContent` SSE API.

mod client;
mod sse;
mod types;

pub use client::GeminiClient;
pub use sse::parse_fragment_stream;
pub use types::{Content, GenerateContentRequest, Part, StreamChunk};
