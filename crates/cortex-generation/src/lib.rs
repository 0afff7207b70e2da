// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI-compatible streaming chat completions over the generation backend.
//!
//! Accepts `/v1/chat/completions`-shaped requests, folds the message list
//! into the backend's two-party turn vocabulary, and frames the resulting
//! fragment stream as `chat.completion.chunk` events followed by a terminal
//! `[DONE]` sentinel.

pub mod streamer;
pub mod types;

pub use streamer::{ChatStreamer, EventStream, DONE_PAYLOAD};
pub use types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatMessage, ChatRole, ChunkChoice, ChunkDelta,
    ContentPart, ImageUrl, MessageContent,
};
