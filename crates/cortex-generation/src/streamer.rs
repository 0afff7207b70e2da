// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translates backend fragment streams into OpenAI-style chunk sequences.
//!
//! Every exchange emits, in order: one role chunk, zero or more content
//! chunks, one finish chunk, and the `[DONE]` sentinel. A mid-stream failure
//! replaces the finish chunk with an in-band error payload, but the sentinel
//! is still emitted so clients always observe a terminal marker.
//!
//! The exchange runs on a detached task that holds an admission-gate permit
//! for as long as it consumes the upstream stream. The task writes into a
//! bounded channel; when the consumer drops the receiving stream, the next
//! send fails and the task stops pulling from the backend.

use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use futures::channel::mpsc;
use futures::{SinkExt, Stream, StreamExt};
use tracing::{debug, error};
use uuid::Uuid;

use cortex_core::error::CortexError;
use cortex_core::gate::AdmissionGate;
use cortex_core::traits::GenerationBackend;
use cortex_core::types::{GenerationRequest, GenerationTurn, TurnRole};

use crate::types::{
    ChatCompletionChunk, ChatCompletionRequest, ChatMessage, ChatRole, ChunkChoice, ChunkDelta,
    CHUNK_OBJECT,
};

/// Terminal sentinel payload closing every stream.
pub const DONE_PAYLOAD: &str = "[DONE]";

const CHANNEL_CAPACITY: usize = 16;

/// A sequence of SSE data payloads, one per event.
pub type EventStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Streams chat completions by framing backend fragments as protocol chunks.
pub struct ChatStreamer {
    backend: Arc<dyn GenerationBackend>,
    gate: AdmissionGate,
    default_model: String,
}

impl ChatStreamer {
    pub fn new(
        backend: Arc<dyn GenerationBackend>,
        gate: AdmissionGate,
        default_model: String,
    ) -> Self {
        Self {
            backend,
            gate,
            default_model,
        }
    }

    /// Starts an exchange and returns the event payload stream.
    ///
    /// Requests that name no model use the configured default. Returns
    /// immediately; gate admission and the backend call happen on the
    /// detached task, so a saturated gate delays chunks, not the response
    /// itself.
    pub fn stream(&self, mut request: ChatCompletionRequest) -> EventStream {
        if request.model.is_empty() {
            request.model = self.default_model.clone();
        }
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let backend = Arc::clone(&self.backend);
        let gate = self.gate.clone();
        tokio::spawn(run_exchange(backend, gate, request, tx));
        Box::pin(rx)
    }
}

async fn run_exchange(
    backend: Arc<dyn GenerationBackend>,
    gate: AdmissionGate,
    request: ChatCompletionRequest,
    mut tx: mpsc::Sender<String>,
) {
    let framer = ChunkFramer::new(&request.model);
    let generation_request = GenerationRequest {
        model: request.model.clone(),
        turns: to_generation_turns(&request.messages),
    };

    // The role chunk leads the stream unconditionally, even when the
    // backend call later fails.
    if !send(&mut tx, chunk_payload(&framer.role_chunk())).await {
        return;
    }

    let _permit = match gate.admit().await {
        Ok(permit) => permit,
        Err(err) => {
            fail(&mut tx, &err).await;
            return;
        }
    };

    let mut fragments = match backend.stream_generate(generation_request).await {
        Ok(fragments) => fragments,
        Err(err) => {
            fail(&mut tx, &err).await;
            return;
        }
    };

    while let Some(fragment) = fragments.next().await {
        match fragment {
            Ok(text) => {
                if !send(&mut tx, chunk_payload(&framer.content_chunk(&text))).await {
                    debug!("chat completion consumer went away, dropping upstream stream");
                    return;
                }
            }
            Err(err) => {
                fail(&mut tx, &err).await;
                return;
            }
        }
    }

    if send(&mut tx, chunk_payload(&framer.finish_chunk())).await {
        send(&mut tx, DONE_PAYLOAD.to_string()).await;
    }
}

/// Emits the in-band error payload followed by the sentinel.
async fn fail(tx: &mut mpsc::Sender<String>, err: &CortexError) {
    error!(error = %err, "chat completion stream failed");
    let payload = serde_json::json!({"error": err.to_string()}).to_string();
    if send(tx, payload).await {
        send(tx, DONE_PAYLOAD.to_string()).await;
    }
}

async fn send(tx: &mut mpsc::Sender<String>, payload: String) -> bool {
    tx.send(payload).await.is_ok()
}

fn chunk_payload(chunk: &ChatCompletionChunk) -> String {
    serde_json::to_string(chunk).unwrap_or_else(|err| {
        serde_json::json!({"error": format!("chunk serialization failed: {err}")}).to_string()
    })
}

/// Stamps chunks with the shared response identity.
struct ChunkFramer {
    id: String,
    created: i64,
    model: String,
}

impl ChunkFramer {
    fn new(model: &str) -> Self {
        let mut suffix = Uuid::new_v4().simple().to_string();
        suffix.truncate(12);
        Self {
            id: format!("chatcmpl-{suffix}"),
            created: Utc::now().timestamp(),
            model: model.to_string(),
        }
    }

    fn chunk(&self, delta: ChunkDelta, finish_reason: Option<&str>) -> ChatCompletionChunk {
        ChatCompletionChunk {
            id: self.id.clone(),
            object: CHUNK_OBJECT.to_string(),
            created: self.created,
            model: self.model.clone(),
            choices: vec![ChunkChoice {
                index: 0,
                delta,
                finish_reason: finish_reason.map(str::to_string),
            }],
        }
    }

    fn role_chunk(&self) -> ChatCompletionChunk {
        self.chunk(
            ChunkDelta {
                role: Some("assistant".to_string()),
                content: None,
            },
            None,
        )
    }

    fn content_chunk(&self, text: &str) -> ChatCompletionChunk {
        self.chunk(
            ChunkDelta {
                role: None,
                content: Some(text.to_string()),
            },
            None,
        )
    }

    fn finish_chunk(&self) -> ChatCompletionChunk {
        self.chunk(ChunkDelta::default(), Some("stop"))
    }
}

/// Folds OpenAI-style messages into the backend's two-party turn list.
///
/// The generation service has no independent system role, so the first
/// system message's content is prepended to the opening user turn separated
/// by a blank line, and system messages never become turns of their own.
fn to_generation_turns(messages: &[ChatMessage]) -> Vec<GenerationTurn> {
    let mut system_prompt = messages
        .iter()
        .find(|message| message.role == ChatRole::System)
        .map(|message| message.content.flatten());

    let mut turns = Vec::with_capacity(messages.len());
    for message in messages {
        if message.role == ChatRole::System {
            continue;
        }
        let mut text = message.content.flatten();
        if message.role == ChatRole::User && turns.is_empty() {
            if let Some(prompt) = system_prompt.take() {
                text = format!("{prompt}\n\n{text}");
            }
        }
        let role = match message.role {
            ChatRole::User => TurnRole::User,
            _ => TurnRole::Model,
        };
        turns.push(GenerationTurn { role, text });
    }
    turns
}
