// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the `streamGenerateContent` API.

use serde::{Deserialize, Serialize};

use cortex_core::types::{GenerationTurn, TurnRole};

/// One part of a content turn. Only text parts are used here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

/// One conversation turn in the upstream's two-party vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: TurnRole,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl From<GenerationTurn> for Content {
    fn from(turn: GenerationTurn) -> Self {
        Self {
            role: turn.role,
            parts: vec![Part { text: turn.text }],
        }
    }
}

/// Body posted to `models/{model}:streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// Content carried by a streamed candidate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One candidate in a streamed chunk. Cortex only ever reads the first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error body the API embeds in a data frame when generation aborts.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// One SSE data frame: either a content chunk or an embedded error.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiError>,
}

impl StreamChunk {
    /// Concatenated text of the first candidate's parts; empty when the
    /// frame carries no text (e.g. a bare finish frame).
    pub fn text(&self) -> String {
        let mut out = String::new();
        if let Some(candidate) = self.candidates.first() {
            if let Some(content) = &candidate.content {
                for part in &content.parts {
                    out.push_str(&part.text);
                }
            }
        }
        out
    }
}
