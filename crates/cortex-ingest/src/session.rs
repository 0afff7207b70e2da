// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Submitted session data.
//!
//! A session is immutable once submitted; it is consumed to build one
//! enrichment episode and never persisted by this layer.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Speaker of one session message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    /// Transcript label (`User:` / `Assistant:`).
    fn label(self) -> &'static str {
        match self {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        }
    }
}

/// One message of a submitted session. `timestamp` is epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: i64,
}

/// Client-reported session bounds, epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub session_started_at: i64,
    pub session_ended_at: i64,
    pub message_count: usize,
}

/// A completed chat session submitted for enrichment.
///
/// `job_id` is a client-supplied idempotency key; resubmitting the same id
/// never schedules new work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSubmission {
    pub job_id: String,
    pub user_id: String,
    pub session_id: String,
    pub messages: Vec<SessionMessage>,
    pub metadata: SessionMetadata,
}

impl SessionSubmission {
    /// Total characters across all message contents.
    pub fn total_chars(&self) -> usize {
        self.messages
            .iter()
            .map(|m| m.content.chars().count())
            .sum()
    }

    /// Renders the session as one transcript body, one `Role: content` line
    /// per message, joined by blank lines.
    pub fn transcript(&self) -> String {
        let lines: Vec<String> = self
            .messages
            .iter()
            .map(|m| format!("{}: {}", m.role.label(), m.content))
            .collect();
        lines.join("\n\n")
    }

    /// Session end time as the enrichment reference time. Out-of-range
    /// client timestamps fall back to the current time.
    pub fn reference_time(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(self.metadata.session_ended_at)
            .single()
            .unwrap_or_else(Utc::now)
    }
}
