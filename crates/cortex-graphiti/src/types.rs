// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the enrichment service's episode endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cortex_core::types::{EpisodeInput, EpisodeKind, EpisodeOutcome};

/// Body posted to `/episodes`.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeRequest {
    pub name: String,
    pub episode_body: String,
    pub source: EpisodeKind,
    pub source_description: String,
    pub group_id: String,
    pub reference_time: DateTime<Utc>,
}

impl From<EpisodeInput> for EpisodeRequest {
    fn from(input: EpisodeInput) -> Self {
        Self {
            name: input.name,
            episode_body: input.body,
            source: input.kind,
            source_description: input.source_description,
            group_id: input.group_id,
            reference_time: input.reference_time,
        }
    }
}

/// Extraction report returned once the engine finishes the episode.
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeResponse {
    pub episode_uuid: String,
    #[serde(default)]
    pub nodes_extracted: u64,
    #[serde(default)]
    pub edges_extracted: u64,
}

impl From<EpisodeResponse> for EpisodeOutcome {
    fn from(response: EpisodeResponse) -> Self {
        Self {
            episode_uuid: response.episode_uuid,
            nodes_extracted: response.nodes_extracted,
            edges_extracted: response.edges_extracted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn episode_request_serializes_source_kind_lowercase() {
        let input = EpisodeInput {
            name: "session_s1".into(),
            body: "User: hi".into(),
            kind: EpisodeKind::Message,
            source_description: "Chat conversation from Synapse AI Chat application".into(),
            group_id: "user-1".into(),
            reference_time: Utc::now(),
        };
        let body = serde_json::to_value(EpisodeRequest::from(input)).unwrap();
        assert_eq!(body["source"], "message");
        assert_eq!(body["episode_body"], "User: hi");
        assert_eq!(body["group_id"], "user-1");
    }

    #[test]
    fn counts_default_to_zero_when_omitted() {
        let response: EpisodeResponse =
            serde_json::from_str(r#"{"episode_uuid": "ep-1"}"#).unwrap();
        let outcome = EpisodeOutcome::from(response);
        assert_eq!(outcome.episode_uuid, "ep-1");
        assert_eq!(outcome.nodes_extracted, 0);
        assert_eq!(outcome.edges_extracted, 0);
    }
}
