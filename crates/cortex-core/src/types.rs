// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Cortex workspace.
//!
//! Graph projections here are read-only views of records owned by the
//! external knowledge-graph engine; Cortex never mutates them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// An entity definition row from the graph store's ranked read path.
///
/// Rows arrive ordered by `degree` descending; the synthesizer preserves
/// that order when rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Display name of the resolved entity.
    pub name: String,
    /// Engine-produced summary of what this entity means for the user.
    pub summary: String,
    /// Number of relationships touching this entity.
    pub degree: i64,
}

/// A relationship row with its fact and validity window, keyed by entity names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipFact {
    pub source_name: String,
    /// Raw relation name as stored (e.g. `WORKS_WITH`); absent when the
    /// engine recorded no explicit name.
    pub relation_name: Option<String>,
    pub target_name: String,
    pub fact: Option<String>,
    pub valid_at: Option<DateTime<Utc>>,
    pub invalid_at: Option<DateTime<Utc>>,
}

impl RelationshipFact {
    /// A relationship is current iff its invalidity time is absent or in the
    /// future relative to `now`.
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        match self.invalid_at {
            None => true,
            Some(invalid_at) => invalid_at > now,
        }
    }
}

/// An entity node projected for graph visualization, keyed by store UUID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityNode {
    pub id: String,
    pub name: String,
    /// Connectivity degree; drives visual node sizing.
    pub degree: i64,
    pub summary: String,
}

/// A relationship edge projected for graph visualization, keyed by store UUIDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub source_id: String,
    pub target_id: String,
    pub label: Option<String>,
    pub fact: Option<String>,
    pub invalid_at: Option<DateTime<Utc>>,
}

impl RelationshipEdge {
    /// Same temporal rule as [`RelationshipFact::is_current`].
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        match self.invalid_at {
            None => true,
            Some(invalid_at) => invalid_at > now,
        }
    }
}

/// Source kind of an enrichment episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EpisodeKind {
    /// A conversational transcript.
    Message,
    /// Free-form text (used for memory corrections).
    Text,
}

/// One unit of enrichment input submitted to the knowledge-graph engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeInput {
    pub name: String,
    pub body: String,
    pub kind: EpisodeKind,
    pub source_description: String,
    /// Scoping key; equal to the user identifier throughout Cortex.
    pub group_id: String,
    pub reference_time: DateTime<Utc>,
}

/// What the engine reports back after processing an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    pub episode_uuid: String,
    pub nodes_extracted: u64,
    pub edges_extracted: u64,
}

/// Role vocabulary of the external generation service (two-party; no
/// independent system role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

/// One turn of a generation conversation, already folded down to the
/// two-party vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationTurn {
    pub role: TurnRole,
    pub text: String,
}

/// A streaming generation request against the language-model service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub turns: Vec<GenerationTurn>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn relationship_without_invalid_at_is_current() {
        let fact = RelationshipFact {
            source_name: "Ana".into(),
            relation_name: Some("WORKS_WITH".into()),
            target_name: "Luis".into(),
            fact: None,
            valid_at: None,
            invalid_at: None,
        };
        assert!(fact.is_current(Utc::now()));
    }

    #[test]
    fn relationship_with_past_invalid_at_is_not_current() {
        let now = Utc::now();
        let fact = RelationshipFact {
            source_name: "Ana".into(),
            relation_name: None,
            target_name: "Luis".into(),
            fact: None,
            valid_at: Some(now - TimeDelta::days(30)),
            invalid_at: Some(now - TimeDelta::days(1)),
        };
        assert!(!fact.is_current(now));
    }

    #[test]
    fn relationship_with_future_invalid_at_is_current() {
        let now = Utc::now();
        let edge = RelationshipEdge {
            source_id: "a".into(),
            target_id: "b".into(),
            label: Some("RELATES_TO".into()),
            fact: None,
            invalid_at: Some(now + TimeDelta::days(1)),
        };
        assert!(edge.is_current(now));
    }

    #[test]
    fn episode_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EpisodeKind::Message).unwrap(),
            "\"message\""
        );
        assert_eq!(serde_json::to_string(&EpisodeKind::Text).unwrap(), "\"text\"");
        assert_eq!(EpisodeKind::Message.to_string(), "message");
    }

    #[test]
    fn turn_role_round_trips() {
        use std::str::FromStr;

        for role in [TurnRole::User, TurnRole::Model] {
            let s = role.to_string();
            assert_eq!(TurnRole::from_str(&s).unwrap(), role);
        }
    }
}
