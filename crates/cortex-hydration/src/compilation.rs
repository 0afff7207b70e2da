// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic rendering of graph rows into the knowledge compilation text.
//!
//! The output format is a stable contract with downstream prompt assembly:
//! two headed sections plus a stats footer. Rendering is a pure function of
//! the input rows, so equal store state always produces byte-identical text.

use chrono::{DateTime, SecondsFormat, Utc};

use cortex_core::types::{EntityDefinition, RelationshipFact};

const DEFINITIONS_HEADER: &str = "#### 1. CONCEPTUAL DEFINITIONS & IDENTITY ####\n\
# (Understanding what these concepts mean specifically for this user)\n";

const RELATIONSHIPS_HEADER: &str = "#### 2. RELATIONAL DYNAMICS & CAUSALITY ####\n\
# (How these concepts interact and evolve over time)\n";

/// Rendered lines of one user's knowledge compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeCompilation {
    definition_lines: Vec<String>,
    relation_lines: Vec<String>,
}

impl KnowledgeCompilation {
    /// Builds the compilation from store rows.
    ///
    /// Relationships whose validity window has closed by `now` are dropped
    /// here even though the store query already filters them, so currency
    /// never depends on the store evaluating time the same way this process
    /// does. Rows with blank endpoint names carry no usable signal and are
    /// skipped.
    pub fn build(
        definitions: &[EntityDefinition],
        relationships: &[RelationshipFact],
        now: DateTime<Utc>,
    ) -> Self {
        let definition_lines = definitions.iter().filter_map(definition_line).collect();
        let relation_lines = relationships
            .iter()
            .filter(|r| r.is_current(now))
            .filter_map(relationship_line)
            .collect();
        Self {
            definition_lines,
            relation_lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.definition_lines.is_empty() && self.relation_lines.is_empty()
    }

    pub fn definition_count(&self) -> usize {
        self.definition_lines.len()
    }

    pub fn relation_count(&self) -> usize {
        self.relation_lines.len()
    }

    /// Renders the full compilation text, or an empty string when there is
    /// nothing to say about the user.
    pub fn render(&self) -> String {
        let mut sections = Vec::new();

        if !self.definition_lines.is_empty() {
            sections.push(format!(
                "{DEFINITIONS_HEADER}{}",
                self.definition_lines.join("\n")
            ));
        }

        if !self.relation_lines.is_empty() {
            sections.push(format!(
                "{RELATIONSHIPS_HEADER}{}",
                self.relation_lines.join("\n")
            ));
        }

        if sections.is_empty() {
            return String::new();
        }

        let content = sections.join("\n\n");

        let total_chars: usize = self
            .definition_lines
            .iter()
            .chain(self.relation_lines.iter())
            .map(|line| line.chars().count())
            .sum();
        // Rough 4-chars-per-token heuristic; good enough for a footer.
        let est_tokens = total_chars / 4;

        format!(
            "{content}\n\n### STATS ###\n# Definitions: {} | Relations: {} | Est. Tokens: ~{est_tokens}",
            self.definition_lines.len(),
            self.relation_lines.len()
        )
    }
}

fn definition_line(definition: &EntityDefinition) -> Option<String> {
    if definition.name.is_empty() || definition.summary.is_empty() {
        return None;
    }
    Some(format!("- **{}**: {}", definition.name, definition.summary))
}

fn relationship_line(relationship: &RelationshipFact) -> Option<String> {
    if relationship.source_name.is_empty() || relationship.target_name.is_empty() {
        return None;
    }

    let verb = relation_verb(relationship.relation_name.as_deref());
    let mut line = format!(
        "- {} {verb} {}",
        relationship.source_name, relationship.target_name
    );

    if let Some(fact) = relationship.fact.as_deref() {
        if !fact.is_empty() {
            line.push_str(&format!(": \"{fact}\""));
        }
    }

    let mut temporal_parts = Vec::new();
    if let Some(valid_at) = relationship.valid_at {
        temporal_parts.push(format!("valid_at: {}", format_timestamp(valid_at)));
    }
    if let Some(invalid_at) = relationship.invalid_at {
        temporal_parts.push(format!("invalid_at: {}", format_timestamp(invalid_at)));
    }
    if !temporal_parts.is_empty() {
        line.push_str(&format!(" [{}]", temporal_parts.join(", ")));
    }

    Some(line)
}

/// Converts a stored relation name to a readable verb
/// (`WORKS_WITH` -> `works with`).
fn relation_verb(name: Option<&str>) -> String {
    match name {
        None | Some("") => "relates to".to_string(),
        Some(name) => name.replace('_', " ").to_lowercase(),
    }
}

fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
