// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cortex knowledge-compilation service.

use thiserror::Error;

/// The primary error type used across all Cortex upstream traits and core operations.
#[derive(Debug, Error)]
pub enum CortexError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Graph store errors (HTTP transport failure, Cypher rejection, malformed rows).
    #[error("graph store error: {message}")]
    Graph {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Knowledge-graph engine errors (episode submission failure, bad response).
    #[error("enrichment engine error: {message}")]
    Engine {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Language-model service errors (request failure, mid-stream abort).
    #[error("generation error: {message}")]
    Generation {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Unknown or already-consumed job identifier.
    #[error("job not found: {job_id}")]
    JobNotFound { job_id: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CortexError {
    /// Stable error code carried on wire responses and failed job entries.
    ///
    /// Clients key retry/reporting behavior off these strings, so they must
    /// not change across releases.
    pub fn code(&self) -> &'static str {
        match self {
            CortexError::Config(_) => "CONFIG_ERROR",
            CortexError::Graph { .. } => "GRAPH_UNAVAILABLE",
            CortexError::Engine { .. } => "GRAPH_PROCESSING_ERROR",
            CortexError::Generation { .. } => "GENERATION_ERROR",
            CortexError::JobNotFound { .. } => "NOT_FOUND",
            CortexError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Shorthand for a graph store error wrapping an underlying cause.
    pub fn graph(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CortexError::Graph {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for an enrichment engine error wrapping an underlying cause.
    pub fn engine(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CortexError::Engine {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a generation error wrapping an underlying cause.
    pub fn generation(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        CortexError::Generation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(CortexError::Config("x".into()).code(), "CONFIG_ERROR");
        assert_eq!(
            CortexError::Graph {
                message: "x".into(),
                source: None
            }
            .code(),
            "GRAPH_UNAVAILABLE"
        );
        assert_eq!(
            CortexError::Engine {
                message: "x".into(),
                source: None
            }
            .code(),
            "GRAPH_PROCESSING_ERROR"
        );
        assert_eq!(
            CortexError::Generation {
                message: "x".into(),
                source: None
            }
            .code(),
            "GENERATION_ERROR"
        );
        assert_eq!(
            CortexError::JobNotFound {
                job_id: "j1".into()
            }
            .code(),
            "NOT_FOUND"
        );
        assert_eq!(CortexError::Internal("x".into()).code(), "INTERNAL_ERROR");
    }

    #[test]
    fn display_includes_message() {
        let err = CortexError::Engine {
            message: "episode rejected".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "enrichment engine error: episode rejected");
    }

    #[test]
    fn shorthand_constructors_capture_source() {
        let err = CortexError::graph("tx failed", std::io::Error::other("refused"));
        match err {
            CortexError::Graph { message, source } => {
                assert_eq!(message, "tx failed");
                assert!(source.is_some());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
