// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cortex service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Cortex configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; secrets (API keys, store password) stay `None` until supplied.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CortexConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Graph datastore (Neo4j HTTP API) settings.
    #[serde(default)]
    pub neo4j: Neo4jConfig,

    /// Knowledge-graph engine settings.
    #[serde(default)]
    pub graphiti: GraphitiConfig,

    /// Language-model service settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Session ingestion thresholds.
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Compilation synthesis settings.
    #[serde(default)]
    pub hydration: HydrationConfig,

    /// Upstream concurrency limits.
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind the server to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret required in the `x-api-secret` header on all endpoints
    /// except `/health`. `None` is rejected at serve time.
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_secret: None,
            log_level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Graph datastore configuration.
///
/// Cortex reads Neo4j over its HTTP transaction API rather than Bolt, so the
/// URL points at the HTTP port.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Neo4jConfig {
    /// Base URL of the Neo4j HTTP API.
    #[serde(default = "default_neo4j_http_url")]
    pub http_url: String,

    /// Basic-auth user.
    #[serde(default = "default_neo4j_user")]
    pub user: String,

    /// Basic-auth password. `None` is rejected at serve time.
    #[serde(default)]
    pub password: Option<String>,

    /// Database name in the transaction endpoint path.
    #[serde(default = "default_neo4j_database")]
    pub database: String,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            http_url: default_neo4j_http_url(),
            user: default_neo4j_user(),
            password: None,
            database: default_neo4j_database(),
        }
    }
}

fn default_neo4j_http_url() -> String {
    "http://localhost:7474".to_string()
}

fn default_neo4j_user() -> String {
    "neo4j".to_string()
}

fn default_neo4j_database() -> String {
    "neo4j".to_string()
}

/// Knowledge-graph engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GraphitiConfig {
    /// Base URL of the enrichment service.
    #[serde(default = "default_graphiti_base_url")]
    pub base_url: String,

    /// Model the engine runs extraction with; recorded in job metadata.
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds. Episodes can take minutes for large
    /// transcripts.
    #[serde(default = "default_upstream_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GraphitiConfig {
    fn default() -> Self {
        Self {
            base_url: default_graphiti_base_url(),
            model: default_model(),
            request_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn default_graphiti_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// Language-model service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` is rejected at serve time.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the generative language API.
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    /// Model used when a chat request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Request timeout in seconds.
    #[serde(default = "default_upstream_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_gemini_base_url(),
            default_model: default_model(),
            request_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    300
}

/// Session ingestion thresholds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IngestConfig {
    /// Minimum number of messages for a session to be worth enriching.
    #[serde(default = "default_min_messages")]
    pub min_messages: usize,

    /// Minimum total characters across all message contents.
    #[serde(default = "default_min_total_chars")]
    pub min_total_chars: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            min_messages: default_min_messages(),
            min_total_chars: default_min_total_chars(),
        }
    }
}

fn default_min_messages() -> usize {
    1
}

fn default_min_total_chars() -> usize {
    5
}

/// Compilation synthesis configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HydrationConfig {
    /// Minimum connectivity degree for an entity to appear in the
    /// definitions section. Filters long-tail noise.
    #[serde(default = "default_min_degree")]
    pub min_degree: i64,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            min_degree: default_min_degree(),
        }
    }
}

fn default_min_degree() -> i64 {
    2
}

/// Upstream concurrency limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsConfig {
    /// Maximum concurrent calls into the enrichment engine and the
    /// language-model service combined. Keeps Cortex under the model
    /// provider's rate limits.
    #[serde(default = "default_upstream_concurrency")]
    pub upstream_concurrency: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            upstream_concurrency: default_upstream_concurrency(),
        }
    }
}

fn default_upstream_concurrency() -> usize {
    3
}
