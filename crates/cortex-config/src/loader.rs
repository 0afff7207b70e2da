// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cortex.toml` > `~/.config/cortex/cortex.toml` > `/etc/cortex/cortex.toml`
//! with environment variable overrides via `CORTEX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CortexConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cortex/cortex.toml` (system-wide)
/// 3. `~/.config/cortex/cortex.toml` (user XDG config)
/// 4. `./cortex.toml` (local directory)
/// 5. `CORTEX_*` environment variables
pub fn load_config() -> Result<CortexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CortexConfig::default()))
        .merge(Toml::file("/etc/cortex/cortex.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cortex/cortex.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cortex.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<CortexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CortexConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CortexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CortexConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// CRITICAL: Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CORTEX_NEO4J_HTTP_URL` must
/// map to `neo4j.http_url`, not `neo4j.http.url`.
fn env_provider() -> Env {
    Env::prefixed("CORTEX_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CORTEX_GEMINI_API_KEY -> "gemini_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("neo4j_", "neo4j.", 1)
            .replacen("graphiti_", "graphiti.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("ingest_", "ingest.", 1)
            .replacen("hydration_", "hydration.", 1)
            .replacen("limits_", "limits.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_any_source() {
        let config = load_config_from_str("").expect("defaults should load");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.neo4j.user, "neo4j");
        assert_eq!(config.hydration.min_degree, 2);
        assert_eq!(config.limits.upstream_concurrency, 3);
    }

    #[test]
    fn toml_overrides_defaults() {
        let toml = r#"
            [server]
            port = 9000

            [ingest]
            min_total_chars = 50
        "#;
        let config = load_config_from_str(toml).expect("should load");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.ingest.min_total_chars, 50);
        // Untouched sections keep defaults.
        assert_eq!(config.ingest.min_messages, 1);
        assert_eq!(config.gemini.default_model, "gemini-3-flash-preview");
    }
}
