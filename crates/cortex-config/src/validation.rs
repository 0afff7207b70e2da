// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, URL shapes, and positive limits.

use crate::diagnostic::ConfigError;
use crate::model::CortexConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CortexConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate server.host is not empty and looks like an IP or hostname
    let host = config.server.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("server.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate upstream base URLs
    for (key, url) in [
        ("neo4j.http_url", &config.neo4j.http_url),
        ("graphiti.base_url", &config.graphiti.base_url),
        ("gemini.base_url", &config.gemini.base_url),
    ] {
        let url = url.trim();
        if url.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation {
                message: format!("{key} must start with http:// or https://, got `{url}`"),
            });
        }
    }

    // Validate timeouts are positive
    for (key, secs) in [
        (
            "graphiti.request_timeout_secs",
            config.graphiti.request_timeout_secs,
        ),
        (
            "gemini.request_timeout_secs",
            config.gemini.request_timeout_secs,
        ),
    ] {
        if secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be at least 1"),
            });
        }
    }

    // Validate ingestion thresholds
    if config.ingest.min_messages == 0 {
        errors.push(ConfigError::Validation {
            message: "ingest.min_messages must be at least 1".to_string(),
        });
    }

    // Validate hydration degree threshold
    if config.hydration.min_degree < 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "hydration.min_degree must be non-negative, got {}",
                config.hydration.min_degree
            ),
        });
    }

    // Validate the admission gate has at least one permit
    if config.limits.upstream_concurrency == 0 {
        errors.push(ConfigError::Validation {
            message: "limits.upstream_concurrency must be at least 1".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
