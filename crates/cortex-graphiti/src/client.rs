// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the temporal knowledge-graph enrichment service.
//!
//! Episode submission is synchronous from the service's point of view: the
//! response arrives only after entity resolution and edge extraction have
//! finished, which can take minutes for long transcripts. Callers are
//! expected to hold an admission permit and run off the request path; this
//! client just waits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use cortex_config::GraphitiConfig;
use cortex_core::error::CortexError;
use cortex_core::traits::EnrichmentEngine;
use cortex_core::types::{EpisodeInput, EpisodeOutcome};

use crate::types::{EpisodeRequest, EpisodeResponse};

/// Client for the enrichment service's REST API.
pub struct GraphitiClient {
    client: reqwest::Client,
    episodes_url: String,
}

impl GraphitiClient {
    /// Builds a client from configuration.
    pub fn new(config: &GraphitiConfig) -> Result<Self, CortexError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CortexError::engine("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            episodes_url: episodes_url(&config.base_url),
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.episodes_url = episodes_url(base_url);
        self
    }
}

fn episodes_url(base_url: &str) -> String {
    format!("{}/episodes", base_url.trim_end_matches('/'))
}

#[async_trait]
impl EnrichmentEngine for GraphitiClient {
    async fn add_episode(&self, episode: EpisodeInput) -> Result<EpisodeOutcome, CortexError> {
        let body = EpisodeRequest::from(episode);
        debug!(name = %body.name, group_id = %body.group_id, "submitting enrichment episode");

        let response = self
            .client
            .post(&self.episodes_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CortexError::engine("enrichment request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CortexError::Engine {
                message: format!("enrichment service returned {status}: {detail}"),
                source: None,
            });
        }

        let parsed: EpisodeResponse = response
            .json()
            .await
            .map_err(|e| CortexError::engine("malformed enrichment response", e))?;
        debug!(
            episode_uuid = %parsed.episode_uuid,
            nodes = parsed.nodes_extracted,
            edges = parsed.edges_extracted,
            "episode processed"
        );
        Ok(parsed.into())
    }
}
