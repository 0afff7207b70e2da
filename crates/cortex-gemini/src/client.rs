// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for Gemini's streaming generation API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use cortex_config::GeminiConfig;
use cortex_core::error::CortexError;
use cortex_core::traits::{FragmentStream, GenerationBackend};
use cortex_core::types::GenerationRequest;

use crate::sse::parse_fragment_stream;
use crate::types::{Content, GenerateContentRequest};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the generative language API.
#[derive(Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Builds a client from configuration.
    ///
    /// Fails fast when the API key is absent so the gap is reported at
    /// startup rather than on the first chat request.
    pub fn new(config: &GeminiConfig) -> Result<Self, CortexError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| CortexError::Config("gemini.api_key is required".into()))?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key_value = HeaderValue::from_str(&api_key)
            .map_err(|_| CortexError::Config("gemini.api_key contains invalid characters".into()))?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| CortexError::generation("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn stream_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:streamGenerateContent?alt=sse",
            self.base_url
        )
    }
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn stream_generate(
        &self,
        request: GenerationRequest,
    ) -> Result<FragmentStream, CortexError> {
        let url = self.stream_url(&request.model);
        let body = GenerateContentRequest {
            contents: request.turns.into_iter().map(Content::from).collect(),
        };
        debug!(model = %request.model, turns = body.contents.len(), "opening generation stream");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CortexError::generation("generation request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CortexError::Generation {
                message: format!("generation service returned {status}: {detail}"),
                source: None,
            });
        }

        Ok(parse_fragment_stream(response))
    }
}
