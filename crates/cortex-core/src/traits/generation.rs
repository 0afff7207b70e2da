// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Streaming seam to the language-model service.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::CortexError;
use crate::types::GenerationRequest;

/// A text fragment stream as produced by the generation backend.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, CortexError>> + Send>>;

/// Streaming text generation against the external language-model service.
///
/// Backends yield raw text fragments in arrival order; all protocol framing
/// (chunk objects, sentinels) is layered on top by the streaming adapter.
#[async_trait]
pub trait GenerationBackend: Send + Sync + 'static {
    /// Opens a streaming generation call and returns the fragment stream.
    ///
    /// Dropping the stream abandons the upstream response body, which is how
    /// consumer disconnects propagate to the service.
    async fn stream_generate(
        &self,
        request: GenerationRequest,
    ) -> Result<FragmentStream, CortexError>;
}
