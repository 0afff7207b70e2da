// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic streaming tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use cortex_core::error::CortexError;
use cortex_core::traits::{FragmentStream, GenerationBackend};
use cortex_core::types::GenerationRequest;

/// A mock [`GenerationBackend`] that replays scripted fragments.
///
/// `Err` entries become generation errors at that position in the stream,
/// which exercises mid-stream failure handling. The last request is
/// recorded so role folding and model selection are assertable.
pub struct MockGenerationBackend {
    fragments: Vec<Result<String, String>>,
    last_request: Arc<Mutex<Option<GenerationRequest>>>,
    calls: AtomicUsize,
    fail_on_connect: Option<String>,
}

impl MockGenerationBackend {
    /// A backend that streams the given fragments and finishes cleanly.
    pub fn with_fragments(fragments: Vec<&str>) -> Self {
        Self {
            fragments: fragments.into_iter().map(|f| Ok(f.to_string())).collect(),
            last_request: Arc::new(Mutex::new(None)),
            calls: AtomicUsize::new(0),
            fail_on_connect: None,
        }
    }

    /// A backend whose stream yields `Err` at the scripted position.
    pub fn with_script(fragments: Vec<Result<String, String>>) -> Self {
        Self {
            fragments,
            last_request: Arc::new(Mutex::new(None)),
            calls: AtomicUsize::new(0),
            fail_on_connect: None,
        }
    }

    /// A backend that fails before any fragment is produced.
    pub fn failing_on_connect(message: impl Into<String>) -> Self {
        Self {
            fragments: Vec::new(),
            last_request: Arc::new(Mutex::new(None)),
            calls: AtomicUsize::new(0),
            fail_on_connect: Some(message.into()),
        }
    }

    /// The most recent request, if any call was made.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }

    /// Number of `stream_generate` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn stream_generate(
        &self,
        request: GenerationRequest,
    ) -> Result<FragmentStream, CortexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);

        if let Some(message) = &self.fail_on_connect {
            return Err(CortexError::Generation {
                message: message.clone(),
                source: None,
            });
        }

        let items: Vec<Result<String, CortexError>> = self
            .fragments
            .iter()
            .cloned()
            .map(|item| {
                item.map_err(|message| CortexError::Generation {
                    message,
                    source: None,
                })
            })
            .collect();
        Ok(Box::pin(stream::iter(items)))
    }
}
