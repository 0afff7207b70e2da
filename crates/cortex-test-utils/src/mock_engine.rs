// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock enrichment engine for deterministic testing.
//!
//! Counts invocations and records submitted episodes so idempotence
//! properties (exactly one enrichment per session) are directly assertable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use cortex_core::error::CortexError;
use cortex_core::traits::EnrichmentEngine;
use cortex_core::types::{EpisodeInput, EpisodeOutcome};

/// A mock [`EnrichmentEngine`] that returns pre-configured outcomes.
///
/// Outcomes are popped from a FIFO queue; when the queue is empty a default
/// outcome is returned. An optional per-call delay simulates long-running
/// extraction.
pub struct MockEnrichmentEngine {
    outcomes: Mutex<VecDeque<Result<EpisodeOutcome, String>>>,
    episodes: Arc<Mutex<Vec<EpisodeInput>>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockEnrichmentEngine {
    /// Creates an engine that always succeeds with the default outcome.
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            episodes: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    /// Pre-loads outcomes returned in order; `Err` entries become engine
    /// errors with the given message.
    pub fn with_outcomes(outcomes: Vec<Result<EpisodeOutcome, String>>) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::from(outcomes)),
            ..Self::new()
        }
    }

    /// Sleeps this long inside every call before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `add_episode` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Episodes submitted so far, in order.
    pub fn episodes(&self) -> Vec<EpisodeInput> {
        self.episodes.lock().unwrap().clone()
    }

    fn default_outcome() -> EpisodeOutcome {
        EpisodeOutcome {
            episode_uuid: "mock-episode".to_string(),
            nodes_extracted: 1,
            edges_extracted: 1,
        }
    }
}

impl Default for MockEnrichmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnrichmentEngine for MockEnrichmentEngine {
    async fn add_episode(&self, episode: EpisodeInput) -> Result<EpisodeOutcome, CortexError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.episodes.lock().unwrap().push(episode);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.outcomes.lock().unwrap().pop_front();
        match next {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(CortexError::Engine {
                message,
                source: None,
            }),
            None => Ok(Self::default_outcome()),
        }
    }
}
