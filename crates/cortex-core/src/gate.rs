// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counting admission gate bounding concurrent upstream calls.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::CortexError;

/// Bounds concurrent access to the knowledge-graph engine and the
/// language-model service.
///
/// Both upstreams ultimately consume the same model quota, so one gate is
/// shared across them. Callers beyond the limit queue on [`admit`] rather
/// than fail; the permit is held for the full duration of the upstream
/// exchange, including stream consumption.
///
/// [`admit`]: AdmissionGate::admit
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
}

impl AdmissionGate {
    /// Creates a gate admitting at most `limit` concurrent upstream calls.
    pub fn new(limit: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(limit)),
        }
    }

    /// Waits for a permit, queueing behind earlier callers when the gate is
    /// saturated.
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit, CortexError> {
        self.semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CortexError::Internal("admission gate closed".into()))
    }

    /// Permits currently available.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
