// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ingestion orchestration: validate, register, and enrich in the background.
//!
//! `submit` never waits on the enrichment engine. It either short-circuits
//! with a skipped result, reports a duplicate, or registers a processing job
//! and detaches a task that runs the engine call under the admission gate.
//! Clients learn the outcome by polling `status`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use cortex_config::IngestConfig;
use cortex_core::error::CortexError;
use cortex_core::gate::AdmissionGate;
use cortex_core::traits::EnrichmentEngine;
use cortex_core::types::{EpisodeInput, EpisodeKind};
use cortex_hydration::Synthesizer;

use crate::job_store::{CreateOutcome, JobMetadata, JobStatus, JobStore};
use crate::session::SessionSubmission;

const SOURCE_DESCRIPTION: &str = "Chat conversation from Synapse AI Chat application";

/// Synchronous result of a session submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// A new job was registered and enrichment is running in the background.
    Scheduled { job_id: String },
    /// The identifier was already registered; no new work was scheduled.
    Duplicate { job_id: String, status: JobStatus },
    /// The session fell below the enrichment floor. Nothing was stored; the
    /// current compilation is returned in the same call.
    Skipped { job_id: String, compilation: String },
}

/// Result of a status poll on a known job.
#[derive(Debug, Clone)]
pub enum StatusReport {
    Processing {
        job_id: String,
    },
    /// Terminal success. The compilation is synthesized at poll time, not
    /// cached from enrichment, and the entry has been evicted.
    Completed {
        job_id: String,
        compilation: String,
        metadata: JobMetadata,
    },
    /// Terminal failure; the entry has been evicted.
    Failed {
        job_id: String,
        error: String,
        code: String,
    },
}

/// Coordinates the job store, the enrichment engine, and the synthesizer.
pub struct Orchestrator {
    jobs: Arc<JobStore>,
    engine: Arc<dyn EnrichmentEngine>,
    synthesizer: Arc<Synthesizer>,
    gate: AdmissionGate,
    model: String,
    min_messages: usize,
    min_total_chars: usize,
}

impl Orchestrator {
    pub fn new(
        jobs: Arc<JobStore>,
        engine: Arc<dyn EnrichmentEngine>,
        synthesizer: Arc<Synthesizer>,
        gate: AdmissionGate,
        model: String,
        config: &IngestConfig,
    ) -> Self {
        Self {
            jobs,
            engine,
            synthesizer,
            gate,
            model,
            min_messages: config.min_messages,
            min_total_chars: config.min_total_chars,
        }
    }

    /// Accepts a session for enrichment.
    ///
    /// Returns before any engine work happens; the outcome tells the caller
    /// whether to poll, report a duplicate, or use the attached compilation.
    pub async fn submit(&self, session: SessionSubmission) -> Result<SubmitOutcome, CortexError> {
        if !self.should_enrich(&session) {
            info!(
                job_id = %session.job_id,
                session_id = %session.session_id,
                messages = session.messages.len(),
                total_chars = session.total_chars(),
                "session below enrichment floor, returning current compilation"
            );
            let compilation = self.synthesizer.synthesize(&session.user_id).await?;
            return Ok(SubmitOutcome::Skipped {
                job_id: session.job_id,
                compilation,
            });
        }

        match self
            .jobs
            .create(&session.job_id, &session.user_id, &session.session_id)
        {
            CreateOutcome::Exists(entry) => {
                debug!(job_id = %session.job_id, status = %entry.status, "duplicate submission");
                Ok(SubmitOutcome::Duplicate {
                    job_id: session.job_id,
                    status: entry.status,
                })
            }
            CreateOutcome::Created => {
                let job_id = session.job_id.clone();
                self.spawn_enrichment(session);
                Ok(SubmitOutcome::Scheduled { job_id })
            }
        }
    }

    /// Reports a job's status, evicting the entry on terminal reads.
    ///
    /// Unknown identifiers (including already-consumed ones) yield
    /// [`CortexError::JobNotFound`]; the client resolves that by resubmitting.
    pub async fn status(&self, job_id: &str) -> Result<StatusReport, CortexError> {
        let Some(entry) = self.jobs.take_terminal(job_id) else {
            return Err(CortexError::JobNotFound {
                job_id: job_id.to_string(),
            });
        };

        match entry.status {
            JobStatus::Processing => Ok(StatusReport::Processing {
                job_id: job_id.to_string(),
            }),
            JobStatus::Completed => {
                let metadata = entry.metadata.ok_or_else(|| {
                    CortexError::Internal(format!("completed job {job_id} has no metadata"))
                })?;
                // The entry is already evicted; a synthesis failure here
                // surfaces to the client, who re-hydrates.
                let compilation = self.synthesizer.synthesize(&entry.user_id).await?;
                Ok(StatusReport::Completed {
                    job_id: job_id.to_string(),
                    compilation,
                    metadata,
                })
            }
            JobStatus::Failed => Ok(StatusReport::Failed {
                job_id: job_id.to_string(),
                error: entry
                    .error
                    .unwrap_or_else(|| "unknown enrichment failure".to_string()),
                code: entry
                    .code
                    .unwrap_or_else(|| "INTERNAL_ERROR".to_string()),
            }),
            JobStatus::Skipped => Err(CortexError::Internal(format!(
                "job {job_id} stored with skipped status"
            ))),
        }
    }

    fn should_enrich(&self, session: &SessionSubmission) -> bool {
        session.messages.len() >= self.min_messages
            && session.total_chars() >= self.min_total_chars
    }

    /// Detaches the background enrichment task. The task is the only writer
    /// for this job id after `create`.
    fn spawn_enrichment(&self, session: SessionSubmission) {
        let jobs = Arc::clone(&self.jobs);
        let engine = Arc::clone(&self.engine);
        let gate = self.gate.clone();
        let model = self.model.clone();

        tokio::spawn(async move {
            let job_id = session.job_id.clone();
            let episode = EpisodeInput {
                name: format!("session_{}", session.session_id),
                body: session.transcript(),
                kind: EpisodeKind::Message,
                source_description: SOURCE_DESCRIPTION.to_string(),
                group_id: session.user_id.clone(),
                reference_time: session.reference_time(),
            };

            let result = async {
                let _permit = gate.admit().await?;
                let started = Instant::now();
                let outcome = engine.add_episode(episode).await?;
                Ok::<_, CortexError>((outcome, started.elapsed()))
            }
            .await;

            match result {
                Ok((outcome, elapsed)) => {
                    let processing_time_ms = round_millis(elapsed);
                    info!(
                        job_id = %job_id,
                        session_id = %session.session_id,
                        nodes = outcome.nodes_extracted,
                        edges = outcome.edges_extracted,
                        elapsed_ms = processing_time_ms,
                        "enrichment completed"
                    );
                    jobs.complete(
                        &job_id,
                        JobMetadata {
                            model,
                            processing_time_ms,
                            nodes_extracted: outcome.nodes_extracted,
                            edges_extracted: outcome.edges_extracted,
                            episode_id: outcome.episode_uuid,
                        },
                    );
                }
                Err(err) => {
                    error!(job_id = %job_id, error = %err, "enrichment failed");
                    jobs.fail(&job_id, err.to_string(), err.code());
                }
            }
        });
    }
}

/// Milliseconds rounded to one decimal.
fn round_millis(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 10_000.0).round() / 10.0
}
