// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fire-and-forget session ingestion with pollable job lifecycle.
//!
//! Sessions arrive as [`SessionSubmission`] payloads, are gated by an
//! enrichment floor, and run through the knowledge-graph engine in a
//! detached task. The [`JobStore`] keeps exactly one entry per job id and
//! evicts it on the first terminal poll.

pub mod job_store;
pub mod orchestrator;
pub mod session;

pub use job_store::{CreateOutcome, JobEntry, JobMetadata, JobStatus, JobStore};
pub use orchestrator::{Orchestrator, StatusReport, SubmitOutcome};
pub use session::{MessageRole, SessionMessage, SessionMetadata, SessionSubmission};
