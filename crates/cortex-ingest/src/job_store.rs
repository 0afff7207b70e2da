// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide job registry.
//!
//! One entry per job identifier, created by the request path and mutated
//! exactly once by the background enrichment task. Entries are evicted the
//! first time a terminal status is read, so repeated polls after that yield
//! "not found" and the client resubmits. Single-writer per entry is a
//! deployment invariant: horizontally scaling the orchestrator without a
//! shared registry breaks the polling contract.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Lifecycle status of an ingestion job.
///
/// `Skipped` appears only in synchronous submit responses; the store never
/// holds a skipped entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
    Skipped,
}

impl JobStatus {
    /// Terminal statuses trigger eviction on read.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Processing)
    }
}

/// Result metadata recorded when enrichment succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    pub model: String,
    /// Wall time of the engine call, milliseconds rounded to one decimal.
    pub processing_time_ms: f64,
    pub nodes_extracted: u64,
    pub edges_extracted: u64,
    pub episode_id: String,
}

/// One registered job.
#[derive(Debug, Clone)]
pub struct JobEntry {
    pub status: JobStatus,
    pub user_id: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<JobMetadata>,
    pub error: Option<String>,
    pub code: Option<String>,
}

impl JobEntry {
    fn processing(user_id: &str, session_id: &str) -> Self {
        Self {
            status: JobStatus::Processing,
            user_id: user_id.to_string(),
            session_id: session_id.to_string(),
            created_at: Utc::now(),
            metadata: None,
            error: None,
            code: None,
        }
    }
}

/// Outcome of an atomic check-and-insert.
#[derive(Debug, Clone)]
pub enum CreateOutcome {
    Created,
    /// The identifier was already registered; the existing entry is returned
    /// so the caller reports current status instead of restarting work.
    Exists(JobEntry),
}

/// In-memory job registry keyed by job identifier.
///
/// The map's per-entry critical section covers each read-modify-write, so
/// operations on one job are atomic without serializing unrelated jobs.
/// Nothing persists across restart; clients discover lost in-flight jobs as
/// "not found" and resubmit.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: DashMap<String, JobEntry>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `processing` entry unless the identifier already exists.
    pub fn create(&self, job_id: &str, user_id: &str, session_id: &str) -> CreateOutcome {
        match self.jobs.entry(job_id.to_string()) {
            Entry::Occupied(entry) => CreateOutcome::Exists(entry.get().clone()),
            Entry::Vacant(slot) => {
                slot.insert(JobEntry::processing(user_id, session_id));
                CreateOutcome::Created
            }
        }
    }

    pub fn get(&self, job_id: &str) -> Option<JobEntry> {
        self.jobs.get(job_id).map(|entry| entry.clone())
    }

    /// Marks a job completed. A no-op when the entry was already evicted.
    pub fn complete(&self, job_id: &str, metadata: JobMetadata) {
        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            entry.status = JobStatus::Completed;
            entry.metadata = Some(metadata);
        }
    }

    /// Marks a job failed. A no-op when the entry was already evicted.
    pub fn fail(&self, job_id: &str, error: String, code: &str) {
        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            entry.status = JobStatus::Failed;
            entry.error = Some(error);
            entry.code = Some(code.to_string());
        }
    }

    /// Returns the entry, removing it iff its status is terminal.
    ///
    /// Still-processing entries are returned without side effect; unknown
    /// identifiers return `None`. Removal and the status check happen under
    /// one entry lock, so concurrent polls observe a terminal entry at most
    /// once.
    pub fn take_terminal(&self, job_id: &str) -> Option<JobEntry> {
        match self.jobs.entry(job_id.to_string()) {
            Entry::Occupied(entry) => {
                if entry.get().status.is_terminal() {
                    Some(entry.remove())
                } else {
                    Some(entry.get().clone())
                }
            }
            Entry::Vacant(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> JobMetadata {
        JobMetadata {
            model: "gemini-3-flash-preview".to_string(),
            processing_time_ms: 1234.5,
            nodes_extracted: 3,
            edges_extracted: 5,
            episode_id: "ep-1".to_string(),
        }
    }

    #[test]
    fn create_is_idempotent_per_identifier() {
        let store = JobStore::new();
        assert!(matches!(
            store.create("j1", "user-1", "s1"),
            CreateOutcome::Created
        ));
        match store.create("j1", "user-1", "s1") {
            CreateOutcome::Exists(entry) => {
                assert_eq!(entry.status, JobStatus::Processing);
                assert_eq!(entry.session_id, "s1");
            }
            CreateOutcome::Created => panic!("duplicate create must not insert"),
        }
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn take_terminal_leaves_processing_entries_in_place() {
        let store = JobStore::new();
        store.create("j1", "user-1", "s1");

        let first = store.take_terminal("j1").unwrap();
        assert_eq!(first.status, JobStatus::Processing);
        let second = store.take_terminal("j1").unwrap();
        assert_eq!(second.status, JobStatus::Processing);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn take_terminal_evicts_completed_entries_exactly_once() {
        let store = JobStore::new();
        store.create("j1", "user-1", "s1");
        store.complete("j1", metadata());

        let taken = store.take_terminal("j1").unwrap();
        assert_eq!(taken.status, JobStatus::Completed);
        assert_eq!(taken.metadata.unwrap().episode_id, "ep-1");

        assert!(store.take_terminal("j1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn fail_records_error_and_code() {
        let store = JobStore::new();
        store.create("j1", "user-1", "s1");
        store.fail("j1", "engine exploded".to_string(), "GRAPH_PROCESSING_ERROR");

        let taken = store.take_terminal("j1").unwrap();
        assert_eq!(taken.status, JobStatus::Failed);
        assert_eq!(taken.error.as_deref(), Some("engine exploded"));
        assert_eq!(taken.code.as_deref(), Some("GRAPH_PROCESSING_ERROR"));
    }

    #[test]
    fn writes_after_eviction_are_silent_no_ops() {
        let store = JobStore::new();
        store.create("j1", "user-1", "s1");
        store.complete("j1", metadata());
        store.take_terminal("j1");

        store.complete("j1", metadata());
        store.fail("j1", "late".to_string(), "INTERNAL_ERROR");
        assert!(store.is_empty());
    }

    #[test]
    fn unknown_identifiers_read_absent() {
        let store = JobStore::new();
        assert!(store.get("missing").is_none());
        assert!(store.take_terminal("missing").is_none());
    }

    #[test]
    fn concurrent_creates_insert_exactly_once() {
        let store = JobStore::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| matches!(store.create("j1", "u", "s"), CreateOutcome::Created))
                })
                .collect();
            let created = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|created| *created)
                .count();
            assert_eq!(created, 1);
        });
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_terminal_reads_observe_the_entry_at_most_once() {
        let store = JobStore::new();
        store.create("j1", "user-1", "s1");
        store.complete("j1", metadata());

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        store
                            .take_terminal("j1")
                            .map(|entry| entry.status.is_terminal())
                            .unwrap_or(false)
                    })
                })
                .collect();
            let observed = handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|terminal| *terminal)
                .count();
            assert_eq!(observed, 1);
        });
        assert!(store.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            "\"processing\""
        );
        assert_eq!(JobStatus::Skipped.to_string(), "skipped");
        assert!(JobStatus::Completed.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
    }
}
