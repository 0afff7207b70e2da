// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the Cortex REST API.
//!
//! Job envelopes use camelCase field names; result metadata keeps its
//! snake_case fields. Hydration and correction wrap their failures as
//! `{success: false, error, code}` bodies rather than HTTP errors, matching
//! what their consumers expect.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use cortex_core::error::CortexError;
use cortex_generation::ChatCompletionRequest;
use cortex_ingest::{JobMetadata, JobStatus, SessionSubmission, StatusReport, SubmitOutcome};

use crate::server::GatewayState;

/// Response body for GET /health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Envelope for POST /ingest and GET /ingest/{job_id} responses.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_knowledge_compilation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JobMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl JobResponse {
    pub fn new(job_id: String, status: JobStatus) -> Self {
        Self {
            job_id,
            status,
            user_knowledge_compilation: None,
            metadata: None,
            error: None,
            code: None,
        }
    }
}

/// Request body for POST /hydrate.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrateRequest {
    pub user_id: String,
}

/// Response body for POST /hydrate.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydrateResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_knowledge_compilation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Request body for POST /v1/graph/correction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrectionRequest {
    pub group_id: String,
    pub correction_text: String,
}

/// Response body for POST /v1/graph/correction.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorrectionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Error response body for HTTP-level failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

fn error_response(err: &CortexError) -> Response {
    let status = match err {
        CortexError::JobNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::NOT_FOUND {
        tracing::debug!(error = %err, "request targeted an unknown job");
    } else {
        tracing::error!(error = %err, "request failed");
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
            code: err.code().to_string(),
        }),
    )
        .into_response()
}

/// GET /health
///
/// Liveness check for load balancers; no authentication, no upstream probes.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "cortex".to_string(),
    })
}

/// POST /ingest
///
/// Accepts a completed session and returns before enrichment runs. Every
/// successful submission answers 202; the status tells the client whether
/// to poll (`processing`) or use the attached compilation (`skipped`).
pub async fn ingest_session(
    State(state): State<GatewayState>,
    Json(body): Json<SessionSubmission>,
) -> Response {
    match state.orchestrator.submit(body).await {
        Ok(SubmitOutcome::Scheduled { job_id }) => (
            StatusCode::ACCEPTED,
            Json(JobResponse::new(job_id, JobStatus::Processing)),
        )
            .into_response(),
        Ok(SubmitOutcome::Duplicate { job_id, status }) => (
            StatusCode::ACCEPTED,
            Json(JobResponse::new(job_id, status)),
        )
            .into_response(),
        Ok(SubmitOutcome::Skipped {
            job_id,
            compilation,
        }) => (
            StatusCode::ACCEPTED,
            Json(JobResponse {
                user_knowledge_compilation: Some(compilation),
                ..JobResponse::new(job_id, JobStatus::Skipped)
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /ingest/{job_id}
///
/// Polls a job. Terminal statuses are consumed by this read; clients that
/// poll again receive 404 and are expected to resubmit.
pub async fn ingest_status(
    State(state): State<GatewayState>,
    Path(job_id): Path<String>,
) -> Response {
    match state.orchestrator.status(&job_id).await {
        Ok(StatusReport::Processing { job_id }) => (
            StatusCode::OK,
            Json(JobResponse::new(job_id, JobStatus::Processing)),
        )
            .into_response(),
        Ok(StatusReport::Completed {
            job_id,
            compilation,
            metadata,
        }) => (
            StatusCode::OK,
            Json(JobResponse {
                user_knowledge_compilation: Some(compilation),
                metadata: Some(metadata),
                ..JobResponse::new(job_id, JobStatus::Completed)
            }),
        )
            .into_response(),
        Ok(StatusReport::Failed {
            job_id,
            error,
            code,
        }) => (
            StatusCode::OK,
            Json(JobResponse {
                error: Some(error),
                code: Some(code),
                ..JobResponse::new(job_id, JobStatus::Failed)
            }),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /hydrate
///
/// Read-only compilation fetch with no enrichment side effect.
pub async fn hydrate_user(
    State(state): State<GatewayState>,
    Json(body): Json<HydrateRequest>,
) -> Json<HydrateResponse> {
    match state.synthesizer.synthesize(&body.user_id).await {
        Ok(compilation) => Json(HydrateResponse {
            success: true,
            user_knowledge_compilation: Some(compilation),
            error: None,
            code: None,
        }),
        Err(err) => {
            tracing::error!(user_id = %body.user_id, error = %err, "hydration failed");
            Json(HydrateResponse {
                success: false,
                user_knowledge_compilation: None,
                error: Some(err.to_string()),
                code: Some("HYDRATION_ERROR".to_string()),
            })
        }
    }
}

/// POST /v1/chat/completions
///
/// OpenAI-compatible streaming completion. The response is an SSE stream of
/// `chat.completion.chunk` events closed by the `[DONE]` sentinel; buffering
/// is disabled so fragments reach the client as they are generated.
pub async fn chat_completions(
    State(state): State<GatewayState>,
    Json(body): Json<ChatCompletionRequest>,
) -> Response {
    let events = state
        .chat
        .stream(body)
        .map(|payload| Ok::<_, Infallible>(Event::default().data(payload)));

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Sse::new(events),
    )
        .into_response()
}

/// GET /v1/graph/{group_id}
///
/// Current graph projection for visualization.
pub async fn get_graph(
    State(state): State<GatewayState>,
    Path(group_id): Path<String>,
) -> Response {
    match state.graph_view.view(&group_id).await {
        Ok(projection) => (StatusCode::OK, Json(projection)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// POST /v1/graph/correction
///
/// Applies a free-text memory correction through the enrichment engine.
pub async fn correct_memory(
    State(state): State<GatewayState>,
    Json(body): Json<CorrectionRequest>,
) -> Json<CorrectionResponse> {
    match state
        .corrections
        .correct(&body.group_id, &body.correction_text)
        .await
    {
        Ok(()) => Json(CorrectionResponse {
            success: true,
            error: None,
            code: None,
        }),
        Err(err) => {
            tracing::error!(group_id = %body.group_id, error = %err, "memory correction failed");
            Json(CorrectionResponse {
                success: false,
                error: Some(err.to_string()),
                code: Some("MEMORY_CORRECTION_ERROR".to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_response_uses_camel_case_and_omits_absent_fields() {
        let response = JobResponse::new("j1".to_string(), JobStatus::Processing);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"jobId":"j1","status":"processing"}"#);
    }

    #[test]
    fn completed_job_response_carries_compilation_and_metadata() {
        let response = JobResponse {
            user_knowledge_compilation: Some("#### 1. ...".to_string()),
            metadata: Some(JobMetadata {
                model: "gemini-3-flash-preview".to_string(),
                processing_time_ms: 1234.5,
                nodes_extracted: 3,
                edges_extracted: 2,
                episode_id: "ep-1".to_string(),
            }),
            ..JobResponse::new("j1".to_string(), JobStatus::Completed)
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["userKnowledgeCompilation"], "#### 1. ...");
        assert_eq!(json["metadata"]["processing_time_ms"], 1234.5);
        assert_eq!(json["metadata"]["episode_id"], "ep-1");
    }

    #[test]
    fn hydrate_request_accepts_camel_case() {
        let request: HydrateRequest = serde_json::from_str(r#"{"userId": "user-1"}"#).unwrap();
        assert_eq!(request.user_id, "user-1");
    }

    #[test]
    fn correction_request_uses_snake_case() {
        let request: CorrectionRequest = serde_json::from_str(
            r#"{"group_id": "user-1", "correction_text": "I moved to Lisbon"}"#,
        )
        .unwrap();
        assert_eq!(request.group_id, "user-1");
        assert_eq!(request.correction_text, "I moved to Lisbon");
    }

    #[test]
    fn health_response_serializes() {
        let json = serde_json::to_string(&HealthResponse {
            status: "ok".to_string(),
            service: "cortex".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"ok","service":"cortex"}"#);
    }
}
