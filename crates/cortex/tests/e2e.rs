// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Cortex pipeline.
//!
//! Each test starts an isolated service: wiremock servers stand in for the
//! enrichment engine, the graph datastore, and the generation API, and the
//! gateway binds an ephemeral port. Requests travel the full path -- reqwest,
//! axum router, orchestration services, upstream HTTP clients.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cortex_config::{GeminiConfig, GraphitiConfig, HydrationConfig, IngestConfig, Neo4jConfig};
use cortex_core::gate::AdmissionGate;
use cortex_core::traits::{EnrichmentEngine, GenerationBackend, GraphStore};
use cortex_gateway::{router, AuthConfig, GatewayState};
use cortex_gemini::GeminiClient;
use cortex_generation::ChatStreamer;
use cortex_graph::{CorrectionDispatcher, GraphView};
use cortex_graphiti::GraphitiClient;
use cortex_hydration::Synthesizer;
use cortex_ingest::{JobStore, Orchestrator};
use cortex_neo4j::Neo4jStore;

const SECRET: &str = "e2e-secret";
const MODEL: &str = "gemini-3-flash-preview";

struct TestService {
    base_url: String,
    client: reqwest::Client,
    graphiti: MockServer,
    neo4j: MockServer,
    gemini: MockServer,
}

impl TestService {
    /// Builds the service exactly as `cortex serve` does, with every
    /// upstream pointed at a wiremock server.
    async fn start() -> Self {
        let graphiti = MockServer::start().await;
        let neo4j = MockServer::start().await;
        let gemini = MockServer::start().await;

        let store: Arc<dyn GraphStore> = Arc::new(
            Neo4jStore::new(&Neo4jConfig {
                http_url: neo4j.uri(),
                user: "neo4j".to_string(),
                password: Some("pw".to_string()),
                database: "neo4j".to_string(),
            })
            .unwrap(),
        );
        let engine: Arc<dyn EnrichmentEngine> = Arc::new(
            GraphitiClient::new(&GraphitiConfig {
                base_url: graphiti.uri(),
                model: MODEL.to_string(),
                request_timeout_secs: 5,
            })
            .unwrap(),
        );
        let backend: Arc<dyn GenerationBackend> = Arc::new(
            GeminiClient::new(&GeminiConfig {
                api_key: Some("e2e-key".to_string()),
                base_url: gemini.uri(),
                default_model: MODEL.to_string(),
                request_timeout_secs: 5,
            })
            .unwrap(),
        );
        let gate = AdmissionGate::new(3);

        let synthesizer = Arc::new(Synthesizer::new(
            Arc::clone(&store),
            &HydrationConfig::default(),
        ));
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(JobStore::new()),
            Arc::clone(&engine),
            Arc::clone(&synthesizer),
            gate.clone(),
            MODEL.to_string(),
            &IngestConfig::default(),
        ));
        let graph_view = Arc::new(GraphView::new(Arc::clone(&store)));
        let corrections = Arc::new(CorrectionDispatcher::new(Arc::clone(&engine), gate.clone()));
        let chat = Arc::new(ChatStreamer::new(backend, gate, MODEL.to_string()));

        let state = GatewayState {
            orchestrator,
            synthesizer,
            graph_view,
            corrections,
            chat,
            auth: AuthConfig {
                api_secret: SECRET.to_string(),
            },
        };

        let app = router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            graphiti,
            neo4j,
            gemini,
        }
    }

    async fn post(&self, route: &str, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{route}", self.base_url))
            .header("x-api-secret", SECRET)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, route: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{route}", self.base_url))
            .header("x-api-secret", SECRET)
            .send()
            .await
            .unwrap()
    }

    async fn poll_until_terminal(&self, job_id: &str) -> serde_json::Value {
        for _ in 0..200 {
            let response = self.get(&format!("/ingest/{job_id}")).await;
            assert_eq!(response.status(), 200);
            let body: serde_json::Value = response.json().await.unwrap();
            if body["status"] != "processing" {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {job_id} never reached a terminal status");
    }
}

fn tx_body(columns: serde_json::Value, rows: Vec<serde_json::Value>) -> serde_json::Value {
    let data: Vec<_> = rows.into_iter().map(|row| json!({ "row": row })).collect();
    json!({
        "results": [{ "columns": columns, "data": data }],
        "errors": []
    })
}

/// Mounts the two synthesis queries (definitions and relationships) with a
/// small fixed dataset. The store serves the same tx/commit endpoint for
/// every query, so mocks discriminate on distinctive Cypher fragments.
async fn mount_synthesis_rows(neo4j: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .and(body_string_contains("degree >= $min_degree"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tx_body(
            json!(["name", "summary", "degree"]),
            vec![json!([
                "Rust",
                "A systems language the user is learning",
                4
            ])],
        )))
        .mount(neo4j)
        .await;

    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .and(body_string_contains("ORDER BY r.valid_at DESC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tx_body(
            json!([
                "source_name",
                "relation_name",
                "target_name",
                "fact",
                "valid_at",
                "invalid_at"
            ]),
            vec![json!([
                "Ana",
                "MENTORS",
                "Luis",
                "Ana reviews Luis's Rust PRs",
                "2026-03-01T09:00:00Z",
                null
            ])],
        )))
        .mount(neo4j)
        .await;
}

/// Mounts the two projection queries (nodes and edges) used by the graph
/// visualization endpoint.
async fn mount_projection_rows(neo4j: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .and(body_string_contains("n.uuid AS id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tx_body(
            json!(["id", "name", "val", "summary"]),
            vec![
                json!(["uuid-1", "Rust", 4, "A systems language"]),
                json!(["uuid-2", "Tokio", 2, "An async runtime"]),
            ],
        )))
        .mount(neo4j)
        .await;

    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .and(body_string_contains("source.uuid AS source"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tx_body(
            json!(["source", "target", "label", "fact", "invalid_at"]),
            vec![json!([
                "uuid-1",
                "uuid-2",
                "USES",
                "Rust programs use Tokio",
                null
            ])],
        )))
        .mount(neo4j)
        .await;
}

fn session_payload(job_id: &str, session_id: &str) -> serde_json::Value {
    json!({
        "jobId": job_id,
        "userId": "user-1",
        "sessionId": session_id,
        "messages": [
            {
                "role": "user",
                "content": "I'm learning Rust and enjoying the borrow checker.",
                "timestamp": 1_740_000_060_000_i64
            },
            {
                "role": "assistant",
                "content": "Ownership clicks faster than most people expect.",
                "timestamp": 1_740_000_120_000_i64
            }
        ],
        "metadata": {
            "sessionStartedAt": 1_740_000_000_000_i64,
            "sessionEndedAt": 1_740_000_120_000_i64,
            "messageCount": 2
        }
    })
}

// ---- Test 1: Health check ----

#[tokio::test]
async fn health_round_trips_without_authentication() {
    let service = TestService::start().await;

    let response = service
        .client
        .get(format!("{}/health", service.base_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "cortex");
}

#[tokio::test]
async fn requests_without_the_shared_secret_are_rejected() {
    let service = TestService::start().await;

    let response = service
        .client
        .post(format!("{}/hydrate", service.base_url))
        .json(&json!({"userId": "user-1"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
}

// ---- Test 2: Ingestion pipeline ----

#[tokio::test]
async fn ingest_enriches_through_the_engine_and_serves_the_result_once() {
    let service = TestService::start().await;

    Mock::given(method("POST"))
        .and(path("/episodes"))
        .and(body_partial_json(json!({
            "name": "session_s600",
            "source": "message",
            "group_id": "user-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "episode_uuid": "ep-600",
            "nodes_extracted": 4,
            "edges_extracted": 2
        })))
        .expect(1)
        .mount(&service.graphiti)
        .await;
    mount_synthesis_rows(&service.neo4j).await;

    let accepted = service
        .post("/ingest", session_payload("job-600", "s600"))
        .await;
    assert_eq!(accepted.status(), 202);
    let body: serde_json::Value = accepted.json().await.unwrap();
    assert_eq!(body["jobId"], "job-600");
    assert_eq!(body["status"], "processing");

    let completed = service.poll_until_terminal("job-600").await;
    assert_eq!(completed["status"], "completed");
    assert!(completed["userKnowledgeCompilation"]
        .as_str()
        .unwrap()
        .contains("- **Rust**: A systems language the user is learning"));
    assert_eq!(completed["metadata"]["episode_id"], "ep-600");
    assert_eq!(completed["metadata"]["nodes_extracted"], 4);
    assert_eq!(completed["metadata"]["model"], MODEL);

    // Terminal results are served exactly once.
    let evicted = service.get("/ingest/job-600").await;
    assert_eq!(evicted.status(), 404);
    let body: serde_json::Value = evicted.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_submission_does_not_reach_the_engine_twice() {
    let service = TestService::start().await;

    // Slow engine keeps the first job in processing while the duplicate
    // arrives.
    Mock::given(method("POST"))
        .and(path("/episodes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({ "episode_uuid": "ep-d" })),
        )
        .expect(1)
        .mount(&service.graphiti)
        .await;
    mount_synthesis_rows(&service.neo4j).await;

    let first = service
        .post("/ingest", session_payload("job-dup", "sd"))
        .await;
    assert_eq!(first.status(), 202);

    let second = service
        .post("/ingest", session_payload("job-dup", "sd"))
        .await;
    assert_eq!(second.status(), 202);
    let body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(body["status"], "processing");

    // Draining the job proves the single scheduled run went to completion
    // before the mock's call count is verified.
    let completed = service.poll_until_terminal("job-dup").await;
    assert_eq!(completed["status"], "completed");
}

// ---- Test 3: Hydration ----

#[tokio::test]
async fn hydrate_compiles_graph_rows_into_text() {
    let service = TestService::start().await;
    mount_synthesis_rows(&service.neo4j).await;

    let response = service.post("/hydrate", json!({"userId": "user-1"})).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let compilation = body["userKnowledgeCompilation"].as_str().unwrap();
    assert!(compilation.contains("- **Rust**: A systems language the user is learning"));
    assert!(compilation
        .contains("- Ana mentors Luis: \"Ana reviews Luis's Rust PRs\" [valid_at: 2026-03-01T09:00:00Z]"));
    assert!(compilation.contains("### STATS ###"));
}

#[tokio::test]
async fn hydrate_reports_datastore_outage_in_band() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/db/neo4j/tx/commit"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&service.neo4j)
        .await;

    let response = service.post("/hydrate", json!({"userId": "user-1"})).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "HYDRATION_ERROR");
}

// ---- Test 4: Chat completions ----

#[tokio::test]
async fn chat_completions_stream_chunks_and_the_done_sentinel() {
    let service = TestService::start().await;

    let sse_body = concat!(
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hello\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\" from Cortex\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1beta/models/{MODEL}:streamGenerateContent"
        )))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "e2e-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body),
        )
        .expect(1)
        .mount(&service.gemini)
        .await;

    // No model in the request: the configured default must be used.
    let response = service
        .post(
            "/v1/chat/completions",
            json!({"messages": [{"role": "user", "content": "Hi"}]}),
        )
        .await;
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = response.text().await.unwrap();
    let events: Vec<&str> = body.split("\n\n").filter(|s| !s.is_empty()).collect();
    assert_eq!(events.len(), 5);

    let role: serde_json::Value =
        serde_json::from_str(events[0].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(role["choices"][0]["delta"]["role"], "assistant");
    assert_eq!(role["model"], MODEL);

    let first: serde_json::Value =
        serde_json::from_str(events[1].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(first["choices"][0]["delta"]["content"], "Hello");

    let finish: serde_json::Value =
        serde_json::from_str(events[3].strip_prefix("data: ").unwrap()).unwrap();
    assert_eq!(finish["choices"][0]["finish_reason"], "stop");

    assert_eq!(events[4], "data: [DONE]");
}

#[tokio::test]
async fn chat_completion_failures_surface_in_band_before_the_sentinel() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path(format!(
            "/v1beta/models/{MODEL}:streamGenerateContent"
        )))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
        .mount(&service.gemini)
        .await;

    let response = service
        .post(
            "/v1/chat/completions",
            json!({"messages": [{"role": "user", "content": "Hi"}]}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let body = response.text().await.unwrap();
    let events: Vec<&str> = body.split("\n\n").filter(|s| !s.is_empty()).collect();
    // Role chunk, in-band error, sentinel.
    assert_eq!(events.len(), 3);
    let error: serde_json::Value =
        serde_json::from_str(events[1].strip_prefix("data: ").unwrap()).unwrap();
    assert!(error["error"].as_str().unwrap().contains("429"));
    assert_eq!(events[2], "data: [DONE]");
}

// ---- Test 5: Graph visualization ----

#[tokio::test]
async fn graph_view_projects_store_rows() {
    let service = TestService::start().await;
    mount_projection_rows(&service.neo4j).await;

    let response = service.get("/v1/graph/user-1").await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(body["nodes"][0]["id"], "uuid-1");
    assert_eq!(body["nodes"][0]["val"], 4);
    assert_eq!(body["links"][0]["source"], "uuid-1");
    assert_eq!(body["links"][0]["target"], "uuid-2");
    assert_eq!(body["links"][0]["label"], "USES");
}

// ---- Test 6: Memory correction ----

#[tokio::test]
async fn correction_submits_a_text_episode_to_the_engine() {
    let service = TestService::start().await;

    Mock::given(method("POST"))
        .and(path("/episodes"))
        .and(body_partial_json(json!({
            "name": "user_memory_correction",
            "source": "text",
            "group_id": "user-1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "episode_uuid": "ep-corr" })),
        )
        .expect(1)
        .mount(&service.graphiti)
        .await;

    let response = service
        .post(
            "/v1/graph/correction",
            json!({
                "group_id": "user-1",
                "correction_text": "Ana no longer works at Initech"
            }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn correction_failures_surface_in_band() {
    let service = TestService::start().await;
    Mock::given(method("POST"))
        .and(path("/episodes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("extraction crashed"))
        .mount(&service.graphiti)
        .await;

    let response = service
        .post(
            "/v1/graph/correction",
            json!({
                "group_id": "user-1",
                "correction_text": "Ana no longer works at Initech"
            }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "MEMORY_CORRECTION_ERROR");
}
