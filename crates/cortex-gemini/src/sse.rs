// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for `streamGenerateContent` responses.
//!
//! Converts a reqwest response byte stream into text fragments using the
//! `eventsource-stream` crate for SSE protocol compliance. Frames that carry
//! no text (bare finish frames) are skipped; embedded error frames surface
//! as stream errors.

use eventsource_stream::Eventsource;
use futures::stream::StreamExt;

use cortex_core::error::CortexError;
use cortex_core::traits::FragmentStream;

use crate::types::StreamChunk;

/// Parses a streaming response into a stream of text fragments.
pub fn parse_fragment_stream(response: reqwest::Response) -> FragmentStream {
    let byte_stream = response.bytes_stream();
    let event_stream = byte_stream.eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => {
                if event.data.is_empty() {
                    return None;
                }
                let chunk = match serde_json::from_str::<StreamChunk>(&event.data) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        return Some(Err(CortexError::Generation {
                            message: format!("failed to parse stream chunk: {e}"),
                            source: Some(Box::new(e)),
                        }));
                    }
                };
                if let Some(err) = chunk.error {
                    return Some(Err(CortexError::Generation {
                        message: format!("upstream error {}: {}", err.code, err.message),
                        source: None,
                    }));
                }
                let text = chunk.text();
                if text.is_empty() {
                    None
                } else {
                    Some(Ok(text))
                }
            }
            Err(e) => Some(Err(CortexError::Generation {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    /// Helper: serve raw SSE text through wiremock to get a real
    /// reqwest::Response.
    async fn mock_sse_response(sse_text: &str) -> reqwest::Response {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_text.to_string()),
            )
            .mount(&server)
            .await;

        reqwest::get(&server.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn yields_text_fragments_in_order() {
        let sse = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Hel\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"lo\"}]}}]}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_fragment_stream(response);

        assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
        assert_eq!(stream.next().await.unwrap().unwrap(), "lo");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn multi_part_frames_concatenate() {
        let sse =
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"a\"},{\"text\":\"b\"}]}}]}\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_fragment_stream(response);

        assert_eq!(stream.next().await.unwrap().unwrap(), "ab");
    }

    #[tokio::test]
    async fn bare_finish_frames_are_skipped() {
        let sse = concat!(
            "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"done\"}]}}]}\n\n",
            "data: {\"candidates\":[{\"finishReason\":\"STOP\"}]}\n\n",
        );
        let response = mock_sse_response(sse).await;
        let mut stream = parse_fragment_stream(response);

        assert_eq!(stream.next().await.unwrap().unwrap(), "done");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn embedded_error_frame_surfaces_as_generation_error() {
        let sse = "data: {\"error\":{\"code\":429,\"message\":\"quota exhausted\"}}\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_fragment_stream(response);

        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.code(), "GENERATION_ERROR");
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn malformed_frame_surfaces_as_generation_error() {
        let sse = "data: not json\n\n";
        let response = mock_sse_response(sse).await;
        let mut stream = parse_fragment_stream(response);

        let err = stream.next().await.unwrap().unwrap_err();
        assert_eq!(err.code(), "GENERATION_ERROR");
    }
}
