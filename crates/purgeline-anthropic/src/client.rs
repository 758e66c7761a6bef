// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Anthropic Messages API.
//!
//! Provides [`AnthropicClient`] which handles authentication headers and a
//! single retry on transient errors.

use std::time::Duration;

use purgeline_core::PurgeError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, MessageRequest, MessageResponse};

/// Endpoint for the Anthropic Messages API.
pub const API_BASE_URL: &str = "https://api.anthropic.com/v1/messages";

/// HTTP client for Anthropic API communication.
///
/// Retries once after a one-second pause on 429, 500, 503 and 529.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    client: reqwest::Client,
    max_retries: u32,
    base_url: String,
}

impl AnthropicClient {
    /// Creates a client that authenticates with `api_key` against `api_version`.
    pub fn new(api_key: &str, api_version: &str) -> Result<Self, PurgeError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key)
                .map_err(|e| PurgeError::Config(format!("invalid API key header value: {e}")))?,
        );
        headers.insert(
            "anthropic-version",
            HeaderValue::from_str(api_version).map_err(|e| {
                PurgeError::Config(format!("invalid API version header value: {e}"))
            })?,
        );
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| PurgeError::AuditUnavailable {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            max_retries: 1,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the endpoint URL (proxies, wiremock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a request and returns the full response.
    pub async fn complete_message(
        &self,
        request: &MessageRequest,
    ) -> Result<MessageResponse, PurgeError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying audit request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.base_url)
                .json(request)
                .send()
                .await
                .map_err(|e| PurgeError::AuditUnavailable {
                    message: format!("HTTP request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;

            let status = response.status();
            debug!(status = %status, attempt, "audit response received");

            if status.is_success() {
                let body = response
                    .text()
                    .await
                    .map_err(|e| PurgeError::AuditUnavailable {
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return serde_json::from_str(&body).map_err(|e| PurgeError::AuditUnavailable {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, body = %body, "transient error, will retry");
                last_error = Some(PurgeError::audit_unavailable(format!(
                    "API returned {status}: {body}"
                )));
                continue;
            }

            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Anthropic API error ({}): {}",
                    api_err.error.type_, api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(PurgeError::audit_unavailable(message));
        }

        Err(last_error
            .unwrap_or_else(|| PurgeError::audit_unavailable("audit request failed after retries")))
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503 | 529)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiMessage;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> AnthropicClient {
        AnthropicClient::new("test-api-key", "2023-06-01")
            .unwrap()
            .with_base_url(base_url)
    }

    fn test_request() -> MessageRequest {
        MessageRequest {
            model: "claude-haiku-4-5-20251001".into(),
            messages: vec![ApiMessage::user("Hello")],
            system: None,
            max_tokens: 256,
        }
    }

    fn ok_body(id: &str, text: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": text}],
            "model": "claude-haiku-4-5-20251001",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 10, "output_tokens": 5}
        })
    }

    #[tokio::test]
    async fn complete_message_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("msg_test", "[]")))
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap();
        assert_eq!(result.id, "msg_test");
        assert_eq!(result.text(), "[]");
    }

    #[tokio::test]
    async fn complete_message_retries_on_429() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"type": "rate_limit_error", "message": "Rate limited"}
        });

        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(429).set_body_json(&error_body))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("msg_retry", "[]")))
            .mount(&server)
            .await;

        let result = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap();
        assert_eq!(result.id, "msg_retry");
    }

    #[tokio::test]
    async fn complete_message_fails_on_400_without_retry() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"type": "invalid_request_error", "message": "Bad model"}
        });
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PurgeError::AuditUnavailable { .. }));
        assert!(err.to_string().contains("invalid_request_error"), "got: {err}");
    }

    #[tokio::test]
    async fn complete_message_exhausts_retries_on_503() {
        let server = MockServer::start().await;
        let error_body = serde_json::json!({
            "error": {"type": "overloaded_error", "message": "Service overloaded"}
        });
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(&error_body))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("overloaded_error"), "got: {err}");
    }

    #[tokio::test]
    async fn garbage_success_body_is_audit_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .complete_message(&test_request())
            .await
            .unwrap_err();
        assert!(matches!(err, PurgeError::AuditUnavailable { .. }));
    }

    #[tokio::test]
    async fn client_sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("x-api-key", "test-api-key"))
            .and(header("anthropic-version", "2023-06-01"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ok_body("msg_h", "ok")))
            .mount(&server)
            .await;

        let result = test_client(&server.uri()).complete_message(&test_request()).await;
        assert!(result.is_ok(), "headers should match: {result:?}");
    }
}
