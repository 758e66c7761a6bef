// SPDX-FileCopyrightText: 2026 Purgeline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the subset of the Anthropic Messages API used by audits.

use serde::{Deserialize, Serialize};

// --- Request types ---

/// A non-streaming request to the Messages API.
#[derive(Debug, Clone, Serialize)]
pub struct MessageRequest {
    pub model: String,
    pub messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub max_tokens: u32,
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
}

impl ApiMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

// --- Response types ---

/// A full response from the Messages API.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub content: Vec<ResponseContentBlock>,
    pub model: String,
    /// Reason the generation stopped; "max_tokens" means the payload is truncated.
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: ApiUsage,
}

impl MessageResponse {
    /// Concatenation of every text block, in order.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ResponseContentBlock::Text { text } => Some(text.as_str()),
                ResponseContentBlock::Other => None,
            })
            .collect()
    }
}

/// A content block in a response. Only text is meaningful for audits.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ResponseContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Token usage statistics.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type")]
    pub type_: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_request_without_system() {
        let req = MessageRequest {
            model: "claude-haiku-4-5-20251001".into(),
            messages: vec![ApiMessage::user("Hello")],
            system: None,
            max_tokens: 512,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "claude-haiku-4-5-20251001");
        assert_eq!(json["max_tokens"], 512);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Hello");
        assert!(json.get("system").is_none());
    }

    #[test]
    fn response_text_joins_text_blocks_and_skips_others() {
        let body = serde_json::json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "[{\"id\":"},
                {"type": "tool_use", "id": "t", "name": "x", "input": {}},
                {"type": "text", "text": "\"1\"}]"}
            ],
            "model": "claude-haiku-4-5-20251001",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 3, "output_tokens": 4}
        });
        let resp: MessageResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.text(), "[{\"id\":\"1\"}]");
        assert_eq!(resp.usage.output_tokens, 4);
    }

    #[test]
    fn deserialize_error_body() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"busy"}}"#;
        let err: ApiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(err.error.type_, "overloaded_error");
        assert_eq!(err.error.message, "busy");
    }
}
