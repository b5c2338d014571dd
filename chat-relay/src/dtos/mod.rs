//! Wire types for the inbound chat endpoint and the upstream generate call.

use serde::{Deserialize, Serialize};

/// Sampling temperature sent with every prompt.
pub const TEMPERATURE: f64 = 0.2;

/// Output token cap sent with every prompt.
pub const MAX_OUTPUT_TOKENS: u32 = 512;

/// Inbound chat request. Fields other than `message` are ignored.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Successful chat reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Liveness check body.
#[derive(Debug, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Body of the upstream `generate` call. The credential travels in the URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamRequest {
    pub prompt: Prompt,
    pub temperature: f64,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    pub text: String,
}

impl UpstreamRequest {
    pub fn new(prompt_text: impl Into<String>) -> Self {
        Self {
            prompt: Prompt {
                text: prompt_text.into(),
            },
            temperature: TEMPERATURE,
            max_output_tokens: MAX_OUTPUT_TOKENS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upstream_request_wire_shape() {
        let body = serde_json::to_value(UpstreamRequest::new("Hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": { "text": "Hello" },
                "temperature": 0.2,
                "maxOutputTokens": 512
            })
        );
    }

    #[test]
    fn test_liveness_omits_missing_hint() {
        let body = serde_json::to_value(LivenessResponse {
            ok: true,
            message: "AI proxy running".to_string(),
            hint: None,
        })
        .unwrap();
        assert_eq!(body, json!({ "ok": true, "message": "AI proxy running" }));
    }
}
