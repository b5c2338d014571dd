//! The relay: validate an inbound chat body, forward it upstream once, and
//! normalize whatever envelope comes back.

use super::envelope;
use super::upstream::UpstreamClient;
use crate::config::RelayConfig;
use crate::dtos::{ChatRequest, ChatResponse, UpstreamRequest};
use crate::error::RelayError;
use serde_json::Value;
use std::sync::Arc;

/// A dependency the relay needs to serve chats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingDependency {
    HttpClient,
    ApiKey,
}

impl MissingDependency {
    /// Only the HTTP client takes the process down; a missing key is a valid
    /// degraded state where chats fail fast.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MissingDependency::HttpClient)
    }

    pub fn message(&self) -> &'static str {
        match self {
            MissingDependency::HttpClient => "AI proxy running but missing outbound HTTP client",
            MissingDependency::ApiKey => {
                "AI proxy running without GOOGLE_API_KEY; chat requests will fail"
            }
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            MissingDependency::HttpClient => {
                "Check the startup logs for the HTTP client initialization error and restart"
            }
            MissingDependency::ApiKey => "Set GOOGLE_API_KEY in the environment or .env and restart",
        }
    }
}

/// Stateless apart from the immutable config and the shared client.
#[derive(Clone)]
pub struct RelayHandler {
    config: Arc<RelayConfig>,
    client: Option<Arc<dyn UpstreamClient>>,
}

impl RelayHandler {
    pub fn new(config: Arc<RelayConfig>, client: Option<Arc<dyn UpstreamClient>>) -> Self {
        Self { config, client }
    }

    /// First unmet dependency, if any.
    pub fn missing_dependency(&self) -> Option<MissingDependency> {
        if self.client.is_none() {
            Some(MissingDependency::HttpClient)
        } else if !self.config.google.has_api_key() {
            Some(MissingDependency::ApiKey)
        } else {
            None
        }
    }

    /// Relay one raw inbound body. Performs at most one upstream call, and
    /// none when validation fails.
    pub async fn handle(&self, body: &[u8]) -> Result<ChatResponse, RelayError> {
        let api_key = self.config.google.api_key.as_ref().ok_or_else(|| {
            RelayError::Configuration("missing GOOGLE_API_KEY env var".to_string())
        })?;

        let message = parse_message(body)?;

        let client = self.client.as_ref().ok_or_else(|| {
            RelayError::Configuration("missing outbound HTTP client".to_string())
        })?;

        let request = UpstreamRequest::new(message);
        let url = self.config.google.endpoint(api_key);

        tracing::debug!(
            upstream_host = self.config.google.base_url.host_str().unwrap_or("-"),
            prompt_len = request.prompt.text.len(),
            "Sending prompt to Google API"
        );

        let reply = client
            .post_json(url, &request, self.config.google.timeout)
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        if !reply.status.is_success() {
            return Err(RelayError::Upstream {
                status: reply.status.as_u16(),
                body: reply.body,
            });
        }

        let document: Value = match serde_json::from_str(&reply.body) {
            Ok(document) => document,
            Err(_) => {
                return Err(RelayError::UpstreamParse {
                    raw: Value::String(reply.body),
                })
            }
        };

        match envelope::extract_text(&document) {
            Some(response) => Ok(ChatResponse { response }),
            None => Err(RelayError::UpstreamParse { raw: document }),
        }
    }
}

/// Trimmed `message` from a JSON object body.
fn parse_message(body: &[u8]) -> Result<String, RelayError> {
    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(Value::is_object)
        .and_then(|document| serde_json::from_value::<ChatRequest>(document).ok())
        .map(|request| request.message.trim().to_string())
        .filter(|message| !message.is_empty())
        .ok_or_else(|| RelayError::Validation("message is required".to_string()))
}
