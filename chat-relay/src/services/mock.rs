//! Mock upstream client for testing.

use super::upstream::{ClientError, UpstreamClient, UpstreamReply};
use crate::dtos::UpstreamRequest;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Behavior {
    Reply { status: StatusCode, body: String },
    Timeout,
    Network(String),
}

/// A call seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub url: Url,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

/// Returns a canned reply or fault and records every call.
pub struct MockUpstreamClient {
    behavior: Behavior,
    calls: AtomicUsize,
    last_call: Mutex<Option<RecordedCall>>,
}

impl MockUpstreamClient {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_call: Mutex::new(None),
        }
    }

    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Reply {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: body.into(),
        })
    }

    pub fn replying_json(body: &serde_json::Value) -> Self {
        Self::replying(200, body.to_string())
    }

    pub fn timing_out() -> Self {
        Self::with_behavior(Behavior::Timeout)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Network(message.into()))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.last_call.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl UpstreamClient for MockUpstreamClient {
    async fn post_json(
        &self,
        url: Url,
        body: &UpstreamRequest,
        timeout: Duration,
    ) -> Result<UpstreamReply, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_call.lock() {
            *guard = Some(RecordedCall {
                url,
                body: serde_json::to_value(body).unwrap_or_default(),
                timeout,
            });
        }

        match &self.behavior {
            Behavior::Reply { status, body } => Ok(UpstreamReply {
                status: *status,
                body: body.clone(),
            }),
            Behavior::Timeout => Err(ClientError::Timeout(timeout)),
            Behavior::Network(message) => Err(ClientError::Network(message.clone())),
        }
    }
}
