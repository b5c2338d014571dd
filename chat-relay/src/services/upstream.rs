//! Outbound HTTP client for the upstream generate call.
//!
//! The relay only depends on [`UpstreamClient`], so the transport can be
//! swapped (reqwest in production, [`super::mock`] in tests).

use crate::dtos::UpstreamRequest;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

/// Transport-level failure: the upstream never produced a status line.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Network(String),
}

/// Status and raw body of an upstream reply, whatever the status.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Issue one POST with a JSON body, bounded by `timeout`. No retries.
    async fn post_json(
        &self,
        url: Url,
        body: &UpstreamRequest,
        timeout: Duration,
    ) -> Result<UpstreamReply, ClientError>;
}

/// Production client backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestUpstreamClient {
    client: Client,
}

impl ReqwestUpstreamClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("chat-relay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for ReqwestUpstreamClient {
    async fn post_json(
        &self,
        url: Url,
        body: &UpstreamRequest,
        timeout: Duration,
    ) -> Result<UpstreamReply, ClientError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| to_client_error(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| to_client_error(e, timeout))?;

        Ok(UpstreamReply { status, body })
    }
}

// reqwest embeds the request URL in its errors; the URL carries the API key.
fn to_client_error(err: reqwest::Error, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(timeout)
    } else {
        ClientError::Network(err.without_url().to_string())
    }
}
