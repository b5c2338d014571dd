use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Every way a chat call can fail, one variant per caller-visible category.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("Server misconfigured: {0}")]
    Configuration(String),

    #[error("Google API error: {status} {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to call Google API: {0}")]
    Transport(String),

    #[error("Could not parse Google response")]
    UpstreamParse { raw: Value },
}

impl RelayError {
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Validation(_) => "validation_error",
            RelayError::Configuration(_) => "configuration_error",
            RelayError::Upstream { .. } => "upstream_error",
            RelayError::Transport(_) => "transport_error",
            RelayError::UpstreamParse { .. } => "upstream_parse_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Upstream { .. }
            | RelayError::Transport(_)
            | RelayError::UpstreamParse { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            upstream_status: Option<u16>,
            #[serde(skip_serializing_if = "Option::is_none")]
            raw: Option<Value>,
        }

        let status = self.status_code();
        let error = self.to_string();
        let kind = self.kind();

        let (upstream_status, raw) = match self {
            RelayError::Upstream { status, body } => (Some(status), Some(Value::String(body))),
            RelayError::UpstreamParse { raw } => (None, Some(raw)),
            _ => (None, None),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                kind,
                upstream_status,
                raw,
            }),
        )
            .into_response()
    }
}
