use crate::dtos::ChatResponse;
use crate::error::RelayError;
use crate::startup::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;

/// `POST /api/ai/chat`
///
/// Takes the raw body so that a malformed, non-JSON or oversized payload is
/// reported as "message is required" rather than an extractor rejection.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ChatResponse>, RelayError> {
    // An unreadable body goes through the relay as an empty one, so a missing
    // credential is still reported ahead of the body problem.
    let body = body.unwrap_or_else(|rejection| {
        tracing::info!(
            status = rejection.status().as_u16(),
            rejection = %rejection.body_text(),
            "Chat request body could not be read"
        );
        Bytes::new()
    });

    match state.relay.handle(&body).await {
        Ok(response) => {
            tracing::info!(response_len = response.response.len(), "Chat relayed");
            Ok(Json(response))
        }
        Err(e) => {
            match &e {
                RelayError::Validation(_) => {
                    tracing::info!(kind = e.kind(), error = %e, "Rejected chat request")
                }
                RelayError::Configuration(_) => {
                    tracing::error!(kind = e.kind(), error = %e, "Chat relay misconfigured")
                }
                _ => tracing::warn!(kind = e.kind(), error = %e, "Chat relay failed upstream"),
            }
            Err(e)
        }
    }
}

/// Any method other than POST on the chat route.
pub async fn method_not_allowed(method: Method) -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        Json(json!({
            "error": format!("method {} not allowed, use POST", method),
            "kind": "method_not_allowed",
        })),
    )
}
