use crate::dtos::LivenessResponse;
use crate::startup::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

/// `GET /` and `GET /health`: 500 with a remediation hint only when the
/// outbound HTTP client is missing. A missing API key still reports `ok`,
/// with the hint attached.
pub async fn liveness(State(state): State<AppState>) -> impl IntoResponse {
    match state.relay.missing_dependency() {
        None => (
            StatusCode::OK,
            Json(LivenessResponse {
                ok: true,
                message: "AI proxy running".to_string(),
                hint: None,
            }),
        ),
        Some(missing) if !missing.is_fatal() => (
            StatusCode::OK,
            Json(LivenessResponse {
                ok: true,
                message: missing.message().to_string(),
                hint: Some(missing.hint().to_string()),
            }),
        ),
        Some(missing) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(LivenessResponse {
                ok: false,
                message: missing.message().to_string(),
                hint: Some(missing.hint().to_string()),
            }),
        ),
    }
}
