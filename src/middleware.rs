//! Authorization gate for the bookmarks API
//!
//! Runs before every bookmark route and rejects requests that do not carry
//! the configured bearer token.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::database::AppState;

/// Middleware to check for a bearer token
///
/// When the application was started with an API token, every request must
/// carry `Authorization: Bearer <token>` with exactly that token. Without a
/// configured token the check is skipped.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, Response> {
    if let Some(api_token) = state.api_token.as_deref() {
        let supplied = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));

        if supplied != Some(api_token) {
            tracing::warn!(
                path = %request.uri().path(),
                "Unauthorized request to path: {}",
                request.uri().path()
            );
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized request" })),
            )
                .into_response());
        }
    }

    Ok(next.run(request).await)
}
