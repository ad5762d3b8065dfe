//! HTTP request handlers for the bookmarks API
//!
//! This module implements the resource lifecycle for bookmarks:
//! - Listing and fetching bookmarks
//! - Creating bookmarks from a validated payload
//! - Deleting and partially updating existing bookmarks
//!
//! Every id-addressed route checks existence first, so a missing bookmark
//! yields 404 before the request body is even looked at. Bodies are read as
//! raw bytes; a missing, non-JSON or unparseable body counts as `{}` and is
//! then rejected by validation with the usual error shape.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

use crate::database::AppState;
use crate::error::ApiError;
use crate::model::Bookmark;
use crate::validation::{validate_create, validate_patch, ValidationError};

/// Resource kind reported in audit log records
const RESOURCE: &str = "bookmark";

/// Lists every bookmark
///
/// # Response
///
/// - **200 OK** - JSON array of bookmarks in insertion order, `[]` when empty
pub async fn list_bookmarks(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let bookmarks: Vec<Bookmark> = state
        .store
        .list()?
        .into_iter()
        .map(Bookmark::sanitized)
        .collect();

    Ok(Json(bookmarks))
}

/// Fetches one bookmark by id
///
/// # Response
///
/// - **200 OK** - The bookmark
/// - **404 Not Found** - `{"error":{"message":"Bookmark Not Found"}}`
pub async fn get_bookmark(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let bookmark = find_bookmark(&state, &id)?;
    Ok(Json(bookmark.sanitized()))
}

/// Creates a new bookmark
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Rust",
///   "url": "https://www.rust-lang.org",
///   "rating": 5,
///   "description": "Optional"
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - Stored bookmark, with `Location: /bookmarks/{id}`
/// - **400 Bad Request** - First failing field, e.g. `'title' is required`
pub async fn create_bookmark(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let new_bookmark = validate_create(&parse_body(&body)).inspect_err(log_rejected)?;

    let bookmark = state.store.insert(new_bookmark.sanitized())?.sanitized();
    tracing::info!(
        resource = RESOURCE,
        id = bookmark.id,
        action = "created",
        "Bookmark with id {} created",
        bookmark.id
    );

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, bookmark.location())],
        Json(bookmark),
    ))
}

/// Deletes a bookmark
///
/// # Response
///
/// - **204 No Content** - Bookmark removed
/// - **404 Not Found** - No bookmark with this id
pub async fn delete_bookmark(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let bookmark = find_bookmark(&state, &id)?;

    // A concurrent delete may win between the lookup and this call
    if !state.store.delete(bookmark.id)? {
        return Err(not_found(&id));
    }
    tracing::info!(
        resource = RESOURCE,
        id = bookmark.id,
        action = "deleted",
        "Bookmark with id {} deleted",
        bookmark.id
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Partially updates a bookmark
///
/// Only `title`, `url`, `description` and `rating` are taken from the body;
/// any other key is ignored. At least one of `title`, `url` or `rating` must
/// be present.
///
/// # Response
///
/// - **204 No Content** - Fields merged into the stored record
/// - **400 Bad Request** - Empty patch, bad rating or bad url
/// - **404 Not Found** - No bookmark with this id
pub async fn update_bookmark(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let bookmark = find_bookmark(&state, &id)?;
    let patch = validate_patch(&parse_body(&body)).inspect_err(log_rejected)?;

    if state.store.update(bookmark.id, &patch.sanitized())?.is_none() {
        return Err(not_found(&id));
    }
    tracing::info!(
        resource = RESOURCE,
        id = bookmark.id,
        action = "updated",
        "Bookmark with id {} updated",
        bookmark.id
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Looks up the bookmark behind a raw path segment
///
/// Segments that are not valid ids cannot name a stored bookmark and are
/// reported as not found.
fn find_bookmark(state: &AppState, raw_id: &str) -> Result<Bookmark, ApiError> {
    let Ok(id) = raw_id.parse::<u64>() else {
        return Err(not_found(raw_id));
    };

    state.store.get(id)?.ok_or_else(|| not_found(raw_id))
}

/// Decodes a request body, falling back to an empty object
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|err| {
        if !body.is_empty() {
            tracing::warn!(resource = RESOURCE, error = %err, "Request body is not valid JSON");
        }
        Value::Object(Map::new())
    })
}

fn not_found(id: &str) -> ApiError {
    tracing::warn!(resource = RESOURCE, id, "Bookmark with id {} not found", id);
    ApiError::NotFound
}

fn log_rejected(err: &ValidationError) {
    tracing::warn!(resource = RESOURCE, field = err.field(), "{}", err);
}
