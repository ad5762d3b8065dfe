//! Error types and their HTTP mapping
//!
//! Client mistakes become 400/404 with a `{"error":{"message":...}}` body.
//! Storage faults become a bare 500; the underlying cause is logged and never
//! sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationError;

/// Failures raised by a [`BookmarkStore`](crate::store::BookmarkStore)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] redb::Error),

    #[error("stored record could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("in-memory store lock poisoned")]
    Poisoned,
}

macro_rules! redb_error_into_storage {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StorageError {
                fn from(err: $ty) -> Self {
                    Self::Database(err.into())
                }
            }
        )*
    };
}

redb_error_into_storage!(
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

/// Every way a bookmark request can fail
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Bookmark Not Found")]
    NotFound,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Storage(err) => {
                tracing::error!(error = %err, "storage failure");
                "server error".to_string()
            }
            other => other.to_string(),
        };

        (
            self.status(),
            Json(json!({
                "error": { "message": message }
            })),
        )
            .into_response()
    }
}
