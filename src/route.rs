//! Route definitions for the bookmarks API
//!
//! This module maps HTTP routes to their handlers and puts the auth gate in
//! front of them.

use axum::routing::get;
use axum::{middleware, Router};

use crate::database::AppState;
use crate::handler::{
    create_bookmark, delete_bookmark, get_bookmark, list_bookmarks, update_bookmark,
};
use crate::middleware::auth_middleware;

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `GET /bookmarks` - Lists all bookmarks
/// - `POST /bookmarks` - Creates a bookmark
/// - `GET /bookmarks/{id}` - Fetches one bookmark
/// - `DELETE /bookmarks/{id}` - Deletes a bookmark
/// - `PATCH /bookmarks/{id}` - Partially updates a bookmark
///
/// # Example Usage
///
/// ```no_run
/// # use bookmarks::database::{init_db, AppState, RedbStore};
/// # use bookmarks::route::create_app;
/// # let db = init_db("data.db").unwrap();
/// let state = AppState::new(RedbStore::new(db), None);
/// let app = create_app(state);
/// // axum::serve(listener, app).await.unwrap();
/// ```
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route(
            "/bookmarks/{id}",
            get(get_bookmark)
                .delete(delete_bookmark)
                .patch(update_bookmark),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
