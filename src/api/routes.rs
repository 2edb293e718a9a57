//! API route configuration.

use crate::api::handlers::{
    collect_all_handler, collect_batch_handler, collect_interactive_handler,
    list_mirrors_handler, resolve_url_batch_handler, resolve_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes that queue runs or drive the browser.
///
/// # Endpoints
///
/// - `POST /collect_mirrors_all_async`   - Queue a run over built-in merchants
/// - `POST /collect_mirrors_batch`       - Queue a run over listed merchants
/// - `POST /resolve_url`                 - Resolve one URL in the browser
/// - `POST /resolve_url_batch`           - Resolve several URLs of one merchant
/// - `POST /collect_mirrors_interactive` - Search, then resolve every hit
pub fn expensive_routes() -> Router<AppState> {
    Router::new()
        .route("/collect_mirrors_all_async", post(collect_all_handler))
        .route("/collect_mirrors_batch", post(collect_batch_handler))
        .route("/resolve_url", post(resolve_url_handler))
        .route("/resolve_url_batch", post(resolve_url_batch_handler))
        .route(
            "/collect_mirrors_interactive",
            post(collect_interactive_handler),
        )
}

/// Read-only routes.
///
/// - `GET /mirrors` - Stored mirror records
pub fn read_routes() -> Router<AppState> {
    Router::new().route("/mirrors", get(list_mirrors_handler))
}
