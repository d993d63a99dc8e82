use axum::{Router, routing::post};

use crate::{AppState, middleware::log_errors, routes};

/// Builds the proxy router, nested under the configured base URI.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/progress", post(routes::progress::fetch_progress))
        .route("/profile", post(routes::profile::fetch_profile));

    Router::new()
        .nest(&state.config.api_base_uri.clone(), api)
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}
