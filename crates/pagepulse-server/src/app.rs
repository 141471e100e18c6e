use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// Construct the Axum [`Router`] with the route and middleware attached.
///
/// Middleware, outer to inner:
///
/// 1. `TraceLayer` — structured request/response logging via `tracing`.
/// 2. `CorsLayer` — open to all origins; the endpoint is consumed by
///    browser widgets embedded on other sites.
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1", get(routes::pageviews::pageviews))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
