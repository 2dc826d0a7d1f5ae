//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    // The file surface is one grammar, so `/files/...` funnels into a
    // single entry point and the pure router decides what it means. No
    // compression layer: payload pass-through is bit-exact by contract.
    let mut router = Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/files", any(handlers::object_entry))
        .route("/files/{*rest}", any(handlers::object_entry))
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    if state.config.cors_enabled {
        router = router.layer(cors);
    }

    router.with_state(state)
}
