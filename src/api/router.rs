use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes - no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // API routes - require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Fixtures
        .route("/api/fixtures", get(handlers::fixtures::grouped))
        .route("/api/competitions", get(handlers::fixtures::competitions))
        // Synchronization
        .route(
            "/api/sync/:date",
            get(handlers::sync::status).post(handlers::sync::force),
        )
        // Settlement
        .route("/api/settlement/run", post(handlers::settlement::run))
        // Predictions
        .route("/api/predictions", post(handlers::predictions::create))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
