//! Route definitions and router construction.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::bootstrap::CorsConfig;
use crate::handlers;
use crate::state::AppState;

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    match config {
        CorsConfig::AllowAll => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        CorsConfig::AllowOrigins(origins) => {
            use axum::http::HeaderValue;
            let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// All API routes without the `/api` prefix (for nesting under /api).
pub(crate) fn api_routes() -> Router<AppState> {
    Router::new()
        // Speak API
        .route("/speak", post(handlers::speak::speak))
        .route("/stop", post(handlers::speak::stop))
        .route("/replay", post(handlers::speak::replay))
        .route("/status", get(handlers::speak::status))
        // Profile API
        .route("/profile/current", get(handlers::profiles::current))
        .route("/profile/list", get(handlers::profiles::list))
        .route("/profile/load", post(handlers::profiles::load))
        // Engine API
        .route("/health", get(handlers::engine::health))
        .route("/speakers", get(handlers::engine::speakers))
}

/// Build the full application router with CORS and state applied.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(build_cors_layer(cors))
        .with_state(state)
}
