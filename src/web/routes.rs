//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{routing::get, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Create the application router: search routes, then the static site
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let search_path = state.settings.server.search_path.trim_end_matches('/').to_string();
    let suggest_path = format!("{}/suggest", search_path);
    let site = ServeDir::new(&state.settings.site.root);

    Router::new()
        // Search routes
        .route(&search_path, get(handlers::search))
        .route(&suggest_path, get(handlers::suggest))
        // API routes
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        // Everything else is the documentation site itself
        .fallback_service(site)
        // Add middleware
        .layer(cors)
        .layer(CompressionLayer::new())
        // Add state
        .with_state(state)
}
