//! Router configuration for the web API.

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::dto::HealthResponse;
use super::handlers::{category_entries, feed_entries, get_entry, unread, update_status, AppState};
use super::middleware::{jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, jwt_state: Arc<JwtState>) -> Router {
    let entry_routes = Router::new()
        .route("/unread", get(unread))
        .route("/entries/status", post(update_status))
        .route("/entries/:id", get(get_entry))
        .route("/feeds/:id/entries", get(feed_entries))
        .route("/categories/:id/entries", get(category_entries));

    Router::new()
        .nest("/api", entry_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
        .merge(create_health_router())
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
