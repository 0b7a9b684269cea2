//! API layer - HTTP handlers and routing
//!
//! - Public recipe endpoints (published recipes, localized)
//! - Admin recipe endpoints (CRUD, completeness, publishing)

pub mod admin;
pub mod common;
pub mod i18n;
pub mod middleware;
pub mod recipes;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use middleware::{ApiError, AppState};

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/recipes", recipes::router())
        .nest("/admin", admin::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(cors_origin))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT_LANGUAGE]);

    Router::new()
        .nest("/api/v1", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /api/v1/health - database reachability
async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.pool.ping().await.map_err(|e| {
        tracing::error!("Health check failed: {:#}", e);
        ApiError::internal_error("Database unavailable")
    })?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

fn allow_origin(origin: &str) -> AllowOrigin {
    if origin == "*" {
        return AllowOrigin::any();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', cross-origin requests disabled", origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}
