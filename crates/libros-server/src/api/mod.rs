pub mod response;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;

use crate::audit::{AuditLayer, AuditService};
use crate::config::Config;
use crate::db;
use crate::features;
use crate::middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub audit: AuditService,
}

/// Create the application router with all routes and middleware
///
/// `business` carries the inventory routes (books, users, auth) mounted
/// under `/api/v1` next to the audit reporting routes. The audit layer wraps
/// all of them when enabled; it is applied innermost so it sees
/// uncompressed bodies.
pub fn create_router(state: AppState, config: &Config, business: Router) -> Router {
    let feature_state = features::FeatureState {
        audit: state.audit.clone(),
    };

    let mut api_v1 = features::router(feature_state).merge(business);
    if config.audit.enabled {
        api_v1 = api_v1.layer(AuditLayer::new(state.audit.clone()));
    }

    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", api_v1)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(state): State<AppState>) -> Result<Response, StatusCode> {
    match db::health_check(&state.db).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}
