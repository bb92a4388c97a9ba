use std::sync::Arc;

use axum::{routing::get, Json, Router};
use chrono::Utc;

use crate::{main_lib::AppState, models::HealthResponse};

/// Liveness probe. Independent of webhook configuration.
#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthResponse)))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
