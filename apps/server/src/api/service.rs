use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::{main_lib::AppState, models::ServiceInfo};

const ENDPOINTS: [&str; 5] = ["/track", "/health", "/pixel.js", "/static/pixel.js", "/openapi.json"];

#[utoipa::path(get, path = "/", responses((status = 200, body = ServiceInfo)))]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "PixelRelay Universal Pixel Tracking Server".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "active".to_string(),
        webhook_enabled: state.webhook_active,
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
    })
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(service_info))
}
