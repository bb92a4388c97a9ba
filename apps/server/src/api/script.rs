//! Serves the browser beacon.

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use pixelrelay_core::beacon::BeaconConfig;

use crate::main_lib::AppState;

const TEMPLATE: &str = include_str!("../../assets/pixel.js");

/// Fills the script template with the beacon settings.
pub fn render_beacon_script(config: &BeaconConfig) -> String {
    // A JSON string literal is a valid JS string literal.
    let endpoint = serde_json::Value::String(config.endpoint.clone()).to_string();

    TEMPLATE
        .replace("__PIXEL_ENDPOINT__", &endpoint)
        .replace(
            "__PIXEL_FALLBACK_MS__",
            &config.fallback_interval.as_millis().to_string(),
        )
        .replace("__PIXEL_DEBUG__", if config.debug { "true" } else { "false" })
}

#[utoipa::path(
    get,
    path = "/pixel.js",
    responses((status = 200, description = "Beacon script", content_type = "application/javascript"))
)]
pub async fn beacon_script(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=utf-8"),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        state.beacon_script.clone(),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pixel.js", get(beacon_script))
        .route("/static/pixel.js", get(beacon_script))
}
