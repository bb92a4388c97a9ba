//! Ingestion endpoint.
//!
//! Decode the request, normalize it, log it, hand it to the dispatcher and
//! answer. The dispatcher returns immediately, so the response never waits on
//! the webhook and never reflects its outcome.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    http::{header, request::Parts, HeaderMap},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use pixelrelay_core::tracking::normalize;
use pixelrelay_core::{RawTrackInput, TrackFields, TrackedEvent};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::TrackResponse,
};

/// Tracking payloads are a handful of short fields.
const MAX_BODY_BYTES: usize = 64 * 1024;

#[utoipa::path(
    get,
    path = "/track",
    params(
        ("url" = Option<String>, Query, description = "Tracked page URL (alias: pageURL)"),
        ("time" = Option<String>, Query, description = "Epoch milliseconds or ISO-8601 capture time (alias: eventTime)"),
        ("timeSpent" = Option<String>, Query, description = "Seconds spent on the page (alias: timeSpentSeconds)"),
        ("device" = Option<String>, Query, description = "Device label (alias: userDevice)"),
        ("client" = Option<String>, Query, description = "Client identifier (alias: clientId)"),
        ("event" = Option<String>, Query, description = "Event kind, defaults to page_view")
    ),
    responses(
        (status = 200, body = TrackResponse),
        (status = 500, description = "Request could not be processed")
    )
)]
pub async fn track_get(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> ApiResult<Json<TrackResponse>> {
    ingest(&state, request).await
}

/// Same as `GET /track`, with the fields optionally carried in a JSON or
/// form-encoded body. Query parameters take precedence over body fields.
#[utoipa::path(
    post,
    path = "/track",
    responses(
        (status = 200, body = TrackResponse),
        (status = 500, description = "Request body could not be decoded")
    )
)]
pub async fn track_post(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> ApiResult<Json<TrackResponse>> {
    ingest(&state, request).await
}

async fn ingest(state: &AppState, request: Request) -> ApiResult<Json<TrackResponse>> {
    let received_at = Utc::now();
    let (parts, body) = request.into_parts();
    let input = raw_input(&parts, body).await?;

    let event = normalize(&input, received_at);
    log_event(&event);

    let tracked = event.event_kind.to_string();
    state.dispatcher.dispatch(event);

    Ok(Json(TrackResponse {
        success: true,
        tracked,
    }))
}

async fn raw_input(parts: &Parts, body: Body) -> ApiResult<RawTrackInput> {
    let headers = &parts.headers;

    Ok(RawTrackInput {
        query: parts
            .uri
            .query()
            .map(TrackFields::from_query_string)
            .unwrap_or_default(),
        body: body_fields(headers, body).await?,
        user_agent: header_string(headers, header::USER_AGENT),
        referer: header_string(headers, header::REFERER),
        forwarded_for: header_string(headers, "x-forwarded-for"),
        remote_addr: parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string()),
    })
}

async fn body_fields(headers: &HeaderMap, body: Body) -> ApiResult<TrackFields> {
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read request body: {}", e)))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(TrackFields::default());
    }

    let is_form = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        return Ok(TrackFields::from_query_string(&String::from_utf8_lossy(&bytes)));
    }

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
    TrackFields::from_json(&value)
        .ok_or_else(|| ApiError::MalformedBody("expected a JSON object".to_string()))
}

/// Header values are opaque bytes; browsers send UTF-8 in `Referer` and
/// `User-Agent`, so decode lossily rather than dropping non-ASCII values.
fn header_string<K: header::AsHeaderName>(headers: &HeaderMap, key: K) -> Option<String> {
    headers
        .get(key)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// The structured log record for every tracked event.
fn log_event(event: &TrackedEvent) {
    tracing::info!(
        target: "pixelrelay::track",
        event_kind = %event.event_kind,
        client_id = %event.client_id,
        source_ip = %event.source_ip,
        page_url = %event.page_url,
        event_time = %event.event_time_utc.to_rfc3339(),
        time_spent_seconds = event.time_spent_seconds,
        user_device = %event.user_device,
        server_timestamp = %event.server_timestamp_utc.to_rfc3339(),
        user_agent = event.user_agent.as_deref(),
        referer = event.referer.as_deref(),
        "page event tracked"
    );
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/track", get(track_get).post(track_post))
}
