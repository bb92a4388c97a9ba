use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement returned by `/track` once the event is accepted.
///
/// Sent before (or while) the webhook delivery runs, so it says nothing
/// about the downstream outcome.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct TrackResponse {
    pub success: bool,
    /// Event kind the request was recorded as, e.g. `page_view`.
    pub tracked: String,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub status: String,
    pub webhook_enabled: bool,
    pub endpoints: Vec<String>,
}
