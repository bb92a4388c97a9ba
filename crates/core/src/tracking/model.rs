//! Tracking domain models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::PAGE_VIEW;

/// Kind of tracked event.
///
/// Beacons only ever send `page_view`, but callers of `/track` may tag their
/// own events; those tags are kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    #[default]
    PageView,
    Custom(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::PageView => PAGE_VIEW,
            EventKind::Custom(tag) => tag,
        }
    }
}

impl From<String> for EventKind {
    fn from(tag: String) -> Self {
        match tag.trim() {
            "" | PAGE_VIEW => EventKind::PageView,
            other => EventKind::Custom(other.to_string()),
        }
    }
}

impl From<&str> for EventKind {
    fn from(tag: &str) -> Self {
        EventKind::from(tag.to_string())
    }
}

impl From<EventKind> for String {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::PageView => PAGE_VIEW.to_string(),
            EventKind::Custom(tag) => tag,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical page-visit record.
///
/// Built once per tracking request by [`super::normalize`] and never mutated
/// afterwards. This is also the exact JSON body posted to the webhook, so
/// every field is always serialized (`userAgent`/`referer` as `null` when the
/// headers were missing).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedEvent {
    pub event_kind: EventKind,
    pub client_id: String,
    pub source_ip: String,
    pub page_url: String,
    pub event_time_utc: DateTime<Utc>,
    pub time_spent_seconds: u64,
    pub user_device: String,
    pub server_timestamp_utc: DateTime<Utc>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
}

/// Tracking fields as sent by a caller, before any coalescing.
///
/// The same shape is filled from the query string and from an optional JSON
/// body. Each attribute has a short name (`url`, `time`, ...) and the long
/// name the beacon script uses (`pageURL`, `eventTime`, ...). When a key is
/// repeated the first occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackFields {
    pub url: Option<String>,
    pub page_url: Option<String>,
    pub time: Option<String>,
    pub event_time: Option<String>,
    pub time_spent: Option<String>,
    pub time_spent_seconds: Option<String>,
    pub device: Option<String>,
    pub user_device: Option<String>,
    pub client: Option<String>,
    pub client_id: Option<String>,
    pub event: Option<String>,
}

impl TrackFields {
    /// Parses an `application/x-www-form-urlencoded` string (a query string
    /// without the leading `?`, or a form body). Unknown keys are ignored.
    pub fn from_query_string(raw: &str) -> Self {
        let mut fields = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            fields.set(&key, value.into_owned());
        }
        fields
    }

    /// Reads fields from a JSON object. Strings, numbers and booleans are
    /// accepted as values; anything else counts as absent. Returns `None`
    /// when `value` is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut fields = Self::default();
        for (key, value) in object {
            let scalar = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            fields.set(key, scalar);
        }
        Some(fields)
    }

    fn set(&mut self, key: &str, value: String) {
        let slot = match key {
            "url" => &mut self.url,
            "pageURL" => &mut self.page_url,
            "time" => &mut self.time,
            "eventTime" => &mut self.event_time,
            "timeSpent" => &mut self.time_spent,
            "timeSpentSeconds" => &mut self.time_spent_seconds,
            "device" => &mut self.device,
            "userDevice" => &mut self.user_device,
            "client" => &mut self.client,
            "clientId" => &mut self.client_id,
            "event" => &mut self.event,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
}

/// Everything the normalizer may look at for one request.
#[derive(Clone, Debug, Default)]
pub struct RawTrackInput {
    pub query: TrackFields,
    pub body: TrackFields,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    /// Raw `X-Forwarded-For` header value.
    pub forwarded_for: Option<String>,
    /// Address of the TCP peer, when the transport exposes it.
    pub remote_addr: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_defaults_to_page_view() {
        assert_eq!(EventKind::default(), EventKind::PageView);
        assert_eq!(EventKind::from(""), EventKind::PageView);
        assert_eq!(EventKind::from(" page_view "), EventKind::PageView);
        assert_eq!(EventKind::from("signup"), EventKind::Custom("signup".into()));
    }

    #[test]
    fn test_event_kind_serializes_as_plain_tag() {
        assert_eq!(json!(EventKind::PageView), json!("page_view"));
        assert_eq!(json!(EventKind::Custom("purchase".into())), json!("purchase"));
        let parsed: EventKind = serde_json::from_value(json!("purchase")).unwrap();
        assert_eq!(parsed, EventKind::Custom("purchase".into()));
    }

    #[test]
    fn test_fields_from_query_string_decodes_and_keeps_first() {
        let fields = TrackFields::from_query_string(
            "pageURL=https%3A%2F%2Fa.com%2Fx%3Fy%3D1&timeSpentSeconds=12&clientId=a.com&clientId=b.com&extra=1",
        );
        assert_eq!(fields.page_url.as_deref(), Some("https://a.com/x?y=1"));
        assert_eq!(fields.time_spent_seconds.as_deref(), Some("12"));
        assert_eq!(fields.client_id.as_deref(), Some("a.com"));
        assert_eq!(fields.url, None);
    }

    #[test]
    fn test_fields_from_json_accepts_scalars_only() {
        let fields = TrackFields::from_json(&json!({
            "url": "https://a.com",
            "time": 1700000000000u64,
            "timeSpent": 4.5,
            "device": true,
            "client": {"nested": "ignored"},
            "event": null,
        }))
        .unwrap();
        assert_eq!(fields.url.as_deref(), Some("https://a.com"));
        assert_eq!(fields.time.as_deref(), Some("1700000000000"));
        assert_eq!(fields.time_spent.as_deref(), Some("4.5"));
        assert_eq!(fields.device.as_deref(), Some("true"));
        assert_eq!(fields.client, None);
        assert_eq!(fields.event, None);
    }

    #[test]
    fn test_fields_from_json_rejects_non_objects() {
        assert!(TrackFields::from_json(&json!([1, 2])).is_none());
        assert!(TrackFields::from_json(&json!("url")).is_none());
    }
}
