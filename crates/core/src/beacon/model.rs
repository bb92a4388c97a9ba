//! Beacon domain models.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::constants::DEFAULT_BEACON_FALLBACK_MS;
use crate::errors::{Error, Result};
use crate::tracking::EventKind;

/// Settings baked into the beacon script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconConfig {
    /// Absolute URL of the `/track` endpoint the beacon reports to.
    pub endpoint: String,
    /// How long a page may stay open before the beacon fires on its own.
    pub fallback_interval: Duration,
    /// Emit console diagnostics from the script.
    pub debug: bool,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/track".to_string(),
            fallback_interval: Duration::from_millis(DEFAULT_BEACON_FALLBACK_MS),
            debug: false,
        }
    }
}

impl BeaconConfig {
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.endpoint).map(|_| ()).map_err(|e| {
            Error::InvalidConfigValue(format!("beacon endpoint '{}': {}", self.endpoint, e))
        })
    }
}

/// Lifecycle state of a [`super::BeaconSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeaconState {
    Armed,
    Sent,
}

/// External signals that may cause the beacon to fire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trigger {
    /// The page is being unloaded (navigation away, tab or window close).
    PageUnload,
    /// The document's visibility changed. Only `hidden: true` counts as
    /// leaving the page.
    VisibilityChange { hidden: bool },
    /// The fallback timer elapsed while the page stayed open.
    FallbackTimer,
}

impl Trigger {
    pub fn is_leaving_signal(&self) -> bool {
        match self {
            Trigger::PageUnload | Trigger::FallbackTimer => true,
            Trigger::VisibilityChange { hidden } => *hidden,
        }
    }
}

/// The single request a beacon emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeaconRequest {
    pub client_id: String,
    pub page_url: String,
    /// Page load time, as reported by the browser.
    pub event_time: DateTime<Utc>,
    pub time_spent_seconds: u64,
    pub user_device: String,
    pub event: EventKind,
}

impl BeaconRequest {
    /// Query parameters in the order the script sends them.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("clientId", self.client_id.clone()),
            ("pageURL", self.page_url.clone()),
            (
                "eventTime",
                self.event_time.to_rfc3339_opts(SecondsFormat::Millis, true),
            ),
            ("timeSpentSeconds", self.time_spent_seconds.to_string()),
            ("userDevice", self.user_device.clone()),
            ("event", self.event.to_string()),
        ]
    }

    /// Full GET URL for the tracking endpoint.
    pub fn to_url(&self, endpoint: &str) -> Result<Url> {
        let mut url = Url::parse(endpoint).map_err(|e| {
            Error::InvalidConfigValue(format!("beacon endpoint '{}': {}", endpoint, e))
        })?;
        url.query_pairs_mut().extend_pairs(self.query_pairs());
        Ok(url)
    }
}
