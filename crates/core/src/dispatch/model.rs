//! Dispatch domain models.

use std::fmt;
use std::time::Duration;

use url::Url;
use uuid::Uuid;

use crate::constants::DEFAULT_WEBHOOK_TIMEOUT_MS;
use crate::errors::{Error, Result};

/// Static webhook settings, fixed at start-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WebhookConfig {
    pub url: Option<String>,
    pub timeout: Duration,
    pub enabled: bool,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout: Duration::from_millis(DEFAULT_WEBHOOK_TIMEOUT_MS),
            enabled: true,
        }
    }
}

impl WebhookConfig {
    /// URL to deliver to, or `None` when dispatch is switched off or no
    /// destination is configured.
    pub fn destination(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Checks that a configured destination is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let Some(raw) = self.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) else {
            return Ok(());
        };

        let url = Url::parse(raw)
            .map_err(|e| Error::InvalidConfigValue(format!("webhook url '{}': {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(Error::InvalidConfigValue(format!(
                "webhook url '{}': unsupported scheme '{}'",
                raw, other
            ))),
        }
    }
}

/// Terminal result of one delivery attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The webhook answered with a 2xx status.
    Delivered { status: u16 },
    /// The webhook answered with any other status.
    Rejected { status: u16 },
    /// No response arrived before the deadline; the request was cancelled.
    TimedOut { after: Duration },
    /// The request never produced a response (DNS, connect, TLS, I/O).
    TransportError { message: String },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn from_status(status: u16) -> Self {
        if (200..300).contains(&status) {
            DeliveryOutcome::Delivered { status }
        } else {
            DeliveryOutcome::Rejected { status }
        }
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryOutcome::Delivered { status } => write!(f, "delivered (HTTP {})", status),
            DeliveryOutcome::Rejected { status } => write!(f, "rejected (HTTP {})", status),
            DeliveryOutcome::TimedOut { after } => {
                write!(f, "timed out after {}ms", after.as_millis())
            }
            DeliveryOutcome::TransportError { message } => {
                write!(f, "transport error: {}", message)
            }
        }
    }
}

/// What a [`super::DeliveryReporter`] receives once a delivery settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivery_id: Uuid,
    pub client_id: String,
    pub page_url: String,
    pub outcome: DeliveryOutcome,
    pub elapsed: Duration,
}
