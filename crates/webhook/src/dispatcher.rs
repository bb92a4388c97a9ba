//! Webhook dispatcher backed by reqwest.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;
use pixelrelay_core::dispatch::{
    DeliveryOutcome, DeliveryReport, DeliveryReporter, EventDispatcher, WebhookConfig,
};
use pixelrelay_core::errors::{Error, Result};
use pixelrelay_core::TrackedEvent;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

const USER_AGENT: &str = concat!("pixelrelay/", env!("CARGO_PKG_VERSION"));

/// Relays tracked events to the configured webhook without blocking callers.
///
/// Holds only start-up configuration plus a pooled HTTP client, so one
/// instance is shared by every request handler.
///
/// # Example
///
/// ```ignore
/// let dispatcher = WebhookDispatcher::new(config, Arc::new(LogDeliveryReporter))?;
/// dispatcher.dispatch(event); // returns immediately
/// ```
pub struct WebhookDispatcher {
    config: WebhookConfig,
    client: reqwest::Client,
    reporter: Arc<dyn DeliveryReporter>,
    runtime: Handle,
}

impl WebhookDispatcher {
    /// Create a dispatcher on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the webhook URL is invalid, if called outside a
    /// tokio runtime, or if the HTTP client cannot be initialized.
    pub fn new(config: WebhookConfig, reporter: Arc<dyn DeliveryReporter>) -> Result<Self> {
        config.validate()?;

        let runtime = Handle::try_current()
            .map_err(|e| Error::Unexpected(format!("No tokio runtime for webhook tasks: {}", e)))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            reporter,
            runtime,
        })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }

    /// Starts one delivery in the background.
    ///
    /// Returns `None` when dispatch is disabled or no URL is configured.
    /// The handle resolves to the same report the [`DeliveryReporter`]
    /// receives; the request path never awaits it.
    pub fn spawn_delivery(&self, event: TrackedEvent) -> Option<JoinHandle<DeliveryReport>> {
        let Some(url) = self.config.destination() else {
            debug!(
                "[Webhook] dispatch disabled, dropping event for client={}",
                event.client_id
            );
            return None;
        };

        let url = url.to_string();
        let client = self.client.clone();
        let reporter = self.reporter.clone();
        let timeout = self.config.timeout;

        Some(self.runtime.spawn(async move {
            let delivery_id = Uuid::new_v4();
            let started = Instant::now();
            debug!("[Webhook] delivery {} POST {}", delivery_id, url);

            let outcome = deliver(&client, &url, timeout, &event).await;
            let report = DeliveryReport {
                delivery_id,
                client_id: event.client_id,
                page_url: event.page_url,
                outcome,
                elapsed: started.elapsed(),
            };
            reporter.report(report.clone());
            report
        }))
    }
}

impl EventDispatcher for WebhookDispatcher {
    fn dispatch(&self, event: TrackedEvent) {
        // Detached: dropping the JoinHandle does not cancel the task.
        let _ = self.spawn_delivery(event);
    }
}

/// One POST with a deadline. On expiry the request future is dropped, which
/// aborts the in-flight connection.
async fn deliver(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    event: &TrackedEvent,
) -> DeliveryOutcome {
    let request = client.post(url).json(event).send();

    match tokio::time::timeout(timeout, request).await {
        Err(_elapsed) => DeliveryOutcome::TimedOut { after: timeout },
        Ok(Err(e)) if e.is_timeout() => DeliveryOutcome::TimedOut { after: timeout },
        Ok(Err(e)) => DeliveryOutcome::TransportError {
            message: e.to_string(),
        },
        Ok(Ok(response)) => DeliveryOutcome::from_status(response.status().as_u16()),
    }
}
