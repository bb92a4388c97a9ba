use std::sync::Arc;

use crate::{api::script::render_beacon_script, config::Config};
use pixelrelay_core::dispatch::{DeliveryReporter, EventDispatcher, LogDeliveryReporter};
use pixelrelay_webhook::WebhookDispatcher;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    /// Receives every normalized event; never awaited on the request path.
    pub dispatcher: Arc<dyn EventDispatcher>,
    /// `pixel.js`, rendered once from the beacon configuration.
    pub beacon_script: String,
    pub webhook_active: bool,
}

impl AppState {
    /// State with an arbitrary dispatcher; `build_state` wires the real one.
    pub fn new(config: &Config, dispatcher: Arc<dyn EventDispatcher>) -> Self {
        Self {
            dispatcher,
            beacon_script: render_beacon_script(&config.beacon),
            webhook_active: config.webhook.destination().is_some(),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("PIXEL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_reporter(config, Arc::new(LogDeliveryReporter)).await
}

/// Like [`build_state`], with delivery outcomes sent to `reporter`.
pub async fn build_state_with_reporter(
    config: &Config,
    reporter: Arc<dyn DeliveryReporter>,
) -> anyhow::Result<Arc<AppState>> {
    let dispatcher = WebhookDispatcher::new(config.webhook.clone(), reporter)?;

    match config.webhook.destination() {
        Some(url) => tracing::info!(
            "Webhook dispatch enabled: {} (timeout {}ms)",
            url,
            config.webhook.timeout.as_millis()
        ),
        None if !config.webhook.enabled => tracing::info!("Webhook dispatch disabled"),
        None => tracing::warn!("No webhook URL configured; tracked events are only logged"),
    }
    tracing::info!(
        "Beacon endpoint: {} (fallback {}ms)",
        config.beacon.endpoint,
        config.beacon.fallback_interval.as_millis()
    );

    Ok(Arc::new(AppState::new(config, Arc::new(dispatcher))))
}
