use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use pixelrelay_core::beacon::BeaconConfig;
use pixelrelay_core::constants::{
    DEFAULT_BEACON_FALLBACK_MS, DEFAULT_WEBHOOK_TIMEOUT_MS, MAX_BEACON_FALLBACK_MS,
};
use pixelrelay_core::dispatch::WebhookConfig;

/// Process configuration, read once at start-up and never mutated.
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub webhook: WebhookConfig,
    pub beacon: BeaconConfig,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            webhook: WebhookConfig::default(),
            beacon: BeaconConfig::default(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            static_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match non_empty_var("PIXEL_LISTEN_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid PIXEL_LISTEN_ADDR '{}'", raw))?,
            None => defaults.listen_addr,
        };

        let webhook = WebhookConfig {
            url: non_empty_var("PIXEL_WEBHOOK_URL"),
            timeout: Duration::from_millis(millis_var(
                "PIXEL_WEBHOOK_TIMEOUT_MS",
                DEFAULT_WEBHOOK_TIMEOUT_MS,
            )),
            enabled: non_empty_var("PIXEL_WEBHOOK_ENABLED")
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(true),
        };
        webhook.validate().context("Invalid PIXEL_WEBHOOK_URL")?;

        let beacon = BeaconConfig {
            endpoint: non_empty_var("PIXEL_BEACON_ENDPOINT").unwrap_or(defaults.beacon.endpoint),
            fallback_interval: Duration::from_millis(fallback_ms(millis_var(
                "PIXEL_BEACON_FALLBACK_MS",
                DEFAULT_BEACON_FALLBACK_MS,
            ))),
            debug: non_empty_var("PIXEL_BEACON_DEBUG")
                .and_then(|raw| parse_flag(&raw))
                .unwrap_or(false),
        };
        beacon.validate().context("Invalid PIXEL_BEACON_ENDPOINT")?;

        let cors_allow = std::env::var("PIXEL_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            webhook,
            beacon,
            cors_allow,
            request_timeout: Duration::from_millis(millis_var("PIXEL_REQUEST_TIMEOUT_MS", 30_000)),
            static_dir: non_empty_var("PIXEL_STATIC_DIR"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn millis_var(key: &str, default: u64) -> u64 {
    non_empty_var(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

fn fallback_ms(requested: u64) -> u64 {
    if requested > MAX_BEACON_FALLBACK_MS {
        tracing::warn!(
            "PIXEL_BEACON_FALLBACK_MS={} exceeds the browser timer limit, using {}",
            requested,
            MAX_BEACON_FALLBACK_MS
        );
    }
    requested.min(MAX_BEACON_FALLBACK_MS)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
