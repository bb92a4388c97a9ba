//! Per-page-load beacon session.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::debug;

use super::model::{BeaconConfig, BeaconRequest, BeaconState, Trigger};
use crate::constants::UNKNOWN;
use crate::errors::Result;
use crate::tracking::{host_of, EventKind};

/// Sends a beacon request. Fire-and-forget: the page never sees a response.
pub trait BeaconTransport {
    fn send(&self, request: &BeaconRequest) -> Result<()>;
}

/// Beacon state for one page load.
///
/// Created when the script loads (`ARMED`) and moved to `SENT` by the first
/// leaving signal. Transitions take `&mut self`; the browser runs every
/// callback on one thread, so the state flag needs no locking.
#[derive(Clone, Debug)]
pub struct BeaconSession {
    start_time: DateTime<Utc>,
    client_id: String,
    page_url: String,
    user_device: String,
    state: BeaconState,
}

impl BeaconSession {
    /// Arms a session for the page at `page_url`.
    ///
    /// The client id is the page's own hostname, resolved once here and
    /// independent of how the server later resolves identities.
    pub fn arm(
        page_url: impl Into<String>,
        user_device: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let page_url = page_url.into();
        let client_id = host_of(&page_url).unwrap_or_else(|| UNKNOWN.to_string());
        debug!("[Beacon] armed for domain: {}", client_id);

        Self {
            start_time: now,
            client_id,
            page_url,
            user_device: user_device.into(),
            state: BeaconState::Armed,
        }
    }

    pub fn state(&self) -> BeaconState {
        self.state
    }

    pub fn is_sent(&self) -> bool {
        self.state == BeaconState::Sent
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// When the fallback timer armed at load time elapses.
    pub fn fallback_due_at(&self, config: &BeaconConfig) -> DateTime<Utc> {
        let interval = ChronoDuration::from_std(config.fallback_interval)
            .unwrap_or(ChronoDuration::MAX);
        self.start_time
            .checked_add_signed(interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Fires [`Trigger::FallbackTimer`] if `now` is past the fallback deadline.
    pub fn poll_fallback<T>(
        &mut self,
        config: &BeaconConfig,
        now: DateTime<Utc>,
        transport: &T,
    ) -> Option<BeaconRequest>
    where
        T: BeaconTransport + ?Sized,
    {
        if now < self.fallback_due_at(config) {
            return None;
        }
        self.on_trigger(Trigger::FallbackTimer, now, transport)
    }

    /// The emit-once transition.
    ///
    /// The first leaving signal marks the session `SENT` and hands one request
    /// to `transport`; the returned request is what was sent. Every call after
    /// that, and any non-leaving signal, returns `None` without side effects.
    /// A transport failure is logged and swallowed; the session stays `SENT`.
    pub fn on_trigger<T>(
        &mut self,
        trigger: Trigger,
        now: DateTime<Utc>,
        transport: &T,
    ) -> Option<BeaconRequest>
    where
        T: BeaconTransport + ?Sized,
    {
        if !trigger.is_leaving_signal() {
            return None;
        }
        if self.state == BeaconState::Sent {
            debug!("[Beacon] already sent, skipping {:?}", trigger);
            return None;
        }
        self.state = BeaconState::Sent;

        let request = BeaconRequest {
            client_id: self.client_id.clone(),
            page_url: self.page_url.clone(),
            event_time: self.start_time,
            time_spent_seconds: rounded_seconds(now - self.start_time),
            user_device: self.user_device.clone(),
            event: EventKind::PageView,
        };

        match transport.send(&request) {
            Ok(()) => debug!(
                "[Beacon] sent on {:?}: {}s on {}",
                trigger, request.time_spent_seconds, request.page_url
            ),
            Err(e) => debug!("[Beacon] error sending beacon: {}", e),
        }

        Some(request)
    }
}

/// Whole seconds, rounded half up; clock skew below zero reads as 0.
fn rounded_seconds(elapsed: ChronoDuration) -> u64 {
    let millis = elapsed.num_milliseconds().max(0) as u64;
    (millis + 500) / 1000
}
