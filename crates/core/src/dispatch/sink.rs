//! Dispatcher and reporter implementations that need no network.

use std::sync::{Arc, Mutex};

use log::{info, warn};

use super::model::DeliveryReport;
use super::traits::{DeliveryReporter, EventDispatcher};
use crate::tracking::TrackedEvent;

/// Discards every event. Used when no webhook is configured at all.
#[derive(Clone, Default)]
pub struct NoOpDispatcher;

impl EventDispatcher for NoOpDispatcher {
    fn dispatch(&self, _event: TrackedEvent) {}
}

/// Mock dispatcher for testing - collects dispatched events.
#[derive(Clone, Default)]
pub struct MockDispatcher {
    events: Arc<Mutex<Vec<TrackedEvent>>>,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }
}

impl EventDispatcher for MockDispatcher {
    fn dispatch(&self, event: TrackedEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Writes delivery outcomes to the `log` facade.
#[derive(Clone, Default)]
pub struct LogDeliveryReporter;

impl DeliveryReporter for LogDeliveryReporter {
    fn report(&self, report: DeliveryReport) {
        if report.outcome.is_success() {
            info!(
                "[Webhook] delivery {} for client={} page={} {} in {}ms",
                report.delivery_id,
                report.client_id,
                report.page_url,
                report.outcome,
                report.elapsed.as_millis()
            );
        } else {
            warn!(
                "[Webhook] delivery {} for client={} page={} {} after {}ms",
                report.delivery_id,
                report.client_id,
                report.page_url,
                report.outcome,
                report.elapsed.as_millis()
            );
        }
    }
}

/// Mock reporter for testing - collects delivery reports.
#[derive(Clone, Default)]
pub struct MockDeliveryReporter {
    reports: Arc<Mutex<Vec<DeliveryReport>>>,
}

impl MockDeliveryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected reports.
    pub fn reports(&self) -> Vec<DeliveryReport> {
        self.reports.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().unwrap().is_empty()
    }
}

impl DeliveryReporter for MockDeliveryReporter {
    fn report(&self, report: DeliveryReport) {
        self.reports.lock().unwrap().push(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DeliveryOutcome;
    use crate::tracking::{normalize, RawTrackInput};
    use chrono::Utc;
    use std::time::Duration;
    use uuid::Uuid;

    #[test]
    fn test_mock_dispatcher_collects_events() {
        let dispatcher = MockDispatcher::new();
        assert!(dispatcher.is_empty());

        let event = normalize(&RawTrackInput::default(), Utc::now());
        dispatcher.dispatch(event.clone());
        dispatcher.dispatch(event.clone());

        assert_eq!(dispatcher.len(), 2);
        assert_eq!(dispatcher.events()[0], event);
    }

    #[test]
    fn test_reporters_accept_every_outcome() {
        let mock = MockDeliveryReporter::new();
        let outcomes = [
            DeliveryOutcome::Delivered { status: 200 },
            DeliveryOutcome::Rejected { status: 503 },
            DeliveryOutcome::TimedOut { after: Duration::from_millis(5) },
            DeliveryOutcome::TransportError { message: "dns error".into() },
        ];
        for outcome in outcomes {
            let report = DeliveryReport {
                delivery_id: Uuid::new_v4(),
                client_id: "a.com".into(),
                page_url: "https://a.com".into(),
                outcome,
                elapsed: Duration::from_millis(3),
            };
            LogDeliveryReporter.report(report.clone());
            mock.report(report);
        }
        assert_eq!(mock.len(), 4);
        assert!(mock.reports()[0].outcome.is_success());
    }
}
