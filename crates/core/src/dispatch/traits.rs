//! Dispatch traits.

use super::model::DeliveryReport;
use crate::tracking::TrackedEvent;

/// Hands a tracked event to the downstream webhook.
///
/// # Design Rules
///
/// - `dispatch()` returns before the delivery settles; it must never block
///   the caller on network I/O
/// - Delivery failures are reported out-of-band, never returned
/// - Exactly one attempt is made per call; there is no retry
pub trait EventDispatcher: Send + Sync {
    fn dispatch(&self, event: TrackedEvent);
}

/// Observability sink for terminal delivery outcomes.
pub trait DeliveryReporter: Send + Sync {
    fn report(&self, report: DeliveryReport);
}
