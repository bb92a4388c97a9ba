//! Webhook dispatch contracts.
//!
//! The request path hands every [`crate::TrackedEvent`] to an
//! [`EventDispatcher`] and moves on. Whatever happens to the delivery after
//! that is only visible through a [`DeliveryReporter`].
//!
//! - **Models** (`model.rs`) - `WebhookConfig`, `DeliveryOutcome`, `DeliveryReport`
//! - **Traits** (`traits.rs`) - `EventDispatcher`, `DeliveryReporter`
//! - **Sinks** (`sink.rs`) - no-op, logging and collecting implementations
//!
//! The network implementation lives in the `pixelrelay-webhook` crate.

mod model;
mod sink;
mod traits;

pub use model::{DeliveryOutcome, DeliveryReport, WebhookConfig};
pub use sink::{LogDeliveryReporter, MockDeliveryReporter, MockDispatcher, NoOpDispatcher};
pub use traits::{DeliveryReporter, EventDispatcher};
