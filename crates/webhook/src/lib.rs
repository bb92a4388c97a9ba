//! PixelRelay Webhook - delivers tracked events to a downstream webhook.
//!
//! [`WebhookDispatcher`] implements [`pixelrelay_core::dispatch::EventDispatcher`]
//! on top of `reqwest` and the tokio runtime. Each dispatch becomes one
//! detached task holding one POST request bounded by the configured timeout.

mod dispatcher;

pub use dispatcher::WebhookDispatcher;
