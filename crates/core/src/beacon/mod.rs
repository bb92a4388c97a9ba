//! Beacon lifecycle module.
//!
//! Models the tracking beacon that runs once per page load in a visitor's
//! browser. The served `pixel.js` script implements the same machine; this
//! module is its reference model and the source of its configuration.
//!
//! ```text
//!            PageUnload
//!            VisibilityChange { hidden: true }
//!   ARMED ── FallbackTimer ──────────────────> SENT
//!                                              (every later trigger is a no-op)
//! ```
//!
//! Emission happens inside the single transition function
//! [`BeaconSession::on_trigger`], so whichever trigger fires first sends the
//! one and only beacon for the page load.

mod model;
mod session;

pub use model::{BeaconConfig, BeaconRequest, BeaconState, Trigger};
pub use session::{BeaconSession, BeaconTransport};
