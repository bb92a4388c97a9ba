//! Tracking module.
//!
//! Turns the loosely shaped input of a beacon request into one canonical
//! [`TrackedEvent`].
//!
//! ```text
//! query string ─┐
//! JSON body ────┼─> RawTrackInput ──normalize()──> TrackedEvent
//! headers ──────┘          │
//!                          └─ resolve_client_id() (client param / Referer)
//! ```
//!
//! - **Models** (`model.rs`) - `TrackedEvent`, `EventKind`, raw input holders
//! - **Client id** (`client_id.rs`) - Client Identifier Resolver
//! - **Normalizer** (`normalizer.rs`) - field coalescing and permissive parsing
//!
//! Nothing in here fails on bad input. Unusable values are replaced by
//! sentinels ([`crate::constants::UNKNOWN`], [`crate::constants::UNKNOWN_DOMAIN`])
//! or by server-side defaults.

mod client_id;
mod model;
mod normalizer;

pub use client_id::{host_of, resolve_client_id};
pub use model::{EventKind, RawTrackInput, TrackFields, TrackedEvent};
pub use normalizer::{normalize, parse_event_time, parse_time_spent};
