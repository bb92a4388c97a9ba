//! PixelRelay Core - Tracking domain types, normalization and dispatch contracts.
//!
//! This crate holds everything that does not touch the network directly:
//! the canonical [`TrackedEvent`] record and how it is built from raw request
//! input, the beacon lifecycle model shipped to browsers, and the traits that
//! webhook delivery implementations plug into.

pub mod beacon;
pub mod constants;
pub mod dispatch;
pub mod errors;
pub mod tracking;

pub use tracking::{EventKind, RawTrackInput, TrackFields, TrackedEvent};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
