//! Core error types for PixelRelay.
//!
//! Malformed tracking input never produces an error: the normalizer degrades
//! it to sentinels. The variants here cover configuration and the transports
//! that sit at the edges of the domain.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the tracking domain.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Beacon transport failed: {0}")]
    BeaconTransport(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
