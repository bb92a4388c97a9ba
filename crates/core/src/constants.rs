/// Sentinel used when no value can be determined for a string field.
pub const UNKNOWN: &str = "unknown";

/// Sentinel client id for a referrer that is present but not a usable URL.
pub const UNKNOWN_DOMAIN: &str = "unknown-domain";

/// Event tag used when the caller does not name one.
pub const PAGE_VIEW: &str = "page_view";

/// Default deadline for a single webhook delivery.
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 5_000;

/// Default interval after which the beacon fires on pages that stay open.
pub const DEFAULT_BEACON_FALLBACK_MS: u64 = 30_000;

/// Largest delay browsers honor in `setTimeout` (2^31 - 1 ms); larger values
/// fire immediately.
pub const MAX_BEACON_FALLBACK_MS: u64 = i32::MAX as u64;
