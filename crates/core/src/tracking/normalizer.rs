//! Event Normalizer.
//!
//! Every attribute of [`TrackedEvent`] is resolved from an ordered list of
//! named sources; the first non-blank one wins. Query parameters beat body
//! fields, which beat header-derived values, which beat sentinels.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::client_id::resolve_client_id;
use super::model::{EventKind, RawTrackInput, TrackedEvent};
use crate::constants::UNKNOWN;

/// Builds the canonical record for one tracking request.
///
/// `received_at` is the server receipt time; it becomes
/// `serverTimestampUtc` and stands in for a missing or unparseable client
/// event time.
pub fn normalize(input: &RawTrackInput, received_at: DateTime<Utc>) -> TrackedEvent {
    let query = &input.query;
    let body = &input.body;

    let page_url = first_present([
        query.url.as_deref(),
        query.page_url.as_deref(),
        body.url.as_deref(),
        body.page_url.as_deref(),
        input.referer.as_deref(),
    ])
    .unwrap_or(UNKNOWN)
    .to_string();

    let event_time_utc = first_present([
        query.time.as_deref(),
        query.event_time.as_deref(),
        body.time.as_deref(),
        body.event_time.as_deref(),
    ])
    .and_then(parse_event_time)
    .unwrap_or(received_at);

    let time_spent_seconds = first_present([
        query.time_spent.as_deref(),
        query.time_spent_seconds.as_deref(),
        body.time_spent.as_deref(),
        body.time_spent_seconds.as_deref(),
    ])
    .map(parse_time_spent)
    .unwrap_or(0);

    let user_device = first_present([
        query.device.as_deref(),
        query.user_device.as_deref(),
        body.device.as_deref(),
        body.user_device.as_deref(),
        input.user_agent.as_deref(),
    ])
    .unwrap_or(UNKNOWN)
    .to_string();

    let explicit_client = first_present([
        query.client.as_deref(),
        query.client_id.as_deref(),
        body.client.as_deref(),
        body.client_id.as_deref(),
    ]);
    let client_id = resolve_client_id(explicit_client, input.referer.as_deref());

    let event_kind = first_present([query.event.as_deref(), body.event.as_deref()])
        .map(EventKind::from)
        .unwrap_or_default();

    TrackedEvent {
        event_kind,
        client_id,
        source_ip: source_ip(input),
        page_url,
        event_time_utc,
        time_spent_seconds,
        user_device,
        server_timestamp_utc: received_at,
        user_agent: input.user_agent.clone(),
        referer: input.referer.clone(),
    }
}

/// First entry of `X-Forwarded-For`, then the peer address.
fn source_ip(input: &RawTrackInput) -> String {
    let forwarded = input
        .forwarded_for
        .as_deref()
        .and_then(|chain| chain.split(',').next());

    first_present([forwarded, input.remote_addr.as_deref()])
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn first_present<'a, const N: usize>(sources: [Option<&'a str>; N]) -> Option<&'a str> {
    sources
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Parses a time-on-page value in seconds.
///
/// Integers are taken as-is, decimals are truncated, and a leading run of
/// digits is accepted on its own (`"42s"` is 42). Negative values clamp to 0
/// and anything else is 0.
pub fn parse_time_spent(raw: &str) -> u64 {
    let raw = raw.trim();

    if let Ok(value) = raw.parse::<i64>() {
        return value.max(0) as u64;
    }
    if let Ok(value) = raw.parse::<f64>() {
        // `as` saturates, so huge values pin to u64::MAX.
        return if value.is_finite() && value > 0.0 {
            value.trunc() as u64
        } else {
            0
        };
    }

    let digits: String = raw.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().unwrap_or(0)
}

/// Parses a client-reported event time.
///
/// Accepts epoch milliseconds or an ISO-8601 timestamp. Timestamps without an
/// offset are read as UTC. Returns `None` for anything else, including epoch
/// values outside the representable range.
pub fn parse_event_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(millis) = raw.parse::<i64>() {
        return DateTime::<Utc>::from_timestamp_millis(millis);
    }
    if let Ok(millis) = raw.parse::<f64>() {
        if millis.is_finite() {
            return DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64);
        }
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
