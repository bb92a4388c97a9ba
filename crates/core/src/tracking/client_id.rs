//! Client Identifier Resolver.

use url::Url;

use crate::constants::{UNKNOWN, UNKNOWN_DOMAIN};

/// Resolves the identity of the site that sent a tracking request.
///
/// Precedence:
/// 1. `explicit` (the `client`/`clientId` parameter) when non-blank
/// 2. hostname of `referer` when it parses as an absolute URL with a host
/// 3. `"unknown-domain"` when a referrer is present but unusable
/// 4. `"unknown"` when neither signal exists
pub fn resolve_client_id(explicit: Option<&str>, referer: Option<&str>) -> String {
    if let Some(client) = non_blank(explicit) {
        return client.to_string();
    }

    match non_blank(referer) {
        Some(referer) => host_of(referer).unwrap_or_else(|| UNKNOWN_DOMAIN.to_string()),
        None => UNKNOWN.to_string(),
    }
}

/// Hostname of an absolute URL, or `None` if it does not parse or has no host.
pub fn host_of(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    url.host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
