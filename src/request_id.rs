//! Correlation id issuance.
//!
//! An upstream service that already tagged the request with
//! `dm-logger-req-id` is trusted and its id is reused as-is, which keeps one id
//! across internal hops. Otherwise a short nanoid is generated.

use axum::http::{HeaderMap, HeaderName};
use nanoid::nanoid;

/// Header carrying the correlation id, inbound and outbound.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("dm-logger-req-id");

/// Length of generated ids. 64^10 possible values keeps collisions negligible
/// for correlation purposes. Not suitable as a security token.
pub const GENERATED_ID_LEN: usize = 10;

/// Returns the trusted upstream id if present, a fresh one otherwise.
pub fn issue(headers: &HeaderMap) -> String {
    forwarded(headers).unwrap_or_else(generate)
}

/// The upstream id, when the header is present, non-empty and valid text.
pub fn forwarded(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

pub fn generate() -> String {
    nanoid!(GENERATED_ID_LEN)
}
