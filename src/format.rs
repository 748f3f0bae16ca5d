//! Log events and their one-line textual rendering.

use axum::{
    extract::OriginalUri,
    http::{HeaderMap, Method, Request, StatusCode, Uri, header},
};
use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    colors::{bracketed_id, severity_label},
    severity::Severity,
};

/// Millisecond precision with a numeric offset, e.g. `2024-01-01T00:00:00.000+0000`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Placeholder rendered for missing fields.
const ABSENT: &str = "-";

/// Read-only view of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub method: String,
    /// Path and query as received, before any router nesting.
    pub original_url: String,
    pub user_agent: Option<String>,
}

impl RequestRecord {
    pub fn new(method: &Method, uri: &Uri, headers: &HeaderMap) -> Self {
        let header_text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };

        Self {
            method: method.to_string(),
            original_url: uri
                .path_and_query()
                .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
            user_agent: header_text(header::USER_AGENT),
        }
    }

    pub fn from_request<B>(req: &Request<B>) -> Self {
        let uri = req
            .extensions()
            .get::<OriginalUri>()
            .map_or(req.uri(), |original| &original.0);
        Self::new(req.method(), uri, req.headers())
    }
}

/// What a line is about. Each kind carries exactly one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    InboundRequest(RequestRecord),
    /// Text produced by [`response_line`].
    ResponseCompletion(String),
    PlainMessage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub severity: Severity,
    pub timestamp: DateTime<FixedOffset>,
    pub kind: EventKind,
    pub request_id: Option<String>,
}

impl LogEvent {
    /// Stamps a new event with the current UTC time.
    pub fn now(severity: Severity, kind: EventKind, request_id: Option<String>) -> Self {
        Self {
            severity,
            timestamp: Utc::now().fixed_offset(),
            kind,
            request_id,
        }
    }

    /// Message text for plain and response lines, `None` for inbound lines.
    pub fn message(&self) -> Option<&str> {
        match &self.kind {
            EventKind::InboundRequest(_) => None,
            EventKind::ResponseCompletion(text) | EventKind::PlainMessage(text) => Some(text),
        }
    }
}

/// Text of a response completion line: `"<METHOD> <url>" <status>`.
pub fn response_line(method: &str, url: &str, status: StatusCode) -> String {
    format!("\"{} {}\" {}", method, url, status.as_u16())
}

/// Renders `event` as a single line.
///
/// `colorize` only adds ANSI styling to the severity and the bracketed id.
pub fn format_line(event: &LogEvent, colorize: bool) -> String {
    let timestamp = event.timestamp.format(TIMESTAMP_FORMAT);
    let severity = severity_label(event.severity, colorize);
    let id = bracketed_id(event.request_id.as_deref().unwrap_or(ABSENT), colorize);

    match &event.kind {
        EventKind::InboundRequest(req) => format!(
            "[{}] {}: -> {} \"{} {}\" \"{}\"",
            timestamp,
            severity,
            id,
            req.method,
            req.original_url,
            req.user_agent.as_deref().unwrap_or(ABSENT)
        ),
        EventKind::ResponseCompletion(text) => {
            format!("[{}] {}: <- {} {}", timestamp, severity, id, text)
        }
        EventKind::PlainMessage(text) => {
            format!("[{}] {}: -- {} {}", timestamp, severity, id, text)
        }
    }
}
