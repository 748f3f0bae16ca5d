//! Request logging middleware.

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::{HeaderName, HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::Instrument as _;

use crate::{
    body::{Completion, ScopedBody},
    context::{self, REQUEST_ID_KEY, RequestContext},
    handlers,
    format::{EventKind, LogEvent, RequestRecord, response_line},
    logger::{LevelChange, Logger},
    request_id::{self, REQUEST_ID_HEADER},
    severity::Severity,
};

/// Header that must match `level_override_token` when one is configured.
pub const LEVEL_TOKEN_HEADER: HeaderName = HeaderName::from_static("dm-logger-level-token");

#[derive(Debug, Deserialize)]
struct LevelOverride {
    set_log_level: Option<String>,
}

/// Middleware that correlates, classifies and logs every request
///
/// For each request it:
/// 1. Binds a fresh correlation context around the rest of the chain
/// 2. Reuses the upstream `dm-logger-req-id` or generates a short id
/// 3. Logs the inbound line (`debug` for assets, `notice` otherwise)
/// 4. Applies a `set_log_level` override when enabled
/// 5. Answers client messages posted to the intake path, or runs the app
/// 6. Echoes the id in the `dm-logger-req-id` response header
/// 7. Logs the completion line (`info` for assets, `notice` otherwise) once
///    the response body has been sent or dropped
pub async fn log_requests(State(logger): State<Logger>, req: Request, next: Next) -> Response {
    let ctx = RequestContext::new();
    context::scope(ctx.clone(), handle(logger, ctx, req, next)).await
}

async fn handle(logger: Logger, ctx: RequestContext, req: Request, next: Next) -> Response {
    let id = request_id::issue(req.headers());
    context::set(REQUEST_ID_KEY, id.clone());

    let record = RequestRecord::from_request(&req);
    let is_asset = logger.classifier().is_asset(&record.original_url);

    let method = record.method.clone();
    let url = record.original_url.clone();
    let inbound = if is_asset {
        Severity::Debug
    } else {
        Severity::Notice
    };
    emit(
        &logger,
        LogEvent::now(inbound, EventKind::InboundRequest(record), Some(id.clone())),
    );

    if logger.config().level_from_query {
        apply_level_override(&logger, &req);
    }

    let span = tracing::info_span!("request", req_id = %id);
    let mut response = if is_intake(&logger, &req) {
        handlers::client_message(&logger, req)
            .instrument(span)
            .await
            .into_response()
    } else {
        next.run(req).instrument(span).await
    };

    match HeaderValue::from_str(&id) {
        Ok(value) => {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(err) => tracing::debug!("correlation id is not a valid header value: {err}"),
    }

    let completed = if is_asset {
        Severity::Info
    } else {
        Severity::Notice
    };
    let completion = Completion {
        event: LogEvent::now(
            completed,
            EventKind::ResponseCompletion(response_line(&method, &url, response.status())),
            Some(id),
        ),
        logger,
    };

    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(ScopedBody::new(body, ctx, completion)))
}

fn is_intake(logger: &Logger, req: &Request) -> bool {
    req.method() == Method::POST
        && logger
            .config()
            .intake_path()
            .is_some_and(|path| req.uri().path() == path)
}

/// Framework lines are best effort: a sink failure is reported and dropped.
pub(crate) fn emit(logger: &Logger, event: LogEvent) {
    if let Err(err) = logger.emit(event) {
        tracing::error!("request line not logged: {err}");
    }
}

/// Handles `?set_log_level=<severity>`. Never fails the request: rejected or
/// redundant values only produce a diagnostic line.
fn apply_level_override(logger: &Logger, req: &Request) {
    let Ok(Query(LevelOverride {
        set_log_level: Some(raw),
    })) = Query::<LevelOverride>::try_from_uri(req.uri())
    else {
        return;
    };

    if let Some(expected) = logger.config().level_override_token.as_deref() {
        let presented = req
            .headers()
            .get(LEVEL_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if presented != Some(expected) {
            diagnostic(logger, format!("ignoring set_log_level={raw}: missing or wrong level token"));
            return;
        }
    }

    match raw.parse::<Severity>() {
        Ok(level) => {
            if logger.set_minimum(level) == LevelChange::Unchanged {
                diagnostic(logger, format!("log level already '{level}'"));
            }
        }
        Err(err) => diagnostic(logger, format!("ignoring set_log_level: {err}")),
    }
}

fn diagnostic(logger: &Logger, message: String) {
    tracing::debug!("{message}");
    emit(
        logger,
        LogEvent::now(
            Severity::Debug,
            EventKind::PlainMessage(message),
            context::request_id(),
        ),
    );
}
