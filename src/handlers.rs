//! HTTP request handlers.

use axum::{
    Form,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{logger::Logger, severity::Severity};

/// Form body accepted by [`client_message`].
#[derive(Debug, Default, Deserialize)]
pub struct ClientMessage {
    pub msg: Option<String>,
    pub severity: Option<String>,
}

impl ClientMessage {
    /// Named severity, or `default` when absent or not a syslog name.
    pub fn severity_or(&self, default: Severity) -> Severity {
        self.severity
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(default)
    }
}

/// Receives log messages submitted by clients (typically browser code)
///
/// Called by the middleware for `POST` requests on the intake path, so the
/// endpoint never occupies a route in the application's router.
///
/// The body is only read for `application/x-www-form-urlencoded` requests;
/// any other content type, an undecodable body, or a missing `msg` field
/// means there is nothing to log. Emission failures are logged at `error`.
/// The response is always `204 No Content`.
pub async fn client_message(logger: &Logger, req: Request) -> StatusCode {
    let payload = match Form::<ClientMessage>::from_request(req, &()).await {
        Ok(Form(payload)) => payload,
        Err(rejection) => {
            tracing::debug!("client message without usable payload: {rejection}");
            return StatusCode::NO_CONTENT;
        }
    };

    let Some(msg) = payload.msg.as_deref() else {
        return StatusCode::NO_CONTENT;
    };

    let severity = payload.severity_or(logger.config().default_level);
    if let Err(err) = logger.log(severity, msg) {
        tracing::error!("client message not logged: {err}");
        if let Err(err) = logger.error(err.to_string()) {
            tracing::error!("client message failure not logged: {err}");
        }
    }

    StatusCode::NO_CONTENT
}
