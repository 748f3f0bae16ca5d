//! dm-logger-rs - Request-scoped logging middleware for axum.
//!
//! Every request gets a correlation id (reused from `dm-logger-req-id` when an
//! upstream service already set one), every log line carries it, and the id
//! is echoed back in the response headers.

pub mod body;
pub mod classifier;
pub mod cli;
pub mod colors;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod handlers;
pub mod logger;
pub mod middleware;
pub mod propagate;
pub mod request_id;
pub mod severity;
pub mod sink;

use axum::{Router, middleware as axum_middleware};

pub use config::LoggerConfig;
pub use logger::{LevelChange, Logger};
pub use propagate::PropagateRequestId;
pub use severity::Severity;

/// Wraps `router` in the logging middleware, which also answers the client
/// intake endpoint.
///
/// Call it after the application routes are registered: routes added later
/// are not wrapped by the middleware. The intake is served by the middleware
/// itself, so a path the application already routes never conflicts at
/// startup: `POST`s to it are taken by the intake, other methods reach the app.
pub fn attach<S>(router: Router<S>, logger: &Logger) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(axum_middleware::from_fn_with_state(
        logger.clone(),
        middleware::log_requests,
    ))
}
