//! Per-request correlation context.
//!
//! The context is stored in a tokio task-local, so it follows the request's
//! future across every `.await`: two requests interleaved on the same worker
//! thread each see their own values. Work moved onto another task has to be
//! wrapped with [`bind`] or started with [`spawn`] to keep the context.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::task::JoinHandle;

/// Key under which the correlation id is stored.
pub const REQUEST_ID_KEY: &str = "requestId";

tokio::task_local! {
    static CURRENT: RequestContext;
}

/// Key/value scope owned by one in-flight request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
    }

    pub fn request_id(&self) -> Option<String> {
        self.get(REQUEST_ID_KEY)
    }
}

/// Runs `fut` with `ctx` as the active context for every poll.
pub async fn scope<F: Future>(ctx: RequestContext, fut: F) -> F::Output {
    CURRENT.scope(ctx, fut).await
}

/// Runs the synchronous closure `f` with `ctx` active, for code driven by
/// `poll` outside the request's future (e.g. a response body).
pub fn sync_scope<R>(ctx: RequestContext, f: impl FnOnce() -> R) -> R {
    CURRENT.sync_scope(ctx, f)
}

/// The context active for the calling code, if any.
pub fn current() -> Option<RequestContext> {
    CURRENT.try_with(RequestContext::clone).ok()
}

pub fn get(key: &str) -> Option<String> {
    CURRENT.try_with(|ctx| ctx.get(key)).ok().flatten()
}

/// Stores `value` in the active context. Returns `false` outside any request.
pub fn set(key: impl Into<String>, value: impl Into<String>) -> bool {
    let (key, value) = (key.into(), value.into());
    CURRENT.try_with(|ctx| ctx.set(key, value)).is_ok()
}

/// Correlation id of the request the caller is running for.
pub fn request_id() -> Option<String> {
    get(REQUEST_ID_KEY)
}

/// Captures the current context now and re-enters it whenever the returned
/// future is polled. Without an active context the future runs unscoped.
pub fn bind<F>(fut: F) -> impl Future<Output = F::Output>
where
    F: Future,
{
    let captured = current();
    async move {
        match captured {
            Some(ctx) => CURRENT.scope(ctx, fut).await,
            None => fut.await,
        }
    }
}

/// `tokio::spawn` that keeps the caller's request context in the new task.
pub fn spawn<F>(fut: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::spawn(bind(fut))
}
