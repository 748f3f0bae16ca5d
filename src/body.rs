//! Response body that keeps the request's context until the last frame.
//!
//! The server polls a response body after the middleware has returned, so a
//! streamed body would otherwise run without the request's context. The
//! completion line is written when the body ends, fails or is dropped.

use axum::body::{Body, Bytes};
use chrono::Utc;
use http_body::{Body as _, Frame, SizeHint};
use std::{
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    context::{self, RequestContext},
    format::LogEvent,
    logger::Logger,
    middleware::emit,
};

/// Line emitted once the body is finished. The event is restamped then.
pub struct Completion {
    pub logger: Logger,
    pub event: LogEvent,
}

pub struct ScopedBody {
    inner: Body,
    ctx: RequestContext,
    completion: Option<Completion>,
}

impl ScopedBody {
    pub fn new(inner: Body, ctx: RequestContext, completion: Completion) -> Self {
        Self {
            inner,
            ctx,
            completion: Some(completion),
        }
    }

    fn finish(&mut self) {
        let Some(Completion { logger, event }) = self.completion.take() else {
            return;
        };
        let event = LogEvent {
            timestamp: Utc::now().fixed_offset(),
            ..event
        };
        context::sync_scope(self.ctx.clone(), || emit(&logger, event));
    }
}

impl http_body::Body for ScopedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        let polled = context::sync_scope(this.ctx.clone(), || {
            Pin::new(&mut this.inner).poll_frame(cx)
        });
        if matches!(polled, Poll::Ready(None | Some(Err(_)))) {
            this.finish();
        }
        polled
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for ScopedBody {
    fn drop(&mut self) {
        self.finish();
    }
}
