//! Forwarding the correlation id on outbound calls.

use crate::{context, request_id::REQUEST_ID_HEADER};

/// Adds `dm-logger-req-id` to outbound requests made while handling a
/// request, so the next service logs under the same id.
pub trait PropagateRequestId {
    fn propagate_request_id(self) -> Self;
}

impl PropagateRequestId for reqwest::RequestBuilder {
    fn propagate_request_id(self) -> Self {
        match context::request_id() {
            Some(id) => self.header(REQUEST_ID_HEADER, id),
            None => self,
        }
    }
}
