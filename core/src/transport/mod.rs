//! Pluggable transport boundary.
//!
//! The client never performs I/O itself. It resolves each request into a
//! `WireRequest` and hands it to a `Transport`, which performs the exchange
//! and reports either a response (any status) or a `TransportError`.

use std::future::Future;

use crate::error::TransportError;
use crate::http::{HttpResponse, WireRequest};

#[cfg(feature = "ureq-transport")]
mod ureq_transport;
#[cfg(feature = "ureq-transport")]
pub use ureq_transport::UreqTransport;

/// Trait for HTTP transport backends.
///
/// A transport is bound to its timeout when it is constructed. Non-2xx
/// statuses are returned as responses, not errors; the client interprets them.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}
