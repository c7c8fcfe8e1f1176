//! Hooked request client over a pluggable HTTP transport.
//!
//! # Overview
//! `RequestClient` centralizes the plumbing every API call repeats: joining
//! the base URL, the transport timeout, credential headers, a loading
//! indicator, and unwrapping the server's `{code, data, message}` envelope.
//! The network exchange itself belongs to a `Transport`.
//!
//! # Design
//! - One owned client per target API, built with `connect` or
//!   `RequestClient::new`. There is no global instance.
//! - Hooks occupy four typed slots (`HookSet`); error hooks map failures
//!   but cannot turn them into successes.
//! - Per-call options travel on the `HttpRequest`, never on the client.
//! - Collaborators (`Transport`, `CredentialStore`, `LoadingIndicator`) are
//!   traits so tests and hosts can swap them.

pub mod auth;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod hooks;
pub mod http;
pub mod loading;
pub mod transport;
pub mod urljoin;

#[cfg(feature = "ureq-transport")]
pub use client::connect;
pub use client::RequestClient;
pub use auth::{auth_hook, AuthScheme, CredentialStore, MemoryCredentialStore};
pub use config::ClientConfig;
pub use envelope::{Envelope, EnvelopeConfig};
pub use error::{ClientError, TransportError};
pub use hooks::HookSet;
pub use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions, WireRequest};
pub use loading::{LoadingIndicator, NoopIndicator};
pub use transport::Transport;
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
