//! Ureq-based transport (blocking).
//!
//! ureq is synchronous, so `Transport::send` blocks the polling thread for
//! the duration of the exchange.

use std::io::{self, Read as _};
use std::time::Duration;

use tracing::trace;

use super::Transport;
use crate::error::TransportError;
use crate::http::{HttpResponse, WireRequest};

/// A [`Transport`] backed by a [`ureq::Agent`].
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Create a transport whose every exchange is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            // Status codes are interpreted by the client, not the transport.
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn send(&self, request: WireRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        trace!(method = %request.method, url = %request.url, "ureq exchange");
        let result = match request.body {
            Some(body) => {
                let req = builder
                    .body(body.into_bytes())
                    .map_err(|e| TransportError::Other(Box::new(e)))?;
                self.agent.run(req)
            }
            None => {
                let req = builder
                    .body(())
                    .map_err(|e| TransportError::Other(Box::new(e)))?;
                self.agent.run(req)
            }
        };

        match result {
            Ok(resp) => convert_response(resp),
            Err(ureq::Error::Timeout(_)) => Err(TransportError::Timeout),
            Err(ureq::Error::HostNotFound) => {
                Err(TransportError::Connection("host not found".to_owned()))
            }
            Err(ureq::Error::ConnectionFailed) => {
                Err(TransportError::Connection("connection failed".to_owned()))
            }
            Err(ureq::Error::Io(e)) => Err(map_io_error(e)),
            Err(e) => Err(TransportError::Other(Box::new(e))),
        }
    }
}

fn map_io_error(err: io::Error) -> TransportError {
    if err.kind() == io::ErrorKind::TimedOut {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

fn convert_response(response: http::Response<ureq::Body>) -> Result<HttpResponse, TransportError> {
    let (parts, body) = response.into_parts();

    let headers = parts
        .headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_owned(), value.to_owned()))
        })
        .collect();

    let mut bytes = Vec::new();
    body.into_reader()
        .read_to_end(&mut bytes)
        .map_err(map_io_error)?;
    let text = String::from_utf8(bytes).map_err(|e| TransportError::Decode(e.to_string()))?;

    Ok(HttpResponse {
        status: parts.status.as_u16(),
        headers,
        body: text,
    })
}
