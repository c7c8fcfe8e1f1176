//! The hooked request client.
//!
//! # Design
//! `RequestClient` owns its configuration and transport and carries no
//! per-request state besides the loading counter. A call flows through a
//! fixed pipeline:
//!
//! 1. caller `on_request`, with `on_request_error` receiving any request-stage
//!    failure (including URL resolution),
//! 2. the loading indicator, shown if the call (or the client default) asks for it,
//! 3. the transport,
//! 4. status and envelope validation,
//! 5. caller `on_response` or `on_response_error`,
//! 6. loading indicator closed, whatever the outcome,
//! 7. payload extraction (`request` only).
//!
//! Per-call options live on the `HttpRequest`; nothing a call does changes
//! how a concurrent call on the same client behaves.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, WireRequest};
use crate::loading::{LoadingIndicator, LoadingState, NoopIndicator};
use crate::transport::Transport;
use crate::urljoin;

#[cfg(feature = "ureq-transport")]
use crate::transport::UreqTransport;

/// Façade over a [`Transport`] applying hooks, the loading indicator and
/// envelope unwrapping.
#[derive(Debug)]
pub struct RequestClient<T> {
    config: ClientConfig,
    transport: T,
    loading: LoadingState,
}

/// Build a client over the default ureq transport, bound to the configured
/// timeout.
#[cfg(feature = "ureq-transport")]
pub fn connect(config: ClientConfig) -> Result<RequestClient<UreqTransport>, ClientError> {
    if !config.base_url.is_empty() {
        url::Url::parse(&config.base_url).map_err(|e| ClientError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
    }
    let transport = UreqTransport::new(config.timeout());
    Ok(RequestClient::new(config, transport))
}

impl<T: Transport> RequestClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            loading: LoadingState::new(Arc::new(NoopIndicator)),
        }
    }

    pub fn with_indicator(mut self, indicator: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = LoadingState::new(indicator);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// True while at least one call that showed the indicator is unsettled.
    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Send `request` and resolve with its unwrapped payload.
    #[instrument(skip_all, fields(method = %request.method, url = %request.url))]
    pub async fn request<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        let response = self.request_raw(request).await?;
        self.config.envelope.extract(&response.body)
    }

    /// Send `request` and resolve with the validated response, leaving the
    /// body untouched.
    pub async fn request_raw(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        let hooks = &self.config.hooks;
        let request = hooks.apply_request(Ok(request))?;
        let show = request.options.show_loading.unwrap_or(self.config.show_loading);
        let wire = self.resolve(request).map_err(|e| hooks.request_error(e))?;

        let guard = show.then(|| self.loading.begin());

        debug!(method = %wire.method, url = %wire.url, "dispatching request");
        let outcome = match self.transport.send(wire).await {
            Ok(response) => self.validate(response),
            Err(err) => {
                warn!(error = %err, "transport failed");
                Err(err.into())
            }
        };
        let outcome = hooks.apply_response(outcome);
        drop(guard);

        match &outcome {
            Ok(response) => debug!(status = response.status, "request settled"),
            Err(err) => debug!(error = %err, "request rejected"),
        }
        outcome
    }

    pub async fn get<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        self.request(request.method(HttpMethod::Get)).await
    }

    pub async fn post<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        self.request(request.method(HttpMethod::Post)).await
    }

    pub async fn put<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        self.request(request.method(HttpMethod::Put)).await
    }

    pub async fn patch<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        self.request(request.method(HttpMethod::Patch)).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ClientError> {
        self.request(request.method(HttpMethod::Delete)).await
    }

    fn resolve(&self, request: HttpRequest) -> Result<WireRequest, ClientError> {
        let url = urljoin::resolve(&self.config.base_url, &request.url, &request.params)?;
        Ok(WireRequest {
            method: request.method,
            url,
            headers: request.headers,
            body: request.body,
        })
    }

    fn validate(&self, response: HttpResponse) -> Result<HttpResponse, ClientError> {
        let response = check_status(response)?;
        if let Err(err) = self.config.envelope.check(&response.body) {
            warn!(error = %err, "envelope signalled failure");
            return Err(err);
        }
        Ok(response)
    }
}

/// Map non-2xx status codes to `ClientError::Status`.
fn check_status(response: HttpResponse) -> Result<HttpResponse, ClientError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(ClientError::Status {
        status: response.status,
        body: response.body,
    })
}
