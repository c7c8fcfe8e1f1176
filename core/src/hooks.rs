//! Caller-supplied request and response hooks.
//!
//! # Design
//! A `HookSet` has four fixed slots, each with one signature. Request hooks
//! may rewrite the request or reject it. Error hooks receive the failure and
//! return a (possibly different) failure: they cannot turn a rejected request
//! into a resolved one.

use std::fmt;
use std::sync::Arc;

use crate::error::ClientError;
use crate::http::{HttpRequest, HttpResponse};

pub type RequestHook = Arc<dyn Fn(HttpRequest) -> Result<HttpRequest, ClientError> + Send + Sync>;
pub type ResponseHook = Arc<dyn Fn(HttpResponse) -> Result<HttpResponse, ClientError> + Send + Sync>;
pub type ErrorHook = Arc<dyn Fn(ClientError) -> ClientError + Send + Sync>;

/// The ordered hook slots registered on a client.
#[derive(Clone, Default)]
pub struct HookSet {
    pub on_request: Option<RequestHook>,
    pub on_request_error: Option<ErrorHook>,
    pub on_response: Option<ResponseHook>,
    pub on_response_error: Option<ErrorHook>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(HttpRequest) -> Result<HttpRequest, ClientError> + Send + Sync + 'static,
    {
        self.on_request = Some(Arc::new(hook));
        self
    }

    pub fn on_request_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(ClientError) -> ClientError + Send + Sync + 'static,
    {
        self.on_request_error = Some(Arc::new(hook));
        self
    }

    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(HttpResponse) -> Result<HttpResponse, ClientError> + Send + Sync + 'static,
    {
        self.on_response = Some(Arc::new(hook));
        self
    }

    pub fn on_response_error<F>(mut self, hook: F) -> Self
    where
        F: Fn(ClientError) -> ClientError + Send + Sync + 'static,
    {
        self.on_response_error = Some(Arc::new(hook));
        self
    }

    /// Run `on_request` on `request`. A failure of the request stage,
    /// whether raised by `on_request` or passed in as `request`, goes
    /// through `on_request_error`.
    pub(crate) fn apply_request(
        &self,
        request: Result<HttpRequest, ClientError>,
    ) -> Result<HttpRequest, ClientError> {
        let outcome = match (request, &self.on_request) {
            (Ok(req), Some(hook)) => hook(req),
            (other, _) => other,
        };
        outcome.map_err(|err| self.request_error(err))
    }

    pub(crate) fn request_error(&self, err: ClientError) -> ClientError {
        match &self.on_request_error {
            Some(hook) => hook(err),
            None => err,
        }
    }

    /// Success goes through `on_response`, failure through
    /// `on_response_error`. An error raised by `on_response` itself is
    /// returned as-is.
    pub(crate) fn apply_response(
        &self,
        response: Result<HttpResponse, ClientError>,
    ) -> Result<HttpResponse, ClientError> {
        match response {
            Ok(resp) => match &self.on_response {
                Some(hook) => hook(resp),
                None => Ok(resp),
            },
            Err(err) => Err(match &self.on_response_error {
                Some(hook) => hook(err),
                None => err,
            }),
        }
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("on_request", &self.on_request.is_some())
            .field("on_request_error", &self.on_request_error.is_some())
            .field("on_response", &self.on_response.is_some())
            .field("on_response_error", &self.on_response_error.is_some())
            .finish()
    }
}
