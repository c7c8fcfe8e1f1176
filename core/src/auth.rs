//! Credential lookup and the authorization request hook.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::error::ClientError;
use crate::hooks::RequestHook;
use crate::http::HttpRequest;

/// Read access to cached values such as a stored bearer token.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Thread-safe in-memory `CredentialStore`.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }
}

/// How a cached credential is placed on outgoing requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// The raw token under a custom header name, e.g. `token: <token>`.
    Header(String),
}

impl AuthScheme {
    fn header(&self, token: &str) -> (String, String) {
        match self {
            AuthScheme::Bearer => ("Authorization".to_string(), format!("Bearer {token}")),
            AuthScheme::Header(name) => (name.clone(), token.to_string()),
        }
    }
}

/// Build an `on_request` hook that attaches the credential stored under
/// `key`. Requests are left untouched when the credential is missing or empty.
pub fn auth_hook(store: Arc<dyn CredentialStore>, key: impl Into<String>, scheme: AuthScheme) -> RequestHook {
    let key = key.into();
    Arc::new(move |mut request: HttpRequest| -> Result<HttpRequest, ClientError> {
        match store.get(&key).filter(|token| !token.is_empty()) {
            Some(token) => {
                let (name, value) = scheme.header(&token);
                request.set_header(name, value);
            }
            None => trace!(key = %key, "no cached credential, sending unauthenticated"),
        }
        Ok(request)
    })
}
