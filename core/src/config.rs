//! Client configuration.
//!
//! `ClientConfig` is deserializable so it can live in a settings file;
//! hooks are code and are attached with `with_hooks` after loading.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::envelope::EnvelopeConfig;
use crate::hooks::HookSet;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_show_loading() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Prefix for every relative request URL.
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Whether calls show the loading indicator unless they opt out.
    #[serde(default = "default_show_loading")]
    pub show_loading: bool,
    #[serde(default)]
    pub envelope: EnvelopeConfig,
    #[serde(skip)]
    pub hooks: HookSet,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            show_loading: true,
            envelope: EnvelopeConfig::default(),
            hooks: HookSet::default(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_show_loading(mut self, show: bool) -> Self {
        self.show_loading = show;
        self
    }

    pub fn with_envelope(mut self, envelope: EnvelopeConfig) -> Self {
        self.envelope = envelope;
        self
    }

    pub fn with_hooks(mut self, hooks: HookSet) -> Self {
        self.hooks = hooks;
        self
    }
}
