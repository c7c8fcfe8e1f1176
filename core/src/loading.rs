//! Loading-indicator bookkeeping.
//!
//! Every `show()` issued by the client is paired with exactly one `close()`
//! through `LoadingGuard`, which closes on drop. That covers success,
//! failure, and a request future dropped before it settles.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// UI collaborator toggled around dispatched requests.
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn close(&self);
}

/// Indicator that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl LoadingIndicator for NoopIndicator {
    fn show(&self) {}
    fn close(&self) {}
}

pub(crate) struct LoadingState {
    in_flight: AtomicUsize,
    indicator: Arc<dyn LoadingIndicator>,
}

impl LoadingState {
    pub(crate) fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            indicator,
        }
    }

    pub(crate) fn begin(&self) -> LoadingGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.indicator.show();
        LoadingGuard { state: self }
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }
}

impl fmt::Debug for LoadingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadingState")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

pub(crate) struct LoadingGuard<'a> {
    state: &'a LoadingState,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.state.indicator.close();
    }
}
