//! Cooperative cancellation for search operations.
//!
//! A [`CancelFlag`] is a cloneable handle to a shared atomic flag. The engine
//! clears it when a search starts; any holder may set it to request early
//! termination. Long-running loops check it at directory boundaries and at
//! fixed item intervals, so cancellation is cooperative, not preemptive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared cancellation flag for terminating long-running operations.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    /// Creates a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the operation observing this flag.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Resets the flag at the start of a new operation.
    pub fn clear(&self) {
        self.cancelled.store(false, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}
