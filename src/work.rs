//! Atomic helpers shared between a mining handle and its worker.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation flag; clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the search stop at its next checkpoint.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// One-shot latch deciding which terminal outcome gets published.
#[derive(Debug, Default)]
pub(crate) struct TerminalLatch {
    closed: AtomicBool,
}

impl TerminalLatch {
    pub(crate) const fn new() -> Self {
        Self {
            closed: AtomicBool::new(false),
        }
    }

    /// Returns `true` for exactly one caller, the one allowed to publish.
    pub(crate) fn try_close(&self) -> bool {
        !self.closed.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
