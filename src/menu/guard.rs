//! Exclusive, non-queueing rebuild guard

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RebuildGuard {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of one rebuild; releases the guard on drop
#[derive(Debug)]
pub struct RebuildPermit {
    busy: Arc<AtomicBool>,
}

impl RebuildGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when a rebuild is already in flight. Callers drop the request.
    pub fn try_acquire(&self) -> Option<RebuildPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RebuildPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for RebuildPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
