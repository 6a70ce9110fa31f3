//! First-build gate serializing the heaviest compile of each batch.
//!
//! On memory-limited runners every batch's first build generates all of its
//! artifacts at once. Holding this gate around that first build bounds how
//! many of those run at the same time.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Mutex, MutexGuard};

/// Binary lock plus the policy bit deciding whether batches use it.
#[derive(Debug, Default)]
pub struct FirstBuildGate {
    lock: Mutex<()>,
    enabled: bool,
    acquisitions: AtomicUsize,
}

impl FirstBuildGate {
    /// Create a gate; `enabled` is normally "running on a constrained runner".
    pub fn new(enabled: bool) -> Self {
        Self {
            lock: Mutex::new(()),
            enabled,
            acquisitions: AtomicUsize::new(0),
        }
    }

    /// Whether batches should take the gate for their first build.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Wait for the gate. The build runs while the guard is alive.
    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        let guard = self.lock.lock().await;
        self.acquisitions.fetch_add(1, Ordering::SeqCst);
        guard
    }

    /// Whether someone currently holds the gate.
    pub fn is_held(&self) -> bool {
        self.lock.try_lock().is_err()
    }

    /// Number of times the gate has been acquired.
    ///
    /// This counts waits that ended in holding the gate, including a holder
    /// that then skipped its build because the run had already failed.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions.load(Ordering::SeqCst)
    }
}
