//! Run-wide failure signal shared by all batches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable flag raised by the first failing batch.
///
/// Once raised it stays raised for the rest of the run. Batches read it
/// between examples; the read-then-raise is not atomic as a pair, so a sibling
/// may start one more compile right after a failure.
#[derive(Debug, Clone, Default)]
pub struct ErrorSignal {
    raised: Arc<AtomicBool>,
}

impl ErrorSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the run as failed.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Whether any batch has failed.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }
}
