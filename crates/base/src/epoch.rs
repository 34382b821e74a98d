use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// A shared epoch counter.
///
/// Everyone holding a clone sees the same value. When `advance()` is called,
/// every reader independently notices the epoch changed and drops whatever
/// state it built up during the previous epoch.
#[derive(Clone, Debug)]
pub struct Epoch {
    value: Arc<AtomicU64>,
}

impl Default for Epoch {
    fn default() -> Self {
        Self::new()
    }
}

impl Epoch {
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get the current epoch value.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Acquire)
    }

    /// Advance to the next epoch. Returns the new epoch value.
    pub fn advance(&self) -> u64 {
        self.value.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Check if the given epoch is still current.
    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.current()
    }
}
