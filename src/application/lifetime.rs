// Liveness flag shared by everything a view owns
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloned into each controller of a view. Results that arrive after
/// `end()` must be dropped without touching state.
#[derive(Debug, Clone)]
pub struct ViewLifetime {
    active: Arc<AtomicBool>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn end(&self) {
        self.active.store(false, Ordering::Release);
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}
