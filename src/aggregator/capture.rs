//! Local capture-mode toggle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Operator switch for live capture, shared between the API and the aggregator.
///
/// The aggregator reads it once per merge; a flip shows up in the next snapshot.
#[derive(Debug, Clone, Default)]
pub struct CaptureToggle {
    enabled: Arc<AtomicBool>,
}

impl CaptureToggle {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Set the toggle, returning the previous position.
    pub fn set(&self, enabled: bool) -> bool {
        self.enabled.swap(enabled, Ordering::AcqRel)
    }
}
