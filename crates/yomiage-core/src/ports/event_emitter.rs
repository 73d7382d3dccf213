//! Event emitter trait for cross-crate event broadcasting.

use crate::events::AppEvent;

/// Trait for emitting application events.
///
/// Keeps event plumbing consistent across adapters and prevents channel
/// types from becoming part of the public API surface. Implementations must
/// not block — buffer or drop instead.
pub trait AppEventEmitter: Send + Sync {
    /// Emit an application event.
    fn emit(&self, event: AppEvent);
}

/// A no-op event emitter for tests and contexts without a listener.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEmitter;

impl NoopEmitter {
    /// Create a new no-op emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AppEventEmitter for NoopEmitter {
    fn emit(&self, _event: AppEvent) {
        // Intentionally do nothing
    }
}
