//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// An Arc-wrapped [`AxumContext`] containing the ports handlers call
/// (speech controller, profile store, engine catalog).
pub type AppState = Arc<AxumContext>;
