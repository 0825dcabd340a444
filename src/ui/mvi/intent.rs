//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User requests (mount, pull-to-refresh, scrolling near the end)
/// - System events (fetch responses and failures)
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
