//! Intents for the catalog feed.

use crate::catalog::{FetchError, FetchResult};
use crate::config::FailurePolicy;
use crate::ui::mvi::Intent;

/// User intents accepted by the feed engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedIntent {
    /// Initial mount or pull-to-refresh. Always restarts from the first page.
    FirstPageRequested,

    /// The display is close to the end of the rendered list.
    NextPageRequested,
}

impl Intent for FeedIntent {}

/// Partial state changes produced while reconciling intents with fetches.
///
/// These are what the reducer consumes. User intents are translated into
/// changes by the engine, which owns the side effects.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedChange {
    /// A first-page fetch was issued.
    FirstPageStarted,

    /// The first page arrived.
    FirstPageLoaded(FetchResult),

    /// The first-page fetch failed.
    FirstPageFailed(FetchError),

    /// A next page arrived and should be appended.
    NextPageLoaded(FetchResult),

    /// A next-page fetch failed.
    NextPageFailed {
        cause: FetchError,
        policy: FailurePolicy,
    },
}

impl Intent for FeedChange {}
