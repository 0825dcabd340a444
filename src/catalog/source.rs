//! Core trait for catalog data sources.

use async_trait::async_trait;

use super::cursor::PageCursor;
use super::error::FetchError;
use super::types::FetchResult;

/// Asynchronous page fetch against a remote catalog.
///
/// Implementations must be safe to call concurrently for different cursors.
/// Each call is independent. The feed engine may drop a pending call at any
/// await point when a newer request supersedes it or the engine detaches.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Returns the name of this source for logging.
    fn name(&self) -> &str;

    /// Fetch the page addressed by `cursor`.
    async fn fetch_page(&self, cursor: PageCursor) -> Result<FetchResult, FetchError>;
}
