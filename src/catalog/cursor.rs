//! Pagination cursor model.

use serde::{Deserialize, Serialize};

/// Token of the first page of any catalog listing.
pub const FIRST_PAGE: u32 = 1;

/// Position of the next page in a catalog listing.
///
/// Cursors are produced by fetch responses. The only cursor built locally is
/// [`PageCursor::first_page`], which seeds the very first request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageCursor {
    /// The listing is exhausted. Never retried.
    NoMore,

    /// A fetchable page. Tokens start at 1.
    Page(u32),
}

impl PageCursor {
    /// Cursor used for the initial request and every refresh.
    pub fn first_page() -> Self {
        PageCursor::Page(FIRST_PAGE)
    }

    /// Check if a fetch can be issued with this cursor.
    pub fn is_fetchable(&self) -> bool {
        matches!(self, PageCursor::Page(_))
    }

    /// Page token, if any.
    pub fn token(&self) -> Option<u32> {
        match self {
            PageCursor::Page(token) => Some(*token),
            PageCursor::NoMore => None,
        }
    }
}
