use url::Url;

use super::cursor::PageCursor;

/// A single catalog entry.
///
/// Items carry no identity beyond `id` and are never deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub image_url: Url,
}

impl Item {
    pub fn new(id: impl Into<String>, title: impl Into<String>, image_url: Url) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url,
        }
    }
}

/// One page of catalog items plus the cursor of the page after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    pub items: Vec<Item>,
    pub next_cursor: PageCursor,
}

impl FetchResult {
    pub fn new(items: Vec<Item>, next_cursor: PageCursor) -> Self {
        Self { items, next_cursor }
    }

    /// Result for a listing that has nothing left to give.
    pub fn exhausted() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: PageCursor::NoMore,
        }
    }
}
