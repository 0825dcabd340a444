//! View state of the catalog feed.

use crate::catalog::{FetchError, Item, PageCursor};
use crate::ui::mvi::UiState;

/// The single authoritative snapshot of what the feed should display.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// No data yet, first-page fetch in flight.
    #[default]
    LoadingInitial,

    /// Accumulated items plus the position of the next page.
    DisplayingItems {
        items: Vec<Item>,
        next_cursor: PageCursor,
    },

    /// The first page came back with zero items.
    Empty,

    /// The most recent fetch failed.
    Failed {
        cause: FetchError,
        /// Items kept on screen under `FailurePolicy::Retain`. Empty otherwise.
        retained: Vec<Item>,
    },
}

impl UiState for ViewState {}

impl ViewState {
    /// Build a `Failed` state without retained items.
    pub fn failed(cause: FetchError) -> Self {
        ViewState::Failed {
            cause,
            retained: Vec::new(),
        }
    }

    /// Cursor to use for a next-page request, if one may be dispatched now.
    ///
    /// Only `DisplayingItems` with a fetchable cursor qualifies.
    pub fn next_page_cursor(&self) -> Option<PageCursor> {
        match self {
            ViewState::DisplayingItems { next_cursor, .. } if next_cursor.is_fetchable() => {
                Some(*next_cursor)
            }
            _ => None,
        }
    }

    /// Items currently visible, including retained ones after a failure.
    pub fn items(&self) -> &[Item] {
        match self {
            ViewState::DisplayingItems { items, .. } => items,
            ViewState::Failed { retained, .. } => retained,
            ViewState::LoadingInitial | ViewState::Empty => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::LoadingInitial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn item(id: &str) -> Item {
        Item::new(id, format!("T{id}"), Url::parse("http://test.com").unwrap())
    }

    #[test]
    fn default_is_loading_initial() {
        assert_eq!(ViewState::default(), ViewState::LoadingInitial);
        assert!(ViewState::default().is_loading());
    }

    #[test]
    fn next_page_cursor_only_for_fetchable_listing() {
        let displaying = ViewState::DisplayingItems {
            items: vec![item("1")],
            next_cursor: PageCursor::Page(2),
        };
        assert_eq!(displaying.next_page_cursor(), Some(PageCursor::Page(2)));

        let exhausted = ViewState::DisplayingItems {
            items: vec![item("1")],
            next_cursor: PageCursor::NoMore,
        };
        assert_eq!(exhausted.next_page_cursor(), None);

        assert_eq!(ViewState::LoadingInitial.next_page_cursor(), None);
        assert_eq!(ViewState::Empty.next_page_cursor(), None);
        assert_eq!(
            ViewState::failed(FetchError::Network("down".into())).next_page_cursor(),
            None
        );
    }

    #[test]
    fn items_include_retained_after_failure() {
        let state = ViewState::Failed {
            cause: FetchError::Network("down".into()),
            retained: vec![item("1"), item("2")],
        };
        assert_eq!(state.items().len(), 2);
        assert!(ViewState::Empty.items().is_empty());
    }
}
