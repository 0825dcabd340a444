//! Display adapter contract for the catalog feed.

use crate::catalog::{FetchError, Item};

use super::state::ViewState;

/// Rendering surface driven by [`render`].
///
/// Implementations decide how each call looks (list widget, toast, console
/// line); the feed only decides which calls happen.
pub trait FeedView {
    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    fn show_items(&mut self, items: &[Item]);

    fn show_empty(&mut self);

    fn show_error(&mut self, cause: &FetchError);
}

/// Map a view state onto the display adapter.
pub fn render(view: &mut dyn FeedView, state: &ViewState) {
    match state {
        ViewState::LoadingInitial => view.show_loading(),
        ViewState::DisplayingItems { items, .. } => {
            view.hide_loading();
            view.show_items(items);
        }
        ViewState::Empty => {
            view.hide_loading();
            view.show_empty();
        }
        ViewState::Failed { cause, retained } => {
            view.hide_loading();
            if !retained.is_empty() {
                view.show_items(retained);
            }
            view.show_error(cause);
        }
    }
}
