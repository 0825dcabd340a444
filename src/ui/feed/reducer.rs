//! Reducer for the catalog feed.

use crate::config::FailurePolicy;
use crate::ui::mvi::Reducer;

use super::intent::FeedChange;
use super::state::ViewState;

/// Reducer for feed state transitions.
///
/// Pure function. Fetch dispatch, cancellation and emission are handled by
/// the engine around the reduce call.
pub struct FeedReducer;

impl Reducer for FeedReducer {
    type State = ViewState;
    type Intent = FeedChange;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            FeedChange::FirstPageStarted => ViewState::LoadingInitial,

            FeedChange::FirstPageLoaded(page) => {
                if page.items.is_empty() {
                    ViewState::Empty
                } else {
                    ViewState::DisplayingItems {
                        items: page.items,
                        next_cursor: page.next_cursor,
                    }
                }
            }

            FeedChange::FirstPageFailed(cause) => ViewState::failed(cause),

            FeedChange::NextPageLoaded(page) => match state {
                ViewState::DisplayingItems { mut items, .. } => {
                    items.extend(page.items);
                    ViewState::DisplayingItems {
                        items,
                        next_cursor: page.next_cursor,
                    }
                }
                // Merge target is gone (refresh or failure in between)
                other => other,
            },

            FeedChange::NextPageFailed { cause, policy } => match (policy, state) {
                (FailurePolicy::Retain, ViewState::DisplayingItems { items, .. }) => {
                    ViewState::Failed {
                        cause,
                        retained: items,
                    }
                }
                _ => ViewState::failed(cause),
            },
        }
    }
}
