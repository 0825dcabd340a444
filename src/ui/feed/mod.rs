//! Catalog feed feature module.
//!
//! Paginated list of catalog items with initial load, load-more on scroll
//! and pull-to-refresh.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `intent.rs` - User intents and the partial changes they lead to
//! - `state.rs` - The feed's single `ViewState`
//! - `reducer.rs` - State transitions (pure, no side effects)
//! - `engine.rs` - Session task that dispatches fetches and emits states
//! - `view.rs` - Display adapter contract

mod engine;
mod intent;
mod reducer;
mod state;
mod view;

pub use engine::{AttachedFeed, EngineError, FeedEngine, FeedIntents, ViewStates};
pub use intent::{FeedChange, FeedIntent};
pub use reducer::FeedReducer;
pub use state::ViewState;
pub use view::{render, FeedView};
