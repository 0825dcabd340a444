//! Paginated catalog feed.
//!
//! The core is [`ui::feed::FeedEngine`]. It reconciles first-page and
//! next-page intents against one pagination cursor and publishes a single
//! ordered stream of [`ui::feed::ViewState`]s.

pub mod catalog;
pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod ui;
