//! Presentation layer: MVI primitives and the catalog feed.

pub mod feed;
pub mod mvi;
