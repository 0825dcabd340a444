//! Catalog data model and sources.
//!
//! The feed engine only sees the [`CatalogSource`] trait. [`HttpCatalog`]
//! is the network-backed implementation used by the binary.

mod cursor;
mod error;
mod http;
mod source;
mod types;

pub use cursor::{PageCursor, FIRST_PAGE};
pub use error::FetchError;
pub use http::HttpCatalog;
pub use source::CatalogSource;
pub use types::{FetchResult, Item};
