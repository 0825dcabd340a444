//! Configuration loading for the catalog source and the feed engine.

pub mod loader;
pub mod types;

pub use loader::ConfigError;
pub use types::{CatalogConfig, Config, FailurePolicy, FeedSettings, API_KEY_ENV_VAR};
