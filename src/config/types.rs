use serde::{Deserialize, Serialize};

/// Environment variable that supplies the catalog API key when the config
/// file does not.
pub const API_KEY_ENV_VAR: &str = "PAGEFEED_API_KEY";

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub feed: FeedSettings,
}

/// Remote catalog endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (e.g., "https://api.themoviedb.org").
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the paginated listing, appended to `base_url`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Prefix joined with each entry's poster path.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Direct API key. Falls back to `PAGEFEED_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Connection timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u32,
}

/// Feed engine behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSettings {
    /// What a failed next-page fetch does to the items already shown.
    #[serde(default)]
    pub next_page_failure: FailurePolicy,
}

/// Handling of accumulated items when a next-page fetch fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The error replaces the list outright.
    #[default]
    Replace,
    /// The error is shown next to the items accumulated so far.
    Retain,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org".to_string()
}

fn default_endpoint() -> String {
    "/3/tv/popular".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_connect_timeout() -> u32 {
    5
}

impl CatalogConfig {
    /// API key from config, or from `PAGEFEED_API_KEY` when unset.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.is_empty())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            image_base_url: default_image_base_url(),
            api_key: None,
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}
