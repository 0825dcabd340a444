//! Shared test utilities and a scripted catalog source.

#![allow(dead_code, unused_imports)]

pub mod scripted_catalog;

use std::path::PathBuf;
use std::time::Duration;

use pagefeed::catalog::{Item, PageCursor};
use pagefeed::ui::feed::{ViewState, ViewStates};
use tempfile::TempDir;
use url::Url;

pub use scripted_catalog::{Gate, ScriptedCatalog};

/// Upper bound for anything a test waits on.
pub const WAIT: Duration = Duration::from_secs(2);

/// Quiet period used to assert that nothing else happens.
pub const QUIET: Duration = Duration::from_millis(50);

pub fn item(id: &str) -> Item {
    Item::new(
        id,
        format!("TITLE{id}"),
        Url::parse(&format!("http://test{id}.com")).unwrap(),
    )
}

pub fn items(ids: &[&str]) -> Vec<Item> {
    ids.iter().map(|id| item(id)).collect()
}

pub fn displaying(ids: &[&str], next_cursor: PageCursor) -> ViewState {
    ViewState::DisplayingItems {
        items: items(ids),
        next_cursor,
    }
}

/// Write a config file into a fresh temp dir.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Wait for the next emitted state.
pub async fn next_state(states: &mut ViewStates) -> ViewState {
    tokio::time::timeout(WAIT, states.next())
        .await
        .expect("timed out waiting for a view state")
        .expect("view state stream ended")
}

/// Assert the stream stays silent for a short while.
pub async fn assert_no_emission(states: &mut ViewStates) {
    tokio::time::sleep(QUIET).await;
    assert_eq!(states.try_next(), None);
}
