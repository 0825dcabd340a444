use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use pagefeed::catalog::{FetchError, HttpCatalog, Item};
use pagefeed::config::Config;
use pagefeed::logging::init_tracing;
use pagefeed::ui::feed::{render, AttachedFeed, FeedEngine, FeedView, ViewState};

#[derive(Parser)]
#[command(name = "pagefeed", about = "Browse a paginated catalog listing")]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of pages to load after the first one
    #[arg(short, long, default_value_t = 2)]
    pages: u32,
}

/// Prints feed states to stdout.
#[derive(Default)]
struct ConsoleView {
    shown: usize,
}

impl FeedView for ConsoleView {
    fn show_loading(&mut self) {
        println!("Loading...");
    }

    fn hide_loading(&mut self) {}

    fn show_items(&mut self, items: &[Item]) {
        // Only print what is new since the last render
        if items.len() < self.shown {
            self.shown = 0;
        }
        for (index, item) in items.iter().enumerate().skip(self.shown) {
            println!("{:>4}. {} [{}] {}", index + 1, item.title, item.id, item.image_url);
        }
        self.shown = items.len();
    }

    fn show_empty(&mut self) {
        println!("No results.");
    }

    fn show_error(&mut self, cause: &FetchError) {
        eprintln!("Error loading catalog: {cause}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    let source = Arc::new(HttpCatalog::new(config.catalog.clone())?);
    let mut engine = FeedEngine::new(source, config.feed);
    let AttachedFeed {
        intents,
        mut states,
    } = engine.attach()?;

    let mut view = ConsoleView::default();
    let mut remaining = args.pages;
    intents.request_first_page()?;

    while let Some(state) = states.next().await {
        render(&mut view, &state);
        if state.is_loading() {
            continue;
        }
        match &state {
            ViewState::DisplayingItems { next_cursor, .. }
                if remaining > 0 && next_cursor.is_fetchable() =>
            {
                remaining -= 1;
                intents.request_next_page()?;
            }
            _ => break,
        }
    }

    engine.detach();
    tracing::info!(items = engine.current_state().items().len(), "Done");
    Ok(())
}
