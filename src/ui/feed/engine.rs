//! Intent-to-state reconciliation engine for the catalog feed.
//!
//! One session task per attachment owns the [`ViewState`] slot. It
//! multiplexes three inputs:
//!
//! ```text
//! first-page intents ──┐
//! next-page intents  ──┼──→ session task ──→ reduce ──→ ViewStates
//! fetch outcomes     ──┘         │
//!        ↑                       ▼
//!        └────────────── spawned fetch tasks
//! ```
//!
//! First-page and next-page fetches are two independently cancellable
//! pipelines. Each keeps at most one fetch in flight and a newer request
//! aborts the older one. Outcomes carry a ticket, so a result that raced
//! its own abort is discarded instead of overwriting newer state. A refresh
//! also aborts the pending next-page fetch because its merge target is
//! being replaced.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::catalog::{CatalogSource, FetchError, FetchResult, PageCursor};
use crate::config::FeedSettings;
use crate::lifecycle::DetachSignal;
use crate::ui::mvi::Reducer;

use super::intent::{FeedChange, FeedIntent};
use super::reducer::FeedReducer;
use super::state::ViewState;

/// Errors returned by the engine's public surface.
///
/// Fetch failures never show up here; they become `ViewState::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The engine is not attached, or was detached after the intents
    /// handle was obtained.
    #[error("feed engine is not attached")]
    Detached,

    /// `attach()` was called outside a tokio runtime.
    #[error("feed engine must be attached from within a tokio runtime")]
    NoRuntime,
}

/// Coordinator between user intents, the catalog source and the display.
pub struct FeedEngine {
    source: Arc<dyn CatalogSource>,
    settings: FeedSettings,
    state: Arc<RwLock<ViewState>>,
    session: Option<Session>,
}

struct Session {
    detach: DetachSignal,
    emitter: Emitter,
}

/// Handles returned by [`FeedEngine::attach`].
pub struct AttachedFeed {
    pub intents: FeedIntents,
    pub states: ViewStates,
}

impl FeedEngine {
    /// Create an engine whose state starts as `LoadingInitial`.
    pub fn new(source: Arc<dyn CatalogSource>, settings: FeedSettings) -> Self {
        Self::with_state(source, settings, ViewState::LoadingInitial)
    }

    /// Create an engine seeded with a previously displayed state.
    pub fn with_state(
        source: Arc<dyn CatalogSource>,
        settings: FeedSettings,
        state: ViewState,
    ) -> Self {
        Self {
            source,
            settings,
            state: Arc::new(RwLock::new(state)),
            session: None,
        }
    }

    /// Snapshot of the authoritative state.
    pub fn current_state(&self) -> ViewState {
        self.state.read().clone()
    }

    pub fn is_attached(&self) -> bool {
        self.session.is_some()
    }

    /// Start processing intents.
    ///
    /// The returned stream yields the current state first. Attaching again
    /// detaches the previous session.
    pub fn attach(&mut self) -> Result<AttachedFeed, EngineError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        self.detach();

        let (first_tx, first_rx) = mpsc::unbounded_channel();
        let (next_tx, next_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = mpsc::unbounded_channel();

        let detach = DetachSignal::new();
        let emitter = Emitter::new(state_tx);

        let initial = self.current_state();
        emitter.emit(initial.clone());

        let task = SessionTask {
            source: Arc::clone(&self.source),
            settings: self.settings,
            state: Arc::clone(&self.state),
            emitter: emitter.clone(),
            last_emitted: Some(initial),
            outcome_tx,
            first_page: None,
            next_page: None,
            tickets: 0,
        };
        runtime.spawn(task.run(first_rx, next_rx, outcome_rx, detach.clone()));

        tracing::debug!(source = self.source.name(), "Feed engine attached");

        self.session = Some(Session {
            detach: detach.clone(),
            emitter,
        });

        Ok(AttachedFeed {
            intents: FeedIntents {
                first_page: first_tx,
                next_page: next_tx,
                detach,
            },
            states: ViewStates { receiver: state_rx },
        })
    }

    /// Stop emission and cancel in-flight fetches. Idempotent.
    ///
    /// No state is emitted once this returns, even if a fetch resolves
    /// later. The last reconciled state stays readable through
    /// [`FeedEngine::current_state`].
    pub fn detach(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        session.emitter.close();
        session.detach.signal();
        tracing::debug!("Feed engine detached");
    }
}

impl Drop for FeedEngine {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Sender side of the two intent channels.
#[derive(Clone)]
pub struct FeedIntents {
    first_page: mpsc::UnboundedSender<FeedIntent>,
    next_page: mpsc::UnboundedSender<FeedIntent>,
    detach: DetachSignal,
}

impl FeedIntents {
    /// Route an intent to its channel.
    pub fn send(&self, intent: FeedIntent) -> Result<(), EngineError> {
        if self.detach.is_detached() {
            return Err(EngineError::Detached);
        }
        let channel = match intent {
            FeedIntent::FirstPageRequested => &self.first_page,
            FeedIntent::NextPageRequested => &self.next_page,
        };
        channel.send(intent).map_err(|_| EngineError::Detached)
    }

    pub fn request_first_page(&self) -> Result<(), EngineError> {
        self.send(FeedIntent::FirstPageRequested)
    }

    pub fn request_next_page(&self) -> Result<(), EngineError> {
        self.send(FeedIntent::NextPageRequested)
    }
}

/// Ordered stream of view states for one attachment.
///
/// Ends after the engine detaches and buffered states are drained.
pub struct ViewStates {
    receiver: mpsc::UnboundedReceiver<ViewState>,
}

impl ViewStates {
    pub async fn next(&mut self) -> Option<ViewState> {
        self.receiver.recv().await
    }

    /// Next buffered state without waiting.
    pub fn try_next(&mut self) -> Option<ViewState> {
        self.receiver.try_recv().ok()
    }
}

impl Stream for ViewStates {
    type Item = ViewState;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Closable state sender shared by the engine and its session task.
///
/// Sends, state slot writes and `close()` serialize on the same lock, so
/// nothing is sent or written by a session after `close()` returns.
#[derive(Clone)]
struct Emitter {
    sender: Arc<Mutex<Option<mpsc::UnboundedSender<ViewState>>>>,
}

impl Emitter {
    fn new(sender: mpsc::UnboundedSender<ViewState>) -> Self {
        Self {
            sender: Arc::new(Mutex::new(Some(sender))),
        }
    }

    fn emit(&self, state: ViewState) -> bool {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.send(state).is_ok(),
            None => false,
        }
    }

    fn close(&self) {
        self.sender.lock().take();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKind {
    First,
    Next,
}

struct FetchOutcome {
    kind: PageKind,
    ticket: u64,
    result: Result<FetchResult, FetchError>,
}

struct InFlight {
    ticket: u64,
    handle: JoinHandle<()>,
}

impl InFlight {
    fn abort(self) {
        self.handle.abort();
    }
}

/// Single writer of the state slot for one attachment.
struct SessionTask {
    source: Arc<dyn CatalogSource>,
    settings: FeedSettings,
    state: Arc<RwLock<ViewState>>,
    emitter: Emitter,
    last_emitted: Option<ViewState>,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome>,
    first_page: Option<InFlight>,
    next_page: Option<InFlight>,
    tickets: u64,
}

impl SessionTask {
    async fn run(
        mut self,
        mut first_rx: mpsc::UnboundedReceiver<FeedIntent>,
        mut next_rx: mpsc::UnboundedReceiver<FeedIntent>,
        mut outcome_rx: mpsc::UnboundedReceiver<FetchOutcome>,
        detach: DetachSignal,
    ) {
        loop {
            // Outcomes before intents: gating must see the latest write.
            tokio::select! {
                biased;
                _ = detach.wait() => break,
                Some(outcome) = outcome_rx.recv() => self.on_outcome(outcome),
                Some(_) = first_rx.recv() => self.on_first_page(),
                Some(_) = next_rx.recv() => self.on_next_page(),
            }
        }

        self.cancel_in_flight();
        tracing::trace!("Feed session task finished");
    }

    fn on_first_page(&mut self) {
        if let Some(stale) = self.first_page.take() {
            tracing::debug!(ticket = stale.ticket, "Superseding in-flight first-page fetch");
            stale.abort();
        }
        if let Some(stale) = self.next_page.take() {
            tracing::debug!(ticket = stale.ticket, "Refresh cancels in-flight next-page fetch");
            stale.abort();
        }

        self.apply(FeedChange::FirstPageStarted);
        let in_flight = self.spawn_fetch(PageKind::First, PageCursor::first_page());
        self.first_page = Some(in_flight);
    }

    fn on_next_page(&mut self) {
        let Some(cursor) = self.state.read().next_page_cursor() else {
            tracing::trace!("Next-page intent dropped: no fetchable cursor");
            return;
        };

        if let Some(stale) = self.next_page.take() {
            tracing::debug!(ticket = stale.ticket, "Switching to latest next-page request");
            stale.abort();
        }
        let in_flight = self.spawn_fetch(PageKind::Next, cursor);
        self.next_page = Some(in_flight);
    }

    fn on_outcome(&mut self, outcome: FetchOutcome) {
        let slot = match outcome.kind {
            PageKind::First => &mut self.first_page,
            PageKind::Next => &mut self.next_page,
        };
        if slot.as_ref().map(|in_flight| in_flight.ticket) != Some(outcome.ticket) {
            tracing::debug!(
                kind = ?outcome.kind,
                ticket = outcome.ticket,
                "Discarding stale fetch outcome"
            );
            return;
        }
        *slot = None;

        let change = match (outcome.kind, outcome.result) {
            (PageKind::First, Ok(page)) => FeedChange::FirstPageLoaded(page),
            (PageKind::First, Err(cause)) => FeedChange::FirstPageFailed(cause),
            (PageKind::Next, Ok(page)) => FeedChange::NextPageLoaded(page),
            (PageKind::Next, Err(cause)) => FeedChange::NextPageFailed {
                cause,
                policy: self.settings.next_page_failure,
            },
        };
        self.apply(change);
    }

    fn spawn_fetch(&mut self, kind: PageKind, cursor: PageCursor) -> InFlight {
        self.tickets += 1;
        let ticket = self.tickets;
        let source = Arc::clone(&self.source);
        let outcomes = self.outcome_tx.clone();

        tracing::debug!(?kind, ?cursor, ticket, "Dispatching catalog fetch");

        let handle = tokio::spawn(async move {
            let result = source.fetch_page(cursor).await;
            if let Err(cause) = &result {
                tracing::warn!(?kind, ?cursor, error = %cause, "Catalog fetch failed");
            }
            // Receiver is gone once the session ends.
            let _ = outcomes.send(FetchOutcome {
                kind,
                ticket,
                result,
            });
        });

        InFlight { ticket, handle }
    }

    /// Reduce, write the slot and emit, all under the emitter lock.
    ///
    /// A closed emitter means the session is detached and no longer owns the
    /// slot. The change is dropped.
    fn apply(&mut self, change: FeedChange) {
        let sender = self.emitter.sender.lock();
        let Some(sender) = sender.as_ref() else {
            tracing::trace!("Feed change dropped: session detached");
            return;
        };

        let next = {
            let mut slot = self.state.write();
            let current = std::mem::take(&mut *slot);
            let next = FeedReducer::reduce(current, change);
            *slot = next.clone();
            next
        };

        // Consecutive equal states are coalesced
        if self.last_emitted.as_ref() == Some(&next) {
            return;
        }
        if sender.send(next.clone()).is_ok() {
            self.last_emitted = Some(next);
        }
    }

    fn cancel_in_flight(&mut self) {
        for in_flight in [self.first_page.take(), self.next_page.take()]
            .into_iter()
            .flatten()
        {
            in_flight.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Item;
    use async_trait::async_trait;
    use url::Url;

    struct IdleSource;

    #[async_trait]
    impl CatalogSource for IdleSource {
        fn name(&self) -> &str {
            "idle"
        }

        async fn fetch_page(&self, _cursor: PageCursor) -> Result<FetchResult, FetchError> {
            std::future::pending().await
        }
    }

    fn listing() -> ViewState {
        ViewState::DisplayingItems {
            items: vec![Item::new("1", "T1", Url::parse("http://test1.com").unwrap())],
            next_cursor: PageCursor::Page(2),
        }
    }

    fn session(state: ViewState) -> (SessionTask, mpsc::UnboundedReceiver<ViewState>) {
        let (state_tx, state_rx) = mpsc::unbounded_channel();
        let (outcome_tx, _outcome_rx) = mpsc::unbounded_channel();
        let task = SessionTask {
            source: Arc::new(IdleSource),
            settings: FeedSettings::default(),
            state: Arc::new(RwLock::new(state.clone())),
            emitter: Emitter::new(state_tx),
            last_emitted: Some(state),
            outcome_tx,
            first_page: None,
            next_page: None,
            tickets: 0,
        };
        (task, state_rx)
    }

    #[test]
    fn apply_writes_slot_and_emits() {
        let (mut task, mut states) = session(listing());

        task.apply(FeedChange::FirstPageStarted);

        assert_eq!(*task.state.read(), ViewState::LoadingInitial);
        assert_eq!(states.try_recv().ok(), Some(ViewState::LoadingInitial));
    }

    #[test]
    fn apply_coalesces_repeated_state() {
        let (mut task, mut states) = session(ViewState::LoadingInitial);

        task.apply(FeedChange::FirstPageStarted);

        assert!(states.try_recv().is_err());
    }

    #[test]
    fn apply_after_close_leaves_slot_untouched() {
        let (mut task, mut states) = session(listing());
        task.emitter.close();

        task.apply(FeedChange::FirstPageStarted);

        assert_eq!(*task.state.read(), listing());
        assert!(states.try_recv().is_err());
    }
}
