//! Catalog source that answers from a script.
//!
//! Each `fetch_page` call pops the next scripted answer. Gated answers stay
//! pending until the test resolves them, which makes in-flight fetches and
//! their cancellation observable.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagefeed::catalog::{CatalogSource, FetchError, FetchResult, Item, PageCursor};
use parking_lot::Mutex;
use tokio::sync::oneshot;

use super::WAIT;

type Answer = Result<FetchResult, FetchError>;

enum Scripted {
    Ready(Answer),
    Gated {
        receiver: oneshot::Receiver<Answer>,
        cancelled: Arc<AtomicBool>,
    },
}

/// Test-side handle of a gated answer.
pub struct Gate {
    sender: Option<oneshot::Sender<Answer>>,
    cancelled: Arc<AtomicBool>,
}

impl Gate {
    /// Deliver the answer. Returns false if the fetch was dropped.
    pub fn resolve(mut self, answer: Answer) -> bool {
        match self.sender.take() {
            Some(sender) => sender.send(answer).is_ok(),
            None => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until the pending fetch has been dropped by the engine.
    pub async fn wait_cancelled(&self) {
        let deadline = tokio::time::Instant::now() + WAIT;
        while !self.is_cancelled() {
            assert!(
                tokio::time::Instant::now() < deadline,
                "gated fetch was never cancelled"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

/// Flags the gate as cancelled when the fetch future is dropped early.
struct CancelOnDrop {
    flag: Arc<AtomicBool>,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

#[derive(Default)]
pub struct ScriptedCatalog {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<PageCursor>>,
}

impl ScriptedCatalog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, answer: Answer) {
        self.script.lock().push_back(Scripted::Ready(answer));
    }

    pub fn respond_ok(&self, items: Vec<Item>, next_cursor: PageCursor) {
        self.respond(Ok(FetchResult::new(items, next_cursor)));
    }

    pub fn respond_err(&self, cause: FetchError) {
        self.respond(Err(cause));
    }

    /// Script an answer that stays pending until the returned gate resolves.
    pub fn gate(&self) -> Gate {
        let (sender, receiver) = oneshot::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        self.script.lock().push_back(Scripted::Gated {
            receiver,
            cancelled: Arc::clone(&cancelled),
        });
        Gate {
            sender: Some(sender),
            cancelled,
        }
    }

    /// Cursors of every fetch started so far, in order.
    pub fn calls(&self) -> Vec<PageCursor> {
        self.calls.lock().clone()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        let deadline = tokio::time::Instant::now() + WAIT;
        while self.calls.lock().len() < count {
            assert!(
                tokio::time::Instant::now() < deadline,
                "expected {count} fetch calls, saw {:?}",
                self.calls()
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl CatalogSource for ScriptedCatalog {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn fetch_page(&self, cursor: PageCursor) -> Result<FetchResult, FetchError> {
        self.calls.lock().push(cursor);
        let next = self.script.lock().pop_front();

        match next {
            Some(Scripted::Ready(answer)) => answer,
            Some(Scripted::Gated {
                receiver,
                cancelled,
            }) => {
                let mut guard = CancelOnDrop {
                    flag: cancelled,
                    armed: true,
                };
                let answer = receiver
                    .await
                    .unwrap_or_else(|_| Err(FetchError::Other("gate dropped".to_string())));
                guard.armed = false;
                answer
            }
            // Unscripted calls never finish
            None => std::future::pending().await,
        }
    }
}
