//! Debounced suggestion fetching.
//!
//! Every keystroke cancels the pending fetch and schedules a new one after a
//! quiet period. A generation counter travels with each task; a task only
//! delivers if no newer keystroke or cancel happened in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::services::search_backend::SearchBackend;
use crate::types::errors::SearchError;

/// Identifies which keystroke a suggestion result belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionToken {
    pub tab_id: String,
    pub generation: u64,
}

/// Delivered on the update channel when a scheduled fetch completes.
#[derive(Debug)]
pub struct SuggestionUpdate {
    pub token: SuggestionToken,
    pub query: String,
    pub result: Result<Vec<String>, SearchError>,
}

pub struct SuggestionDebouncer<B> {
    backend: Arc<B>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<SuggestionUpdate>,
}

impl<B: SearchBackend> SuggestionDebouncer<B> {
    /// Creates a debouncer and the receiving end of its update channel.
    pub fn new(
        backend: Arc<B>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Self {
            backend,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            tx,
        };
        (debouncer, rx)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancels any pending fetch and schedules a new one for `query`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&mut self, tab_id: &str, query: &str) -> SuggestionToken {
        self.cancel();
        let generation = self.generation.load(Ordering::SeqCst);
        let token = SuggestionToken {
            tab_id: tab_id.to_string(),
            generation,
        };

        let backend = Arc::clone(&self.backend);
        let current = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        let delay = self.delay;
        let query = query.to_string();
        let task_token = token.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }
            debug!(%query, generation, "fetching suggestions");
            let result = backend.suggestions(&query).await;
            if current.load(Ordering::SeqCst) != generation {
                trace!(%query, generation, "suggestions superseded in flight");
                return;
            }
            let _ = tx.send(SuggestionUpdate {
                token: task_token,
                query,
                result,
            });
        }));

        token
    }

    /// Aborts the pending fetch, if any, and invalidates in-flight results.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether `token` belongs to the most recent keystroke.
    pub fn is_current(&self, token: &SuggestionToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.generation
    }
}

impl<B> Drop for SuggestionDebouncer<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
