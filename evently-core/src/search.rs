//! Debounced event search.
//!
//! Each call to `search` takes a new generation number, waits out the
//! quiescence window, and only proceeds if no newer call arrived in the
//! meantime. A response that comes back after a newer query was issued is
//! dropped, so a slow early request can never overwrite fresher results.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::api::Backend;
use crate::error::EventlyResult;
use crate::event::Event;
use crate::session::Session;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Results for the most recent query
    Results(Vec<Event>),
    /// A newer query was issued; nothing to apply
    Superseded,
}

#[derive(Debug)]
pub struct SearchDebouncer {
    window: Duration,
    generation: AtomicU64,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        SearchDebouncer {
            window,
            generation: AtomicU64::new(0),
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Search for `query`; a blank query lists all events.
    pub async fn search<B: Backend>(
        &self,
        backend: &B,
        session: &Session,
        query: &str,
    ) -> EventlyResult<SearchOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.window).await;
        if !self.is_current(generation) {
            return Ok(SearchOutcome::Superseded);
        }

        let query = query.trim();
        let result = if query.is_empty() {
            backend.list_events(session).await
        } else {
            backend.search_events(session, query).await
        };

        if !self.is_current(generation) {
            tracing::debug!(query, "discarding stale search response");
            return Ok(SearchOutcome::Superseded);
        }

        result.map(SearchOutcome::Results)
    }
}
