//! Search Dispatcher.
//!
//! Issues tickets for in-flight searches, builds backend requests from the
//! session, and folds a backend response (or failure) into the visible
//! result set. Each tab keeps only its latest ticket; older completions are
//! recognized as superseded and dropped.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::types::errors::SearchError;
use crate::types::search::{
    ResultRenderer, ResultSet, ResultsView, SearchRequest, SearchResponse, SearchType,
};
use crate::types::session::SearchSession;

/// Identifies one search request issued for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTicket {
    pub tab_id: String,
    pub generation: u64,
    pub search_type: SearchType,
    /// Incognito flag at the time the search was issued.
    pub incognito: bool,
}

/// A search that has been started and is waiting for the backend.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    pub ticket: SearchTicket,
    pub request: SearchRequest,
}

/// Why a completed search was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// A newer search on the same tab owns the result area.
    Superseded,
    TabClosed,
    TabInactive,
}

/// Result of settling a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Loaded {
        count: usize,
        renderer: ResultRenderer,
    },
    /// Successful response with zero results.
    Empty,
    Failed {
        error: String,
    },
    Discarded {
        reason: DiscardReason,
    },
}

impl SearchOutcome {
    /// True when a response was received and applied (with or without results).
    pub fn is_applied_success(&self) -> bool {
        matches!(self, SearchOutcome::Loaded { .. } | SearchOutcome::Empty)
    }
}

/// Tracks in-flight searches and applies their outcomes.
#[derive(Debug, Default)]
pub struct SearchDispatcher {
    next_generation: u64,
    latest: HashMap<String, u64>,
}

impl SearchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the request body for a search from the session flags.
    pub fn build_request(
        query: &str,
        session: &SearchSession,
        user_id: &str,
        count: u32,
    ) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            user_id: user_id.to_string(),
            search_type: session.search_type,
            count,
            safe_search: session.safe_search,
            incognito: session.incognito,
        }
    }

    /// Issues a ticket for a new search on `tab_id`, superseding any earlier one.
    pub fn issue(&mut self, tab_id: &str, session: &SearchSession) -> SearchTicket {
        self.next_generation += 1;
        self.latest.insert(tab_id.to_string(), self.next_generation);
        SearchTicket {
            tab_id: tab_id.to_string(),
            generation: self.next_generation,
            search_type: session.search_type,
            incognito: session.incognito,
        }
    }

    /// Consumes the ticket if it is the latest for its tab.
    pub fn settle(&mut self, ticket: &SearchTicket) -> bool {
        match self.latest.get(&ticket.tab_id) {
            Some(&gen) if gen == ticket.generation => {
                self.latest.remove(&ticket.tab_id);
                true
            }
            _ => false,
        }
    }

    pub fn is_in_flight(&self, tab_id: &str) -> bool {
        self.latest.contains_key(tab_id)
    }

    /// Drops in-flight bookkeeping for a closed tab.
    pub fn forget_tab(&mut self, tab_id: &str) {
        self.latest.remove(tab_id);
    }

    /// Replaces `results` with the backend outcome. Results keep backend order.
    pub fn apply(
        results: &mut ResultSet,
        query: &str,
        search_type: SearchType,
        outcome: Result<SearchResponse, SearchError>,
    ) -> SearchOutcome {
        results.clear();
        results.query = query.to_string();

        match outcome {
            Ok(resp) if resp.results.is_empty() => {
                info!(query, "search returned no results");
                results.total_results = resp.total_results;
                results.search_time = resp.search_time;
                results.view = ResultsView::NoResults;
                SearchOutcome::Empty
            }
            Ok(resp) => {
                let renderer = search_type.renderer();
                let count = resp.results.len();
                info!(query, count, ?renderer, "search results applied");
                results.results = resp.results;
                results.total_results = resp.total_results;
                results.search_time = resp.search_time;
                results.view = ResultsView::Results(renderer);
                SearchOutcome::Loaded { count, renderer }
            }
            Err(err) => {
                warn!(query, error = %err, "search failed");
                results.view = ResultsView::Error(err.to_string());
                SearchOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }
}
