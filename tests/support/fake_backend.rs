//! In-memory `SearchBackend` used by the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use chatking::services::search_backend::SearchBackend;
use chatking::types::errors::SearchError;
use chatking::types::history::SavedSearch;
use chatking::types::search::{SearchRequest, SearchResponse, SearchResult};
use serde_json::json;

pub struct FakeBackend {
    search_response: Mutex<Result<SearchResponse, SearchError>>,
    history: Mutex<Result<Vec<SavedSearch>, SearchError>>,
    suggestions: Vec<String>,
    pub requests: Mutex<Vec<SearchRequest>>,
    pub suggestion_queries: Mutex<Vec<String>>,
    pub history_calls: AtomicUsize,
    pub clear_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            search_response: Mutex::new(Ok(SearchResponse::default())),
            history: Mutex::new(Ok(Vec::new())),
            suggestions: vec!["cat videos".to_string(), "cat memes".to_string()],
            requests: Mutex::new(Vec::new()),
            suggestion_queries: Mutex::new(Vec::new()),
            history_calls: AtomicUsize::new(0),
            clear_calls: AtomicUsize::new(0),
        }
    }

    /// Backend answering every search with `count` results of wire type `kind`.
    pub fn with_results(count: usize, kind: &str) -> Self {
        let backend = Self::new();
        backend.respond_with(Ok(response(count, kind)));
        backend
    }

    pub fn failing() -> Self {
        let backend = Self::new();
        backend.respond_with(Err(SearchError::Network("connection refused".to_string())));
        backend
    }

    pub fn respond_with(&self, response: Result<SearchResponse, SearchError>) {
        *self.search_response.lock().unwrap() = response;
    }

    pub fn set_history(&self, history: Result<Vec<SavedSearch>, SearchError>) {
        *self.history.lock().unwrap() = history;
    }

    pub fn search_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<SearchRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn suggestion_queries(&self) -> Vec<String> {
        self.suggestion_queries.lock().unwrap().clone()
    }
}

/// Decodes `count` wire results of the given `type`.
pub fn results(count: usize, kind: &str) -> Vec<SearchResult> {
    (0..count)
        .map(|i| {
            serde_json::from_value(json!({
                "title": format!("Result {}", i),
                "url": format!("https://example.com/{}", i),
                "description": "sample",
                "type": kind,
                "thumbnail": format!("https://img.example.com/{}.jpg", i),
            }))
            .unwrap()
        })
        .collect()
}

pub fn response(count: usize, kind: &str) -> SearchResponse {
    SearchResponse {
        query: String::new(),
        results: results(count, kind),
        total_results: count as u64 * 10,
        search_time: 0.42,
    }
}

pub fn saved(id: &str, query: &str) -> SavedSearch {
    serde_json::from_value(json!({
        "id": id,
        "query": query,
        "results": [],
        "timestamp": 1_700_000_000_000i64,
    }))
    .unwrap()
}

impl SearchBackend for FakeBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        self.requests.lock().unwrap().push(request.clone());
        self.search_response.lock().unwrap().clone()
    }

    async fn history(&self, _user_id: &str) -> Result<Vec<SavedSearch>, SearchError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.history.lock().unwrap().clone()
    }

    async fn clear_history(&self, _user_id: &str) -> Result<(), SearchError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn suggestions(&self, query: &str) -> Result<Vec<String>, SearchError> {
        self.suggestion_queries.lock().unwrap().push(query.to_string());
        Ok(self.suggestions.clone())
    }
}
