//! The search backend seam and its JSON-over-HTTP implementation.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /api/web/search`
//! - `GET  /api/web/history/{userId}`
//! - `POST /api/web/clear-history`
//! - `GET  /api/web/suggestions?query=...`

use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::errors::SearchError;
use crate::types::history::SavedSearch;
use crate::types::search::{SearchRequest, SearchResponse};
use crate::types::settings::BackendSettings;

/// Operations the browse core needs from the search backend.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;

    fn history(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<SavedSearch>, SearchError>> + Send;

    fn clear_history(&self, user_id: &str)
        -> impl Future<Output = Result<(), SearchError>> + Send;

    fn suggestions(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send;
}

#[derive(Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    history: Vec<SavedSearch>,
}

#[derive(Deserialize)]
struct SuggestionsResponse {
    #[serde(default)]
    suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClearHistoryRequest<'a> {
    user_id: &'a str,
}

/// reqwest-backed [`SearchBackend`].
pub struct HttpSearchBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSearchBackend {
    pub fn new(settings: &BackendSettings) -> Self {
        // Builder only fails on TLS backend init; fall back to a default client.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(
        url: &str,
        resp: reqwest::Response,
    ) -> Result<T, SearchError> {
        if !resp.status().is_success() {
            return Err(SearchError::Http {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| SearchError::Decode(e.to_string()))
    }
}

impl SearchBackend for HttpSearchBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = self.endpoint("/api/web/search");
        debug!(%url, query = %request.query, search_type = request.search_type.as_str(), "search request");
        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        Self::read_json(&url, resp).await
    }

    async fn history(&self, user_id: &str) -> Result<Vec<SavedSearch>, SearchError> {
        let mut url = reqwest::Url::parse(&self.endpoint("/api/web/history/"))
            .map_err(|e| SearchError::Network(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SearchError::Network("backend base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push(user_id);
        let url = url.to_string();
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        let body: HistoryResponse = Self::read_json(&url, resp).await?;
        Ok(body.history)
    }

    async fn clear_history(&self, user_id: &str) -> Result<(), SearchError> {
        let url = self.endpoint("/api/web/clear-history");
        let resp = self
            .client
            .post(&url)
            .json(&ClearHistoryRequest { user_id })
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(SearchError::Http {
                status: resp.status().as_u16(),
                url,
            });
        }
        Ok(())
    }

    async fn suggestions(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let url = self.endpoint("/api/web/suggestions");
        let resp = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        let body: SuggestionsResponse = Self::read_json(&url, resp).await?;
        Ok(body.suggestions)
    }
}
