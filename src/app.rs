//! App Core for ChatKing browse.
//!
//! Central struct owning every piece of browse state. UI events become method
//! calls on `App`; network work is either awaited through the async helpers
//! or issued as a [`PendingSearch`] and settled later with `finish_search`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::managers::tab_manager::{TabManager, TabManagerTrait};
use crate::services::address_resolver::{self, Route};
use crate::services::search_backend::{HttpSearchBackend, SearchBackend};
use crate::services::search_dispatcher::{
    DiscardReason, PendingSearch, SearchDispatcher, SearchOutcome, SearchTicket,
};
use crate::services::suggestion_debouncer::{
    SuggestionDebouncer, SuggestionToken, SuggestionUpdate,
};
use crate::types::errors::{BrowseError, SearchError, TabError};
use crate::types::history::SavedSearch;
use crate::types::search::{ResultSet, ResultsView, SafeSearch, SearchResponse, SearchType};
use crate::types::session::{SearchSession, WorkingState};
use crate::types::settings::ChatKingSettings;
use crate::types::tab::{LoadState, TabUpdate};

/// What the UI has to do after a navigation request.
#[derive(Debug, Clone)]
pub enum Navigation {
    /// Load this URL in the content area.
    Page(String),
    /// A search was started; hand it to the backend and settle it with `finish_search`.
    Search(PendingSearch),
}

/// Central browse state owner.
pub struct App<B: SearchBackend> {
    backend: Arc<B>,
    settings: ChatKingSettings,
    tabs: TabManager,
    session: SearchSession,
    working: WorkingState,
    results: ResultSet,
    dispatcher: SearchDispatcher,
    saved_history: Vec<SavedSearch>,
    suggestions: Vec<String>,
    debouncer: SuggestionDebouncer<B>,
}

impl App<HttpSearchBackend> {
    /// Creates an App talking to the HTTP backend configured in `settings`.
    pub fn from_settings(
        settings: ChatKingSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionUpdate>) {
        let backend = Arc::new(HttpSearchBackend::new(&settings.backend));
        App::new(backend, settings)
    }
}

impl<B: SearchBackend> App<B> {
    /// Creates an App with one blank tab. The receiver yields debounced
    /// suggestion results to be passed back into [`App::apply_suggestions`].
    pub fn new(
        backend: Arc<B>,
        settings: ChatKingSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionUpdate>) {
        let (debouncer, suggestion_rx) = SuggestionDebouncer::new(
            Arc::clone(&backend),
            Duration::from_millis(settings.suggestions.debounce_ms),
        );
        let session = SearchSession {
            search_type: settings.search.default_type,
            safe_search: settings.search.safe_search,
            incognito: settings.search.incognito,
        };

        let app = Self {
            backend,
            settings,
            tabs: TabManager::new(),
            session,
            working: WorkingState::default(),
            results: ResultSet::default(),
            dispatcher: SearchDispatcher::new(),
            saved_history: Vec::new(),
            suggestions: Vec::new(),
            debouncer,
        };
        (app, suggestion_rx)
    }

    // ─── Accessors ───

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn settings(&self) -> &ChatKingSettings {
        &self.settings
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn working(&self) -> &WorkingState {
        &self.working
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn saved_history(&self) -> &[SavedSearch] {
        &self.saved_history
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    // ─── Tabs ───

    /// Opens a blank tab, activates it and clears the working state.
    pub fn add_tab(&mut self) -> String {
        let id = self.tabs.add_tab();
        self.working.clear();
        self.results.clear();
        self.reset_suggestions();
        id
    }

    /// Closes a tab; the working state follows whichever tab ends up active.
    pub fn close_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        let was_active = self.tabs.get_tab(tab_id).map(|t| t.is_active);
        self.tabs.close_tab(tab_id)?;
        self.dispatcher.forget_tab(tab_id);
        if was_active == Some(true) {
            self.sync_working_from_active();
            self.reset_suggestions();
        }
        Ok(())
    }

    /// Activates a tab and restores its url and query into the working state.
    pub fn switch_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        self.tabs.switch_tab(tab_id)?;
        self.sync_working_from_active();
        self.reset_suggestions();
        Ok(())
    }

    fn sync_working_from_active(&mut self) {
        let tab = self.tabs.active_tab();
        self.working.loaded_url = tab.url.clone();
        self.working.query = tab.query.clone();
        self.working.address_bar = if tab.url.is_empty() {
            String::new()
        } else {
            Route::from_entry(&tab.url).display_text().to_string()
        };

        let in_flight = self.dispatcher.is_in_flight(&tab.id);
        self.results.clear();
        if in_flight {
            self.results.query = tab.query.clone();
            self.results.view = ResultsView::Loading;
        }
    }

    /// The UI finished loading `url` in `tab_id`. Returns whether the report
    /// was applied; a report for a page the tab has since left is ignored.
    pub fn page_loaded(
        &mut self,
        tab_id: &str,
        url: &str,
        title: Option<&str>,
    ) -> Result<bool, TabError> {
        if !self.is_loading_page(tab_id, url)? {
            debug!(tab_id, url, "stale page load report dropped");
            return Ok(false);
        }
        let update = TabUpdate {
            title: title.map(str::to_string),
            status: Some(LoadState::Loaded),
            ..TabUpdate::default()
        };
        self.tabs.update_tab(tab_id, update)?;
        Ok(true)
    }

    /// The UI failed to load `url` in `tab_id`. Same staleness rule as `page_loaded`.
    pub fn page_failed(&mut self, tab_id: &str, url: &str) -> Result<bool, TabError> {
        if !self.is_loading_page(tab_id, url)? {
            debug!(tab_id, url, "stale page failure report dropped");
            return Ok(false);
        }
        self.tabs
            .update_tab(tab_id, TabUpdate::status(LoadState::Errored))?;
        Ok(true)
    }

    fn is_loading_page(&self, tab_id: &str, url: &str) -> Result<bool, TabError> {
        let tab = self
            .tabs
            .get_tab(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        Ok(tab.url == url && tab.status == LoadState::Loading)
    }

    // ─── Session flags ───

    pub fn set_address_bar(&mut self, text: &str) {
        self.working.address_bar = text.to_string();
    }

    pub fn set_search_type(&mut self, search_type: SearchType) {
        self.session.search_type = search_type;
    }

    pub fn set_safe_search(&mut self, level: SafeSearch) {
        self.session.safe_search = level;
    }

    pub fn set_incognito(&mut self, incognito: bool) {
        info!(incognito, "incognito mode changed");
        self.session.incognito = incognito;
    }

    // ─── Navigation ───

    /// Resolves address bar input and starts the matching navigation.
    pub fn submit(&mut self, input: &str) -> Result<Navigation, BrowseError> {
        match address_resolver::resolve(input).ok_or(BrowseError::EmptyInput)? {
            Route::Navigate { url } => {
                self.open_page(&url, true);
                Ok(Navigation::Page(url))
            }
            Route::Search { query, .. } => self.begin_search(&query).map(Navigation::Search),
        }
    }

    /// Steps back in the active tab's history and replays that entry.
    pub fn go_back(&mut self) -> Option<Navigation> {
        let entry = self.tabs.active_tab_mut().history.go_back()?.to_string();
        Some(self.replay(&entry))
    }

    /// Steps forward in the active tab's history and replays that entry.
    pub fn go_forward(&mut self) -> Option<Navigation> {
        let entry = self.tabs.active_tab_mut().history.go_forward()?.to_string();
        Some(self.replay(&entry))
    }

    /// Replays the current history entry of the active tab.
    pub fn reload(&mut self) -> Option<Navigation> {
        let entry = self.tabs.active_tab().history.current()?.to_string();
        Some(self.replay(&entry))
    }

    fn replay(&mut self, entry: &str) -> Navigation {
        match Route::from_entry(entry) {
            Route::Navigate { url } => {
                self.open_page(&url, false);
                Navigation::Page(url)
            }
            Route::Search { query, search_type } => {
                if let Some(t) = search_type {
                    self.session.search_type = t;
                }
                Navigation::Search(self.start_search(&query, false))
            }
        }
    }

    fn open_page(&mut self, url: &str, record: bool) {
        let tab = self.tabs.active_tab_mut();
        if record {
            tab.history.navigate_to(url);
        }
        debug!(tab_id = %tab.id, url, record, "opening page");
        // The page now owns the tab; a search still in flight here is abandoned.
        let tab_id = tab.id.clone();
        self.dispatcher.forget_tab(&tab_id);
        self.tabs.update_active_tab(TabUpdate {
            title: Some(url.to_string()),
            url: Some(url.to_string()),
            status: Some(LoadState::Loading),
            search_type: Some(None),
            ..TabUpdate::default()
        });
        self.working.address_bar = url.to_string();
        self.working.loaded_url = url.to_string();
        self.results.clear();
        self.reset_suggestions();
    }

    // ─── Search ───

    /// Starts a search on the active tab: records it in the tab's history,
    /// marks the tab loading and returns the request to send.
    pub fn begin_search(&mut self, query: &str) -> Result<PendingSearch, BrowseError> {
        if query.trim().is_empty() {
            return Err(BrowseError::EmptyQuery);
        }
        Ok(self.start_search(query.trim(), true))
    }

    fn start_search(&mut self, query: &str, record: bool) -> PendingSearch {
        let search_type = self.session.search_type;
        let entry = Route::Search {
            query: query.to_string(),
            search_type: Some(search_type),
        }
        .to_entry();

        let tab = self.tabs.active_tab_mut();
        if record {
            tab.history.navigate_to(&entry);
        }
        let tab_id = tab.id.clone();

        self.tabs.update_active_tab(TabUpdate {
            title: Some(query.to_string()),
            url: Some(entry.clone()),
            status: Some(LoadState::Loading),
            search_type: Some(Some(search_type)),
            query: Some(query.to_string()),
        });
        self.working.query = query.to_string();
        self.working.address_bar = query.to_string();
        self.working.loaded_url = entry;

        self.results.clear();
        self.results.query = query.to_string();
        self.results.view = ResultsView::Loading;
        self.reset_suggestions();

        let ticket = self.dispatcher.issue(&tab_id, &self.session);
        let request = SearchDispatcher::build_request(
            query,
            &self.session,
            &self.settings.backend.user_id,
            self.settings.search.result_count,
        );
        info!(%tab_id, query, search_type = search_type.as_str(), generation = ticket.generation, "search started");
        PendingSearch { ticket, request }
    }

    /// Settles a search. Always releases the tab's loading state unless a
    /// newer search on the same tab has taken it over.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        result: Result<SearchResponse, SearchError>,
    ) -> SearchOutcome {
        let Some(tab) = self.tabs.get_tab(&ticket.tab_id) else {
            debug!(tab_id = %ticket.tab_id, "search finished for closed tab");
            return SearchOutcome::Discarded {
                reason: DiscardReason::TabClosed,
            };
        };
        let is_active = tab.is_active;
        let query = tab.query.clone();

        if !self.dispatcher.settle(ticket) {
            debug!(tab_id = %ticket.tab_id, generation = ticket.generation, "stale search result dropped");
            return SearchOutcome::Discarded {
                reason: DiscardReason::Superseded,
            };
        }

        if !is_active {
            let _ = self
                .tabs
                .update_tab(&ticket.tab_id, TabUpdate::status(LoadState::Idle));
            debug!(tab_id = %ticket.tab_id, "search finished for background tab");
            return SearchOutcome::Discarded {
                reason: DiscardReason::TabInactive,
            };
        }

        let outcome = SearchDispatcher::apply(&mut self.results, &query, ticket.search_type, result);
        let status = match outcome {
            SearchOutcome::Failed { .. } => LoadState::Errored,
            _ => LoadState::Loaded,
        };
        let _ = self.tabs.update_tab(&ticket.tab_id, TabUpdate::status(status));
        outcome
    }

    /// Whether settling `ticket` with `outcome` should refresh the saved history.
    pub fn should_reload_history(ticket: &SearchTicket, outcome: &SearchOutcome) -> bool {
        outcome.is_applied_success() && !ticket.incognito
    }

    /// Sends a pending search to the backend and settles it, reloading the
    /// saved history afterwards unless the search was incognito.
    pub async fn dispatch(&mut self, pending: PendingSearch) -> SearchOutcome {
        let backend = Arc::clone(&self.backend);
        let result = backend.search(&pending.request).await;
        let outcome = self.finish_search(&pending.ticket, result);
        if Self::should_reload_history(&pending.ticket, &outcome) {
            let _ = self.reload_history().await;
        }
        outcome
    }

    /// Starts and awaits a search on the active tab.
    pub async fn search(&mut self, query: &str) -> Result<SearchOutcome, BrowseError> {
        let pending = self.begin_search(query)?;
        Ok(self.dispatch(pending).await)
    }

    // ─── Saved history ───

    pub fn apply_saved_history(&mut self, history: Vec<SavedSearch>) {
        debug!(entries = history.len(), "saved history loaded");
        self.saved_history = history;
    }

    pub fn apply_history_cleared(&mut self) {
        self.saved_history.clear();
    }

    /// Fetches the saved search history. On failure the previous list is kept.
    pub async fn reload_history(&mut self) -> Result<(), SearchError> {
        let backend = Arc::clone(&self.backend);
        let user_id = self.settings.backend.user_id.clone();
        match backend.history(&user_id).await {
            Ok(history) => {
                self.apply_saved_history(history);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to load saved history");
                Err(e)
            }
        }
    }

    /// Clears the saved search history on the backend, then locally.
    pub async fn clear_saved_history(&mut self) -> Result<(), SearchError> {
        let backend = Arc::clone(&self.backend);
        let user_id = self.settings.backend.user_id.clone();
        match backend.clear_history(&user_id).await {
            Ok(()) => {
                self.apply_history_cleared();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to clear saved history");
                Err(e)
            }
        }
    }

    // ─── Suggestions ───

    /// Records search box input and schedules a debounced suggestion fetch.
    ///
    /// Returns `None` when nothing was scheduled (blank input or suggestions
    /// disabled). Must be called from within a tokio runtime.
    pub fn type_query(&mut self, text: &str) -> Option<SuggestionToken> {
        self.working.query = text.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() || !self.settings.suggestions.enabled {
            self.reset_suggestions();
            return None;
        }
        let tab_id = self.tabs.active_tab().id.clone();
        Some(self.debouncer.schedule(&tab_id, trimmed))
    }

    /// Applies a suggestion result if it still belongs to the latest
    /// keystroke on the active tab. Returns whether it was applied.
    pub fn apply_suggestions(&mut self, update: SuggestionUpdate) -> bool {
        if !self.debouncer.is_current(&update.token)
            || update.token.tab_id != self.tabs.active_tab().id
        {
            debug!(query = %update.query, "stale suggestions dropped");
            return false;
        }
        match update.result {
            Ok(suggestions) => self.suggestions = suggestions,
            Err(e) => {
                warn!(query = %update.query, error = %e, "suggestion fetch failed");
                self.suggestions.clear();
            }
        }
        true
    }

    fn reset_suggestions(&mut self) {
        self.debouncer.cancel();
        self.suggestions.clear();
    }
}
