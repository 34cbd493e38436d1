//! RPC method handler for the ChatKing JSON-RPC protocol.
//!
//! Kept apart from `rpc_server.rs` so it can be unit-tested without stdio.
//! `handle_method` applies a UI event to the [`App`] synchronously; anything
//! that needs the network comes back as a [`BackgroundTask`] for the server
//! loop to spawn. Its [`Completion`] is later folded back in with
//! `apply_completion`.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::app::{App, Navigation};
use crate::managers::tab_manager::TabManagerTrait;
use crate::services::search_backend::SearchBackend;
use crate::services::search_dispatcher::{PendingSearch, SearchTicket};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::SearchError;
use crate::types::history::SavedSearch;
use crate::types::search::{SafeSearch, SearchResponse, SearchType};
use crate::types::tab::Tab;

/// Network work requested by a handled method.
#[derive(Debug, Clone)]
pub enum BackgroundTask {
    Search(PendingSearch),
    ReloadHistory,
    ClearHistory,
}

/// Result of handling one request.
#[derive(Debug)]
pub enum Handled {
    Reply(Value),
    Deferred { reply: Value, task: BackgroundTask },
}

/// A finished background task, ready to be applied to the App.
#[derive(Debug)]
pub enum Completion {
    Search {
        ticket: SearchTicket,
        result: Result<SearchResponse, SearchError>,
    },
    History(Result<Vec<SavedSearch>, SearchError>),
    HistoryCleared(Result<(), SearchError>),
}

fn str_param<'a>(params: &'a Value, key: &str) -> Result<&'a str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn enum_param<T: serde::de::DeserializeOwned>(params: &Value, key: &str) -> Result<T, String> {
    let raw = params.get(key).cloned().ok_or_else(|| format!("missing {}", key))?;
    serde_json::from_value(raw).map_err(|e| format!("invalid {}: {}", key, e))
}

pub fn tab_json(tab: &Tab) -> Value {
    json!({
        "id": tab.id,
        "title": tab.title,
        "url": tab.url,
        "isActive": tab.is_active,
        "isLoading": tab.is_loading(),
        "status": tab.status,
        "searchType": tab.search_type,
    })
}

/// Back/forward state of the active tab.
pub fn nav_state<B: SearchBackend>(app: &App<B>) -> Value {
    let history = &app.tabs().active_tab().history;
    json!({
        "index": history.index(),
        "entries": history.entries(),
        "canGoBack": history.can_go_back(),
        "canGoForward": history.can_go_forward(),
        "addressBar": app.working().address_bar,
        "loadedUrl": app.working().loaded_url,
        "query": app.working().query,
    })
}

fn navigation_reply<B: SearchBackend>(app: &App<B>, nav: Option<Navigation>) -> Handled {
    match nav {
        None => Handled::Reply(json!({"moved": false})),
        Some(Navigation::Page(url)) => Handled::Reply(json!({
            "moved": true,
            "navigate": url,
            "tab": tab_json(app.tabs().active_tab()),
        })),
        Some(Navigation::Search(pending)) => Handled::Deferred {
            reply: json!({
                "moved": true,
                "search": pending.ticket,
                "tab": tab_json(app.tabs().active_tab()),
            }),
            task: BackgroundTask::Search(pending),
        },
    }
}

/// Dispatch a JSON-RPC method call.
///
/// Returns `Ok(Handled)` on success or `Err(String)` with an error message.
pub fn handle_method<B: SearchBackend>(
    app: &mut App<B>,
    settings: &mut SettingsEngine,
    method: &str,
    params: &Value,
) -> Result<Handled, String> {
    match method {
        // ─── Tabs ───
        "tab.new" => {
            let id = app.add_tab();
            Ok(Handled::Reply(json!({"id": id})))
        }
        "tab.close" => {
            let id = str_param(params, "id")?;
            app.close_tab(id).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(json!({"active": app.tabs().active_tab().id})))
        }
        "tab.switch" => {
            let id = str_param(params, "id")?;
            app.switch_tab(id).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(nav_state(app)))
        }
        "tab.list" => {
            let tabs: Vec<Value> = app.tabs().get_all_tabs().iter().map(tab_json).collect();
            Ok(Handled::Reply(json!(tabs)))
        }
        "tab.loaded" => {
            let id = str_param(params, "id")?;
            let url = str_param(params, "url")?;
            let title = params.get("title").and_then(|v| v.as_str());
            let applied = app.page_loaded(id, url, title).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(json!({"applied": applied})))
        }
        "tab.failed" => {
            let id = str_param(params, "id")?;
            let url = str_param(params, "url")?;
            let applied = app.page_failed(id, url).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(json!({"applied": applied})))
        }

        // ─── Navigation ───
        "nav.submit" => {
            let input = str_param(params, "input")?;
            let nav = app.submit(input).map_err(|e| e.to_string())?;
            Ok(navigation_reply(app, Some(nav)))
        }
        "nav.back" => {
            let nav = app.go_back();
            Ok(navigation_reply(app, nav))
        }
        "nav.forward" => {
            let nav = app.go_forward();
            Ok(navigation_reply(app, nav))
        }
        "nav.reload" => {
            let nav = app.reload();
            Ok(navigation_reply(app, nav))
        }
        "nav.state" => Ok(Handled::Reply(nav_state(app))),
        "nav.address" => {
            let text = str_param(params, "text")?;
            app.set_address_bar(text);
            Ok(Handled::Reply(json!({"ok": true})))
        }

        // ─── Search ───
        "search.submit" => {
            let query = str_param(params, "query")?;
            if let Some(raw) = params.get("type") {
                let search_type: SearchType = serde_json::from_value(raw.clone())
                    .map_err(|e| format!("invalid type: {}", e))?;
                app.set_search_type(search_type);
            }
            let pending = app.begin_search(query).map_err(|e| e.to_string())?;
            Ok(navigation_reply(app, Some(Navigation::Search(pending))))
        }
        "search.set_type" => {
            let search_type: SearchType = enum_param(params, "type")?;
            app.set_search_type(search_type);
            Ok(Handled::Reply(json!({"type": search_type})))
        }
        "search.set_safe_search" => {
            let level: SafeSearch = enum_param(params, "level")?;
            app.set_safe_search(level);
            Ok(Handled::Reply(json!({"level": level})))
        }
        "search.set_incognito" => {
            let incognito = params
                .get("enabled")
                .and_then(|v| v.as_bool())
                .ok_or("missing enabled")?;
            app.set_incognito(incognito);
            Ok(Handled::Reply(json!({"incognito": incognito})))
        }
        "search.results" => {
            let results = serde_json::to_value(app.results()).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(results))
        }
        "search.session" => {
            let session = serde_json::to_value(app.session()).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(session))
        }
        "search.type_query" => {
            let text = str_param(params, "text")?;
            let scheduled = app.type_query(text).is_some();
            Ok(Handled::Reply(json!({"scheduled": scheduled})))
        }
        "search.suggestions" => Ok(Handled::Reply(json!(app.suggestions()))),

        // ─── Saved history ───
        "history.list" => {
            let history = serde_json::to_value(app.saved_history()).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(history))
        }
        "history.reload" => Ok(Handled::Deferred {
            reply: json!({"ok": true}),
            task: BackgroundTask::ReloadHistory,
        }),
        "history.clear" => Ok(Handled::Deferred {
            reply: json!({"ok": true}),
            task: BackgroundTask::ClearHistory,
        }),

        // ─── Settings ───
        "settings.get" => {
            let json_val =
                serde_json::to_value(settings.get_settings()).map_err(|e| e.to_string())?;
            Ok(Handled::Reply(json_val))
        }
        "settings.set" => {
            let key = str_param(params, "key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            settings.set_value(key, value).map_err(|e| e.to_string())?;
            // Search flags apply to the running session; the rest on next start.
            let current = settings.get_settings().search.clone();
            match key {
                "search.safe_search" => app.set_safe_search(current.safe_search),
                "search.incognito" => app.set_incognito(current.incognito),
                "search.default_type" => app.set_search_type(current.default_type),
                _ => {}
            }
            Ok(Handled::Reply(json!({"ok": true})))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Runs a background task against the backend.
pub async fn run_task<B: SearchBackend>(
    backend: Arc<B>,
    user_id: String,
    task: BackgroundTask,
) -> Completion {
    match task {
        BackgroundTask::Search(pending) => Completion::Search {
            result: backend.search(&pending.request).await,
            ticket: pending.ticket,
        },
        BackgroundTask::ReloadHistory => Completion::History(backend.history(&user_id).await),
        BackgroundTask::ClearHistory => {
            Completion::HistoryCleared(backend.clear_history(&user_id).await)
        }
    }
}

/// Applies a finished task. Returns the event to emit and an optional follow-up task.
pub fn apply_completion<B: SearchBackend>(
    app: &mut App<B>,
    completion: Completion,
) -> (Value, Option<BackgroundTask>) {
    match completion {
        Completion::Search { ticket, result } => {
            let outcome = app.finish_search(&ticket, result);
            let follow_up = App::<B>::should_reload_history(&ticket, &outcome)
                .then_some(BackgroundTask::ReloadHistory);
            let event = json!({
                "event": "search.finished",
                "ticket": ticket,
                "outcome": outcome,
            });
            (event, follow_up)
        }
        Completion::History(Ok(history)) => {
            let count = history.len();
            app.apply_saved_history(history);
            (json!({"event": "history.loaded", "count": count}), None)
        }
        Completion::History(Err(e)) => {
            tracing::warn!(error = %e, "failed to load saved history");
            (json!({"event": "history.loaded", "error": e.to_string()}), None)
        }
        Completion::HistoryCleared(Ok(())) => {
            app.apply_history_cleared();
            (json!({"event": "history.cleared"}), None)
        }
        Completion::HistoryCleared(Err(e)) => {
            tracing::warn!(error = %e, "failed to clear saved history");
            (json!({"event": "history.cleared", "error": e.to_string()}), None)
        }
    }
}
