//! Address bar resolution: decides whether free text is a URL or a search query.
//!
//! The classification rule is deliberately naive: anything containing a `.`
//! or starting with a known scheme is a URL. "node.js tutorial" classifies as
//! a URL; `resolve` only rescues it because it cannot be parsed as one.

use serde::Serialize;
use url::Url;

use crate::types::search::SearchType;

/// Scheme prefixes that mark input as a URL regardless of dots.
pub const URL_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "file://", "about:"];

/// Internal scheme used to record searches in the navigation history.
const SEARCH_ENTRY_BASE: &str = "chatking://search";

/// Raw classification of address bar input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Url,
    Query,
    Empty,
}

/// Where an input (or a history entry) leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Route {
    Navigate { url: String },
    Search {
        query: String,
        search_type: Option<SearchType>,
    },
}

impl Route {
    pub fn search(query: &str) -> Self {
        Route::Search {
            query: query.to_string(),
            search_type: None,
        }
    }

    /// String stored in the navigation history for this route.
    pub fn to_entry(&self) -> String {
        match self {
            Route::Navigate { url } => url.clone(),
            Route::Search { query, search_type } => {
                let mut params = vec![("q", query.as_str())];
                if let Some(t) = search_type {
                    params.push(("type", t.as_str()));
                }
                Url::parse_with_params(SEARCH_ENTRY_BASE, &params)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| query.clone())
            }
        }
    }

    /// Inverse of [`Route::to_entry`]. Anything that is not a search entry is a URL.
    pub fn from_entry(entry: &str) -> Self {
        if entry.starts_with(SEARCH_ENTRY_BASE) {
            if let Ok(url) = Url::parse(entry) {
                let mut query = None;
                let mut search_type = None;
                for (key, value) in url.query_pairs() {
                    match key.as_ref() {
                        "q" => query = Some(value.into_owned()),
                        "type" => {
                            search_type = serde_json::from_value(serde_json::Value::String(
                                value.into_owned(),
                            ))
                            .ok()
                        }
                        _ => {}
                    }
                }
                if let Some(query) = query {
                    return Route::Search { query, search_type };
                }
            }
        }
        Route::Navigate {
            url: entry.to_string(),
        }
    }

    /// Text shown in the address bar for this route.
    pub fn display_text(&self) -> &str {
        match self {
            Route::Navigate { url } => url,
            Route::Search { query, .. } => query,
        }
    }
}

fn has_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    URL_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Classifies trimmed input as URL, query, or empty.
pub fn classify(input: &str) -> InputKind {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        InputKind::Empty
    } else if trimmed.contains('.') || has_scheme(trimmed) {
        InputKind::Url
    } else {
        InputKind::Query
    }
}

/// Turns URL-ish input into an absolute URL, adding `https://` when no scheme is given.
pub fn normalize_url(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };
    Url::parse(&candidate).ok().map(|u| u.to_string())
}

/// Resolves address bar input into a route. `None` for blank input.
pub fn resolve(input: &str) -> Option<Route> {
    match classify(input) {
        InputKind::Empty => None,
        InputKind::Query => Some(Route::search(input.trim())),
        InputKind::Url => Some(match normalize_url(input) {
            Some(url) => Route::Navigate { url },
            None => Route::search(input.trim()),
        }),
    }
}
