use serde::{Deserialize, Serialize};

use super::history::NavigationHistory;
use super::search::SearchType;

/// Title given to freshly opened tabs.
pub const NEW_TAB_TITLE: &str = "New Tab";

/// Represents a browse tab with its current state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub url: String,
    pub is_active: bool,
    pub status: LoadState,
    pub search_type: Option<SearchType>,
    /// Last query typed or searched in this tab.
    pub query: String,
    pub history: NavigationHistory,
    pub created_at: i64,
}

impl Tab {
    pub fn is_loading(&self) -> bool {
        self.status == LoadState::Loading
    }
}

/// Per-tab load state machine: Idle -> Loading -> {Loaded | Errored}.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

/// Partial update merged into a tab. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub status: Option<LoadState>,
    /// `Some(None)` clears the search type.
    pub search_type: Option<Option<SearchType>>,
    pub query: Option<String>,
}

impl TabUpdate {
    pub fn status(status: LoadState) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}
