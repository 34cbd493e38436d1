use serde::{Deserialize, Serialize};

use super::search::{SafeSearch, SearchType};

/// Search preferences shared by every tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSession {
    pub search_type: SearchType,
    pub safe_search: SafeSearch,
    /// Suppresses writes to (and reloads of) the saved search history.
    pub incognito: bool,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self {
            search_type: SearchType::Web,
            safe_search: SafeSearch::Moderate,
            incognito: false,
        }
    }
}

/// What the address bar and content area currently show for the active tab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkingState {
    pub address_bar: String,
    pub loaded_url: String,
    pub query: String,
}

impl WorkingState {
    pub fn clear(&mut self) {
        self.address_bar.clear();
        self.loaded_url.clear();
        self.query.clear();
    }
}
