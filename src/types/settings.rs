use serde::{Deserialize, Serialize};

use super::search::{SafeSearch, SearchType};

/// Top-level ChatKing settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatKingSettings {
    pub backend: BackendSettings,
    pub search: SearchSettings,
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where the search backend lives and who we are to it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    pub base_url: String,
    pub user_id: String,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            user_id: "guest".to_string(),
            timeout_secs: 15,
        }
    }
}

/// Defaults applied to every new search session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchSettings {
    pub result_count: u32,
    pub safe_search: SafeSearch,
    pub default_type: SearchType,
    pub incognito: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            result_count: 10,
            safe_search: SafeSearch::Moderate,
            default_type: SearchType::Web,
            incognito: false,
        }
    }
}

/// Address-bar suggestion behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionSettings {
    pub enabled: bool,
    /// Quiescence window after the last keystroke before fetching.
    pub debounce_ms: u64,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 300,
        }
    }
}

/// Log filter used when `CHATKING_LOG` is not set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
