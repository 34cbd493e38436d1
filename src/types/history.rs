use serde::{Deserialize, Serialize};

use super::search::SearchResult;

/// Linear back/forward list of visited URLs or search queries for one tab.
///
/// `cursor == None` is the empty state (index -1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "RawNavigationHistory")]
pub struct NavigationHistory {
    pub(crate) entries: Vec<String>,
    pub(crate) cursor: Option<usize>,
}

#[derive(Deserialize)]
struct RawNavigationHistory {
    #[serde(default)]
    entries: Vec<String>,
    #[serde(default)]
    cursor: Option<usize>,
}

impl TryFrom<RawNavigationHistory> for NavigationHistory {
    type Error = String;

    fn try_from(raw: RawNavigationHistory) -> Result<Self, Self::Error> {
        match raw.cursor {
            Some(i) if i >= raw.entries.len() => Err(format!(
                "history cursor {} out of bounds for {} entries",
                i,
                raw.entries.len()
            )),
            None if !raw.entries.is_empty() => {
                Err("history with entries must have a cursor".to_string())
            }
            cursor => Ok(Self {
                entries: raw.entries,
                cursor,
            }),
        }
    }
}

/// A search saved by the backend's cross-session history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedSearch {
    pub id: String,
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    pub timestamp: HistoryTimestamp,
}

/// The history endpoint has been seen returning both epoch millis and ISO strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum HistoryTimestamp {
    Millis(i64),
    Text(String),
}
