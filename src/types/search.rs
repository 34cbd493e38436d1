use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of a search request. Selects both the request payload and the renderer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Web,
    Images,
    Videos,
    News,
    Maps,
}

impl SearchType {
    pub const ALL: [SearchType; 5] = [
        SearchType::Web,
        SearchType::Images,
        SearchType::Videos,
        SearchType::News,
        SearchType::Maps,
    ];

    /// Wire name sent as the request `type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Web => "web",
            SearchType::Images => "images",
            SearchType::Videos => "videos",
            SearchType::News => "news",
            SearchType::Maps => "maps",
        }
    }

    /// Result view used to render results of this type.
    pub fn renderer(&self) -> ResultRenderer {
        match self {
            SearchType::Web => ResultRenderer::WebList,
            SearchType::Images => ResultRenderer::ImageGrid,
            SearchType::Videos => ResultRenderer::VideoList,
            SearchType::News => ResultRenderer::NewsList,
            SearchType::Maps => ResultRenderer::MapView,
        }
    }
}

/// Content-filtering level passed through to the search backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Strict,
    #[default]
    Moderate,
    Off,
}

/// Type-specific result view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResultRenderer {
    WebList,
    ImageGrid,
    VideoList,
    NewsList,
    MapView,
}

/// A single result returned by the search backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "RawSearchResult", rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(flatten)]
    pub kind: ResultKind,
}

/// Variant-specific fields of a result, keyed by the wire `type`.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResultKind {
    Web,
    News {
        source: Option<String>,
        #[serde(rename = "publishedDate")]
        published_date: Option<String>,
    },
    Image {
        thumbnail: Option<String>,
    },
    Video {
        thumbnail: Option<String>,
        duration: Option<String>,
    },
}

/// Loose wire shape: the backend sends type-specific fields either at the top
/// level or inside an untyped `metadata` object.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
    favicon: Option<String>,
    age: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    thumbnail: Option<String>,
    source: Option<String>,
    published_date: Option<String>,
    duration: Option<String>,
    metadata: Option<Value>,
}

impl RawSearchResult {
    fn meta(&self, keys: &[&str]) -> Option<String> {
        let meta = self.metadata.as_ref()?;
        keys.iter().find_map(|k| match meta.get(*k)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }
}

impl From<RawSearchResult> for SearchResult {
    fn from(raw: RawSearchResult) -> Self {
        let kind = match raw.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("news") => ResultKind::News {
                source: raw.source.clone().or_else(|| raw.meta(&["source"])),
                published_date: raw
                    .published_date
                    .clone()
                    .or_else(|| raw.meta(&["publishedDate", "published_date"])),
            },
            Some("image") | Some("images") => ResultKind::Image {
                thumbnail: raw.thumbnail.clone().or_else(|| raw.meta(&["thumbnail"])),
            },
            Some("video") | Some("videos") => ResultKind::Video {
                thumbnail: raw.thumbnail.clone().or_else(|| raw.meta(&["thumbnail"])),
                duration: raw.duration.clone().or_else(|| raw.meta(&["duration"])),
            },
            _ => ResultKind::Web,
        };

        SearchResult {
            title: raw.title,
            url: raw.url,
            description: raw.description,
            favicon: raw.favicon,
            age: raw.age,
            kind,
        }
    }
}

/// Body of `POST /api/web/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub search_type: SearchType,
    pub count: u32,
    pub safe_search: SafeSearch,
    pub incognito: bool,
}

/// Response of `POST /api/web/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub results: Vec<SearchResult>,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub search_time: f64,
}

/// What the results area should show.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum ResultsView {
    Idle,
    Loading,
    Results(ResultRenderer),
    NoResults,
    Error(String),
}

/// The result set currently on screen. Replaced wholesale by each search.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: u64,
    pub search_time: f64,
    pub view: ResultsView,
}

impl Default for ResultSet {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            total_results: 0,
            search_time: 0.0,
            view: ResultsView::Idle,
        }
    }
}

impl ResultSet {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
