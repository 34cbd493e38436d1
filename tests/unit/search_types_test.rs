use chatking::types::history::{HistoryTimestamp, SavedSearch};
use chatking::types::search::{
    ResultKind, ResultRenderer, ResultSet, ResultsView, SafeSearch, SearchRequest,
    SearchResponse, SearchResult, SearchType,
};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case(SearchType::Web, ResultRenderer::WebList)]
#[case(SearchType::Images, ResultRenderer::ImageGrid)]
#[case(SearchType::Videos, ResultRenderer::VideoList)]
#[case(SearchType::News, ResultRenderer::NewsList)]
#[case(SearchType::Maps, ResultRenderer::MapView)]
fn test_renderer_follows_search_type(#[case] search_type: SearchType, #[case] renderer: ResultRenderer) {
    assert_eq!(search_type.renderer(), renderer);
}

#[test]
fn test_search_type_wire_names_match_serde() {
    for t in SearchType::ALL {
        assert_eq!(serde_json::to_value(t).unwrap(), json!(t.as_str()));
    }
}

#[test]
fn test_request_serializes_camel_case() {
    let request = SearchRequest {
        query: "cats".to_string(),
        user_id: "u-1".to_string(),
        search_type: SearchType::Images,
        count: 10,
        safe_search: SafeSearch::Strict,
        incognito: true,
    };
    assert_eq!(
        serde_json::to_value(&request).unwrap(),
        json!({
            "query": "cats",
            "userId": "u-1",
            "type": "images",
            "count": 10,
            "safeSearch": "strict",
            "incognito": true,
        })
    );
}

#[test]
fn test_plain_result_defaults_to_web() {
    let result: SearchResult = serde_json::from_value(json!({
        "title": "OpenAI",
        "url": "https://openai.com",
        "description": "AI research",
        "favicon": "https://openai.com/favicon.ico",
    }))
    .unwrap();
    assert_eq!(result.kind, ResultKind::Web);
    assert_eq!(result.favicon.as_deref(), Some("https://openai.com/favicon.ico"));
    assert_eq!(result.age, None);
}

#[test]
fn test_news_fields_read_from_metadata() {
    let result: SearchResult = serde_json::from_value(json!({
        "title": "Headline",
        "url": "https://news.example/1",
        "description": "",
        "type": "news",
        "metadata": {"source": "Example Times", "publishedDate": "2024-05-01"},
    }))
    .unwrap();
    assert_eq!(
        result.kind,
        ResultKind::News {
            source: Some("Example Times".to_string()),
            published_date: Some("2024-05-01".to_string()),
        }
    );
}

#[test]
fn test_top_level_fields_win_over_metadata() {
    let result: SearchResult = serde_json::from_value(json!({
        "title": "Clip",
        "url": "https://video.example/1",
        "description": "",
        "type": "Videos",
        "thumbnail": "top.jpg",
        "metadata": {"thumbnail": "meta.jpg", "duration": 95},
    }))
    .unwrap();
    assert_eq!(
        result.kind,
        ResultKind::Video {
            thumbnail: Some("top.jpg".to_string()),
            duration: Some("95".to_string()),
        }
    );
}

#[test]
fn test_unknown_type_is_web_and_missing_fields_default() {
    let result: SearchResult = serde_json::from_value(json!({"type": "hologram"})).unwrap();
    assert_eq!(result.kind, ResultKind::Web);
    assert_eq!(result.title, "");
    assert_eq!(result.url, "");
}

#[test]
fn test_result_serializes_with_type_tag() {
    let result: SearchResult = serde_json::from_value(json!({
        "title": "Cat",
        "url": "https://img.example/cat",
        "description": "",
        "type": "image",
        "thumbnail": "cat.jpg",
    }))
    .unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["type"], "image");
    assert_eq!(value["thumbnail"], "cat.jpg");
    assert!(value.get("favicon").is_none());
}

#[test]
fn test_response_tolerates_missing_fields() {
    let response: SearchResponse = serde_json::from_value(json!({"results": []})).unwrap();
    assert_eq!(response, SearchResponse::default());

    let response: SearchResponse = serde_json::from_value(json!({
        "query": "cats",
        "results": [{"title": "a", "url": "b", "description": "c"}],
        "totalResults": 1200,
        "searchTime": 0.31,
    }))
    .unwrap();
    assert_eq!(response.total_results, 1200);
    assert_eq!(response.results.len(), 1);
}

#[test]
fn test_saved_search_accepts_both_timestamp_forms() {
    let millis: SavedSearch = serde_json::from_value(json!({
        "id": "1",
        "query": "cats",
        "timestamp": 1_700_000_000_000i64,
    }))
    .unwrap();
    assert_eq!(millis.timestamp, HistoryTimestamp::Millis(1_700_000_000_000));
    assert!(millis.results.is_empty());

    let text: SavedSearch = serde_json::from_value(json!({
        "id": "2",
        "query": "dogs",
        "results": [],
        "timestamp": "2024-05-01T12:00:00Z",
    }))
    .unwrap();
    assert_eq!(
        text.timestamp,
        HistoryTimestamp::Text("2024-05-01T12:00:00Z".to_string())
    );
}

#[test]
fn test_results_view_serialization() {
    assert_eq!(serde_json::to_value(ResultsView::Loading).unwrap(), json!({"state": "loading"}));
    assert_eq!(
        serde_json::to_value(ResultsView::Results(ResultRenderer::ImageGrid)).unwrap(),
        json!({"state": "results", "detail": "image_grid"})
    );
    assert_eq!(
        serde_json::to_value(ResultsView::NoResults).unwrap(),
        json!({"state": "no_results"})
    );
}

#[test]
fn test_result_set_clear() {
    let mut set = ResultSet {
        query: "cats".to_string(),
        total_results: 3,
        view: ResultsView::NoResults,
        ..ResultSet::default()
    };
    set.clear();
    assert_eq!(set, ResultSet::default());
    assert_eq!(set.view, ResultsView::Idle);
}
