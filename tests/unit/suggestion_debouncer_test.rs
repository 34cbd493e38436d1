//! Debounced suggestion fetching, driven on a paused tokio clock.

#[path = "../support/fake_backend.rs"]
mod fake_backend;

use std::sync::Arc;
use std::time::Duration;

use chatking::app::App;
use chatking::services::suggestion_debouncer::SuggestionDebouncer;
use chatking::types::settings::ChatKingSettings;
use fake_backend::FakeBackend;
use tokio::time::{sleep, timeout, Instant};

fn app() -> (
    App<FakeBackend>,
    tokio::sync::mpsc::UnboundedReceiver<chatking::services::suggestion_debouncer::SuggestionUpdate>,
    Arc<FakeBackend>,
) {
    let backend = Arc::new(FakeBackend::new());
    let (app, rx) = App::new(Arc::clone(&backend), ChatKingSettings::default());
    (app, rx, backend)
}

#[tokio::test(start_paused = true)]
async fn test_quick_typing_fetches_once_after_quiet_period() {
    let (mut app, mut rx, backend) = app();
    let start = Instant::now();

    app.type_query("c");
    sleep(Duration::from_millis(50)).await;
    app.type_query("ca");
    sleep(Duration::from_millis(50)).await;
    app.type_query("cat");

    let update = rx.recv().await.unwrap();
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(400), "fetched too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(410), "fetched too late: {:?}", elapsed);

    assert_eq!(update.query, "cat");
    assert_eq!(backend.suggestion_queries(), vec!["cat".to_string()]);
    assert!(app.apply_suggestions(update));
    assert_eq!(app.suggestions(), &["cat videos", "cat memes"]);
}

#[tokio::test(start_paused = true)]
async fn test_result_for_older_keystroke_is_not_applied() {
    let (mut app, mut rx, backend) = app();

    app.type_query("ca");
    sleep(Duration::from_millis(350)).await;
    // "ca" was fetched and delivered, but not applied before the next keystroke.
    app.type_query("cat");

    let stale = rx.recv().await.unwrap();
    assert_eq!(stale.query, "ca");
    assert!(!app.apply_suggestions(stale));
    assert!(app.suggestions().is_empty());

    let fresh = rx.recv().await.unwrap();
    assert_eq!(fresh.query, "cat");
    assert!(app.apply_suggestions(fresh));
    assert_eq!(backend.suggestion_queries(), vec!["ca".to_string(), "cat".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_switching_tabs_cancels_pending_fetch() {
    let (mut app, mut rx, backend) = app();

    app.type_query("cat");
    sleep(Duration::from_millis(100)).await;
    app.add_tab();

    assert!(timeout(Duration::from_secs(1), rx.recv()).await.is_err());
    assert!(backend.suggestion_queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_blank_input_clears_and_schedules_nothing() {
    let (mut app, mut rx, backend) = app();

    assert!(app.type_query("   ").is_none());
    assert_eq!(app.working().query, "   ");
    assert!(timeout(Duration::from_secs(1), rx.recv()).await.is_err());
    assert!(backend.suggestion_queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_suggestions_never_fetch() {
    let backend = Arc::new(FakeBackend::new());
    let mut settings = ChatKingSettings::default();
    settings.suggestions.enabled = false;
    let (mut app, mut rx) = App::new(Arc::clone(&backend), settings);

    assert!(app.type_query("cat").is_none());
    assert!(timeout(Duration::from_secs(1), rx.recv()).await.is_err());
    assert!(backend.suggestion_queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_debouncer_tokens_track_generations() {
    let backend = Arc::new(FakeBackend::new());
    let (mut debouncer, mut rx) = SuggestionDebouncer::new(backend, Duration::from_millis(300));
    assert_eq!(debouncer.delay(), Duration::from_millis(300));

    let first = debouncer.schedule("tab-1", "r");
    let second = debouncer.schedule("tab-1", "ru");
    assert!(!debouncer.is_current(&first));
    assert!(debouncer.is_current(&second));

    let update = rx.recv().await.unwrap();
    assert_eq!(update.token, second);
    assert_eq!(update.query, "ru");

    debouncer.cancel();
    assert!(!debouncer.is_current(&second));
}
