//! ChatKing RPC Server: JSON-RPC over stdin/stdout for the UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"nav.submit", "params":{"input":"openai.com"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"search.finished", ...} written whenever async work completes.
//!
//! Everything runs on one current-thread runtime: requests, backend
//! completions and suggestion deliveries are processed one at a time.

use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use chatking::app::App;
use chatking::logging;
use chatking::rpc_handler::{apply_completion, handle_method, run_task, BackgroundTask, Handled};
use chatking::services::search_backend::{HttpSearchBackend, SearchBackend};
use chatking::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

async fn emit(out: &mut tokio::io::Stdout, value: &Value) {
    let mut line = value.to_string();
    line.push('\n');
    if let Err(e) = out.write_all(line.as_bytes()).await {
        warn!(error = %e, "failed to write to stdout");
        return;
    }
    let _ = out.flush().await;
}

fn spawn_task<B: SearchBackend>(
    app: &App<B>,
    task: BackgroundTask,
    tx: &mpsc::UnboundedSender<chatking::rpc_handler::Completion>,
) {
    let backend = app.backend();
    let user_id = app.settings().backend.user_id.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = run_task(backend, user_id, task).await;
        let _ = tx.send(completion);
    });
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let mut settings_engine = SettingsEngine::new(None);
    let settings = match settings_engine.load() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("chatking: {}; falling back to defaults", e);
            settings_engine.get_settings().clone()
        }
    };
    logging::init(&settings.logging.level);
    info!(config = settings_engine.get_config_path(), backend = %settings.backend.base_url, "starting chatking-rpc");

    let (mut app, mut suggestion_rx) = App::<HttpSearchBackend>::from_settings(settings);
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel();

    let mut out = tokio::io::stdout();
    emit(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await;

    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(l)) => l,
                    Ok(None) => break,
                    Err(e) => {
                        warn!(error = %e, "stdin read failed");
                        break;
                    }
                };
                if line.trim().is_empty() { continue; }

                let req: Value = match serde_json::from_str(&line) {
                    Ok(v) => v,
                    Err(e) => {
                        emit(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)})).await;
                        continue;
                    }
                };
                let id = req.get("id").cloned().unwrap_or(Value::Null);

                if !rate_limiter.check() {
                    emit(&mut out, &json!({"id": id, "error": "rate limit exceeded"})).await;
                    continue;
                }

                let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                let params = req.get("params").cloned().unwrap_or(json!({}));

                let response = match handle_method(&mut app, &mut settings_engine, method, &params) {
                    Ok(Handled::Reply(val)) => json!({"id": id, "result": val}),
                    Ok(Handled::Deferred { reply, task }) => {
                        spawn_task(&app, task, &completion_tx);
                        json!({"id": id, "result": reply})
                    }
                    Err(err) => json!({"id": id, "error": err}),
                };
                emit(&mut out, &response).await;
            }
            Some(completion) = completion_rx.recv() => {
                let (event, follow_up) = apply_completion(&mut app, completion);
                if let Some(task) = follow_up {
                    spawn_task(&app, task, &completion_tx);
                }
                emit(&mut out, &event).await;
            }
            Some(update) = suggestion_rx.recv() => {
                let query = update.query.clone();
                if app.apply_suggestions(update) {
                    emit(&mut out, &json!({
                        "event": "suggestions",
                        "query": query,
                        "suggestions": app.suggestions(),
                    })).await;
                }
            }
        }
    }

    info!("stdin closed, shutting down");
}
