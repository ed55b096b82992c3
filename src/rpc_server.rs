//! MyBookmarks RPC Server: JSON over stdin/stdout for the web front end.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "user":"alice", "method":"bookmark.add", "params":{"name":"...","url":"..."}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! `user` is the already-authenticated account name supplied by the front end.

use std::time::Instant;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use mybookmarks::app::App;
use mybookmarks::logging::init_tracing;
use mybookmarks::rpc_handler::{handle_method, resolve_owner};
use mybookmarks::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Max requests served per second.
const MAX_REQUESTS_PER_SECOND: u32 = 200;

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
        let elapsed = self.window_start.elapsed();
        if elapsed.as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

async fn respond(out: &mut tokio::io::Stdout, value: &Value) -> std::io::Result<()> {
    let mut line = value.to_string();
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = SettingsEngine::new(None);
    let settings = engine.load()?;
    init_tracing(&settings.logging.filter);

    let app = App::new(settings)?;
    let mut out = tokio::io::stdout();

    respond(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).await?;

    let mut rate_limiter = RateLimiter::new(MAX_REQUESTS_PER_SECOND);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&mut out, &json!({"id": null, "error": format!("parse error: {}", e)})).await?;
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            tracing::warn!("rate limit exceeded");
            respond(&mut out, &json!({"id": id, "error": "rate limit exceeded"})).await?;
            continue;
        }

        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(Value::Null);
        let user = req.get("user").and_then(|v| v.as_str());

        let result = match resolve_owner(&app, user).await {
            Ok(owner) => handle_method(&app, owner, method, &params).await,
            Err(err) => Err(err),
        };

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(&mut out, &response).await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
