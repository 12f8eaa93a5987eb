//! In-process stand-ins for the RPC node and the IPFS gateway.

use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// JSON-RPC node answering every `eth_call` through `respond(data)`.
pub fn mock_node(respond: fn(&str) -> Value) -> Router {
    Router::new().route(
        "/",
        post(move |Json(body): Json<Value>| async move {
            let data = body["params"][0]["data"].as_str().unwrap_or_default().to_string();
            Json(respond(&data))
        }),
    )
}

pub fn rpc_result(raw: &str) -> Value {
    json!({"jsonrpc": "2.0", "id": 1, "result": raw})
}

/// Accepts every request and never answers in time.
pub fn stalled() -> Router {
    Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        "too late"
    })
}

/// Fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("fetcher-{}-{}", std::process::id(), name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
