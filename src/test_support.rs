use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::ServerConfig;
use crate::services::crowd::CrowdSampler;
use crate::state::AppState;
use crate::store::MemoryStore;
use crate::time::ManualClock;

pub const TEST_SNIFFER: &str = "11:22:00:33:44:55";
pub const TEST_EPOCH: i64 = 3600;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_path: ":memory:".to_string(),
        crowd_window_seconds: 300,
        create_default_sniffer: false,
    }
}

pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::at_epoch(TEST_EPOCH))
}

pub fn test_state_with_clock(clock: Arc<ManualClock>) -> AppState {
    let config = test_config();
    let sampler =
        Arc::new(CrowdSampler::new(clock.clone()).with_window(config.crowd_window_seconds));
    AppState {
        config,
        store: Arc::new(MemoryStore::default()),
        clock,
        sampler,
    }
}

pub fn test_state() -> AppState {
    test_state_with_clock(test_clock())
}

/// Like [`test_state`] but backed by an in-memory sqlite database, so tests
/// can exercise the SQL store through the HTTP surface.
pub async fn test_state_with_sqlite() -> AppState {
    let pool = crate::db::connect(":memory:").await.expect("connect");
    crate::db::migrate(&pool).await.expect("migrate");

    let clock = test_clock();
    let config = test_config();
    let sampler =
        Arc::new(CrowdSampler::new(clock.clone()).with_window(config.crowd_window_seconds));
    AppState {
        config,
        store: Arc::new(crate::store::SqliteStore::new(pool)),
        clock,
        sampler,
    }
}

pub async fn get_path(app: Router, path: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("request"),
    )
    .await
    .expect("response")
}

pub async fn post_json(app: Router, path: &str, body: &serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

pub async fn put_json(app: Router, path: &str, body: &serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("PUT")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
    )
    .await
    .expect("response")
}

pub async fn read_json<T: DeserializeOwned>(resp: Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}
