//! HTTP server setup with Axum

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use super::rest::{events, keys};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/status", get(events::status))
        .route("/api/events", get(events::latest_events))
        .route("/api/keys/:key/latest", get(keys::get_latest))
        .route("/api/keys/:key/at/:tick", get(keys::get_at))
        .route("/api/keys/:key/before/:tick", get(keys::get_at_or_before))
        .route("/api/keys/:key/range", get(keys::get_range))
        .route("/api/keys/:key/statistics", get(keys::get_statistics))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP read API listening");
    axum::serve(listener, create_router(state)).await
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SnapshotLedger;
    use crate::types::CallContext;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn app_with_data() -> Router {
        let ledger = Arc::new(SnapshotLedger::default());
        let alice = CallContext::new("alice", 10);
        ledger.store(&alice, "price", 100).unwrap();
        ledger.store(&alice.at(20), "price", 200).unwrap();
        ledger
            .register(&alice.at(20), "secret", false, false, 0)
            .unwrap();
        ledger.store(&alice.at(20), "secret", 7).unwrap();
        create_router(Arc::new(AppState::new(ledger)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(Arc::new(AppState::new(Arc::new(SnapshotLedger::default()))));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_predecessor_lookup() {
        let (status, body) = get(app_with_data(), "/api/keys/price/before/15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["tick"], 10);
        assert_eq!(body["data"]["value"], 100);
    }

    #[tokio::test]
    async fn test_statistics_endpoint() {
        let (status, body) = get(app_with_data(), "/api/keys/price/statistics?start=0&end=25").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["sum"], 300);
        assert_eq!(body["data"]["count"], 2);
    }

    #[tokio::test]
    async fn test_error_status_codes() {
        let (status, body) = get(app_with_data(), "/api/keys/missing/latest").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SNAPSHOT_NOT_FOUND");

        let (status, _) = get(app_with_data(), "/api/keys/secret/latest?caller=mallory").await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = get(app_with_data(), "/api/keys/secret/latest?caller=alice").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(app_with_data(), "/api/keys/price/range?start=20&end=10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RANGE");
    }

    #[tokio::test]
    async fn test_events_window() {
        let (status, body) = get(app_with_data(), "/api/events?limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["sequence_id"], 4);
    }
}
