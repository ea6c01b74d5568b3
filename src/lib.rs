pub mod config;
pub mod core;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use crate::core::storage::SnapshotStore;

/// Plain-text HTTP surface over the snapshot store.
pub fn create_app(store: SnapshotStore) -> Router {
    Router::new()
        .route("/status", get(status))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn status(State(store): State<SnapshotStore>) -> String {
    store.read().render()
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::FeedFetcher;
    use crate::core::incident::IncidentSnapshot;
    use crate::core::sync::Poller;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn get_text(app: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("router is infallible");
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should read");
        let text = String::from_utf8(body.to_vec()).expect("body is utf-8");
        (status, content_type, text)
    }

    #[tokio::test]
    async fn status_before_first_poll_reports_no_incidents() {
        let (status, content_type, body) =
            get_text(create_app(SnapshotStore::new()), "/status").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.is_some_and(|value| value.starts_with("text/plain")));
        assert_eq!(body, "No incidents detected yet.");
    }

    #[tokio::test]
    async fn status_renders_three_lines() {
        let store = SnapshotStore::new();
        store.publish(
            IncidentSnapshot {
                product: "ChatGPT".to_string(),
                status: "Degraded Performance".to_string(),
                time: "2024-01-15 10:30:00".to_string(),
                link: "https://status.openai.com/incidents/1".to_string(),
            },
            "2024-01-15 10:31:02".to_string(),
        );

        let (status, _, body) = get_text(create_app(store), "/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            "[2024-01-15 10:30:00] Product: ChatGPT\nStatus: Degraded Performance\nLast checked: 2024-01-15 10:31:02"
        );
    }

    async fn hanging_feed(State(requests): State<Arc<AtomicUsize>>) -> StatusCode {
        requests.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(30)).await;
        StatusCode::OK
    }

    async fn failing_feed(State(requests): State<Arc<AtomicUsize>>) -> StatusCode {
        requests.fetch_add(1, Ordering::SeqCst);
        StatusCode::BAD_GATEWAY
    }

    async fn spawn_upstream() -> (String, Arc<AtomicUsize>, tokio::task::JoinHandle<()>) {
        let requests = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route("/hanging.atom", get(hanging_feed))
            .route("/failing.atom", get(failing_feed))
            .with_state(requests.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let address = listener.local_addr().expect("local addr should exist");
        let join_handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        (format!("http://{address}"), requests, join_handle)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("condition not reached within 2s");
    }

    #[tokio::test]
    async fn health_is_ok_while_poll_cycle_hangs() {
        let (base, requests, server_task) = spawn_upstream().await;
        let store = SnapshotStore::new();
        let fetcher = FeedFetcher::new(format!("{base}/hanging.atom"), Duration::from_secs(20))
            .expect("client should build");
        let poller = Poller::new(fetcher, store.clone(), Duration::from_secs(30)).start();
        wait_until(|| requests.load(Ordering::SeqCst) == 1).await;
        let app = create_app(store);

        let (status, content_type, body) = get_text(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.is_some_and(|value| value.starts_with("text/plain")));
        assert_eq!(body, "OK");

        let (_, _, body) = get_text(app, "/status").await;
        assert_eq!(body, "No incidents detected yet.");

        poller.stop().await;
        server_task.abort();
    }

    #[tokio::test]
    async fn health_is_ok_while_polls_fail() {
        let (base, requests, server_task) = spawn_upstream().await;
        let store = SnapshotStore::new();
        let fetcher = FeedFetcher::new(format!("{base}/failing.atom"), Duration::from_secs(2))
            .expect("client should build");
        let poller = Poller::new(fetcher, store.clone(), Duration::from_millis(50)).start();
        wait_until(|| requests.load(Ordering::SeqCst) >= 2 && store.read().last_checked_at.is_some())
            .await;

        let (status, _, body) = get_text(create_app(store.clone()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "OK");
        assert!(store.read().current.is_none());

        poller.stop().await;
        server_task.abort();
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _, _) = get_text(create_app(SnapshotStore::new()), "/incidents").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
