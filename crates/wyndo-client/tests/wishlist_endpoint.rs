//! The wishlist client against a live toggle endpoint.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::sync::{mpsc, Mutex, Notify};
use wyndo_client::{HeartIcon, Location, ToggleOutcome, WishlistClient, WishlistItem};

use common::{unreachable_settings, LiveServer};

const TOGGLE_PATH: &str = "/api/toggle-wishlist/";

#[derive(Default)]
struct Recorder {
    bodies: Mutex<Vec<Value>>,
}

/// A toggle endpoint answering `{"added": added}` and recording bodies.
fn toggling_app(added: bool) -> (Router, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let app = Router::new()
        .route(
            TOGGLE_PATH,
            post(
                move |State(rec): State<Arc<Recorder>>, Json(body): Json<Value>| async move {
                    rec.bodies.lock().await.push(body);
                    Json(json!({ "added": added }))
                },
            ),
        )
        .with_state(Arc::clone(&recorder));
    (app, recorder)
}

fn status_app(status: StatusCode) -> Router {
    Router::new().route(TOGGLE_PATH, post(move || async move { status }))
}

// ============================================================================
// Successful toggles
// ============================================================================

#[tokio::test]
async fn test_toggle_added_fills_heart() {
    let (app, recorder) = toggling_app(true);
    let server = LiveServer::start(app).await;
    let location = Arc::new(Location::new("/products/"));
    let client = WishlistClient::new(&server.settings(), location.clone());
    let heart = HeartIcon::new(false);

    let outcome = client.toggle(WishlistItem::product(7), &heart).await;

    assert_eq!(outcome, ToggleOutcome::Added);
    assert!(heart.is_filled());
    assert_eq!(client.pending_items(), 0);
    assert_eq!(location.href(), "/products/");
    assert_eq!(
        *recorder.bodies.lock().await,
        vec![json!({"id": 7, "type": "product"})]
    );

    server.stop().await;
}

#[tokio::test]
async fn test_toggle_removed_clears_heart() {
    let (app, recorder) = toggling_app(false);
    let server = LiveServer::start(app).await;
    let client = WishlistClient::new(&server.settings(), Arc::new(Location::default()));
    let heart = HeartIcon::new(true);

    let outcome = client.toggle(WishlistItem::retailer(3), &heart).await;

    assert_eq!(outcome, ToggleOutcome::Removed);
    assert!(!heart.is_filled());
    assert_eq!(recorder.bodies.lock().await[0]["type"], "retailer");

    server.stop().await;
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_forbidden_redirects_to_login() {
    let server = LiveServer::start(status_app(StatusCode::FORBIDDEN)).await;
    let location = Arc::new(Location::new("/products/"));
    let client = WishlistClient::new(&server.settings(), location.clone());
    let heart = HeartIcon::new(false);

    let outcome = client.toggle(WishlistItem::product(7), &heart).await;

    assert_eq!(outcome, ToggleOutcome::LoginRequired);
    assert_eq!(location.href(), "/login/");
    assert!(!heart.is_filled());

    server.stop().await;
}

#[tokio::test]
async fn test_forbidden_uses_configured_login_url() {
    let server = LiveServer::start(status_app(StatusCode::FORBIDDEN)).await;
    let mut settings = server.settings();
    settings.login_url = "/accounts/login/".into();
    let location = Arc::new(Location::new("/"));
    let client = WishlistClient::new(&settings, location.clone());

    client
        .toggle(WishlistItem::product(1), &HeartIcon::default())
        .await;
    assert_eq!(location.href(), "/accounts/login/");

    server.stop().await;
}

#[tokio::test]
async fn test_server_error_changes_nothing() {
    let server = LiveServer::start(status_app(StatusCode::INTERNAL_SERVER_ERROR)).await;
    let location = Arc::new(Location::new("/products/"));
    let client = WishlistClient::new(&server.settings(), location.clone());
    let heart = HeartIcon::new(true);

    let outcome = client.toggle(WishlistItem::product(7), &heart).await;

    assert_eq!(outcome, ToggleOutcome::Failed);
    assert!(heart.is_filled());
    assert_eq!(location.href(), "/products/");

    server.stop().await;
}

#[tokio::test]
async fn test_malformed_body_changes_nothing() {
    let app = Router::new().route(TOGGLE_PATH, post(|| async { "<html>oops</html>" }));
    let server = LiveServer::start(app).await;
    let client = WishlistClient::new(&server.settings(), Arc::new(Location::default()));
    let heart = HeartIcon::new(false);

    let outcome = client.toggle(WishlistItem::product(7), &heart).await;

    assert_eq!(outcome, ToggleOutcome::Failed);
    assert!(!heart.is_filled());

    server.stop().await;
}

#[tokio::test]
async fn test_network_failure_changes_nothing() {
    let settings = unreachable_settings().await;
    let location = Arc::new(Location::new("/products/"));
    let client = WishlistClient::new(&settings, location.clone());
    let heart = HeartIcon::new(false);

    let outcome = client.toggle(WishlistItem::product(7), &heart).await;

    assert_eq!(outcome, ToggleOutcome::Failed);
    assert!(!heart.is_filled());
    assert_eq!(location.href(), "/products/");
    assert_eq!(client.pending_items(), 0);
}

// ============================================================================
// Overlapping clicks
// ============================================================================

struct Gate {
    calls: AtomicUsize,
    release: Notify,
    received: mpsc::UnboundedSender<()>,
}

async fn gated_toggle(State(gate): State<Arc<Gate>>) -> Json<Value> {
    if gate.calls.fetch_add(1, Ordering::SeqCst) == 0 {
        gate.received.send(()).ok();
        gate.release.notified().await;
        Json(json!({ "added": true }))
    } else {
        Json(json!({ "added": false }))
    }
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let (received_tx, mut received_rx) = mpsc::unbounded_channel();
    let gate = Arc::new(Gate {
        calls: AtomicUsize::new(0),
        release: Notify::new(),
        received: received_tx,
    });
    let app = Router::new()
        .route(TOGGLE_PATH, post(gated_toggle))
        .with_state(Arc::clone(&gate));
    let server = LiveServer::start(app).await;

    let client = Arc::new(WishlistClient::new(
        &server.settings(),
        Arc::new(Location::default()),
    ));
    let heart = HeartIcon::new(false);
    let item = WishlistItem::product(7);

    let first = {
        let client = Arc::clone(&client);
        let heart = heart.clone();
        tokio::spawn(async move { client.toggle(item, &heart).await })
    };
    // The first request is now parked on the server.
    received_rx.recv().await.unwrap();

    let second = client.toggle(item, &heart).await;
    assert_eq!(second, ToggleOutcome::Removed);
    assert!(!heart.is_filled());

    gate.release.notify_one();
    assert_eq!(first.await.unwrap(), ToggleOutcome::Superseded);
    // The late "added" answer did not overwrite the latest one.
    assert!(!heart.is_filled());
    assert_eq!(client.pending_items(), 0);

    server.stop().await;
}
