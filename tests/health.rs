mod common;

use axum::http::{Method, StatusCode};

use common::{
    FakeGateway,
    http::{app, login, send},
};

#[tokio::test]
async fn health_check_returns_ok() {
    let gateway = FakeGateway::new();
    let (app, _) = app(&gateway);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Health check");
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["active_sessions"], 0);
}

#[tokio::test]
async fn health_counts_open_sessions() {
    let gateway = FakeGateway::new();
    let (app, _) = app(&gateway);
    login(&app, "lan@example.com").await;

    let (_, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(body["data"]["active_sessions"], 1);
}

#[tokio::test]
async fn unknown_paths_use_the_envelope() {
    let gateway = FakeGateway::new();
    let (app, _) = app(&gateway);

    let (status, body) = send(&app, Method::GET, "/nope", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/nope");
}
