// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! GET / liveness endpoint

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use tower::util::ServiceExt;

use super::support::{body_json, build_app, EchoGenerator, FakeDetector, FakeScene};

#[tokio::test]
async fn test_root_returns_running_message() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!({"message": "Backend is running!"}));
}

#[tokio::test]
async fn test_analyze_route_rejects_get() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    let request = Request::builder()
        .method(Method::GET)
        .uri("/analyze-image/")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
