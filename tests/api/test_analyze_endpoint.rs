// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /analyze-image/ end to end, with fake vision models
//!
//! Verifies:
//! - Success payload shape and object de-duplication
//! - Prompt construction, including the empty-detection fallback
//! - Generation failures stay inline and never mask labels
//! - Request-fatal failures collapse to a single `error` key

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use scenescribe::generation::{CompletionClient, CompletionConfig};
use std::time::Duration;
use tower::util::ServiceExt;

use super::support::{
    body_json, build_app, png_bytes, upload_request, BrokenDetector, EchoGenerator, FakeDetector,
    FakeScene, MockGenerator, BOUNDARY,
};

#[tokio::test]
async fn test_analyze_success_payload() {
    let app = build_app(
        FakeDetector {
            labels: vec!["dog", "person", "dog"],
        },
        FakeScene::picking("park"),
        EchoGenerator,
    );

    let response = app
        .oneshot(upload_request("file", &png_bytes(32, 24)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_object().unwrap().len(), 4);
    assert_eq!(json["objects"], serde_json::json!(["dog", "person"]));
    assert_eq!(json["scenery"], "park");
    assert_eq!(
        json["description"],
        "echo: Write a short paragraph about dog, person in a park."
    );
    assert_eq!(
        json["poem"],
        "echo: Write a short poem about dog, person in a park."
    );
}

#[tokio::test]
async fn test_analyze_calls_generator_once_per_prompt() {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .withf(|prompt| prompt.contains("Write a short paragraph about an unknown object in a desert."))
        .times(1)
        .returning(|_| "A paragraph.".to_string());
    generator
        .expect_generate()
        .withf(|prompt| prompt.contains("Write a short poem about an unknown object in a desert."))
        .times(1)
        .returning(|_| "A poem.".to_string());

    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("desert"),
        generator,
    );

    let response = app
        .oneshot(upload_request("file", &png_bytes(16, 16)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["objects"], serde_json::json!([]));
    assert_eq!(json["scenery"], "desert");
    assert_eq!(json["description"], "A paragraph.");
    assert_eq!(json["poem"], "A poem.");
}

#[tokio::test]
async fn test_unreachable_generator_keeps_labels() {
    let generator = CompletionClient::new(CompletionConfig {
        api_url: "http://127.0.0.1:59999/v1/chat/completions".to_string(),
        api_key: "sk-test".to_string(),
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap();

    let app = build_app(
        FakeDetector {
            labels: vec!["cat"],
        },
        FakeScene::picking("beach"),
        generator,
    );

    let response = app
        .oneshot(upload_request("file", &png_bytes(16, 16)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["objects"], serde_json::json!(["cat"]));
    assert_eq!(json["scenery"], "beach");
    assert!(json["description"]
        .as_str()
        .unwrap()
        .starts_with("Error in AI response:"));
    assert!(json["poem"]
        .as_str()
        .unwrap()
        .starts_with("Error in AI response:"));
}

#[tokio::test]
async fn test_repeat_requests_are_deterministic() {
    let app = build_app(
        FakeDetector {
            labels: vec!["car", "bus"],
        },
        FakeScene::picking("city"),
        EchoGenerator,
    );
    let image = png_bytes(20, 20);

    let first = body_json(app.clone().oneshot(upload_request("file", &image)).await.unwrap()).await;
    let second = body_json(app.oneshot(upload_request("file", &image)).await.unwrap()).await;

    assert_eq!(first["objects"], second["objects"]);
    assert_eq!(first["scenery"], second["scenery"]);
}

#[tokio::test]
async fn test_undecodable_image_returns_error_only() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    let response = app
        .oneshot(upload_request("file", b"definitely not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json,
        serde_json::json!({"error": "Failed to process image: Unsupported image format"})
    );
}

#[tokio::test]
async fn test_truncated_png_returns_error() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );
    let png = png_bytes(16, 16);

    let response = app
        .oneshot(upload_request("file", &png[..png.len() / 2]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process image: Failed to decode image"));
}

#[tokio::test]
async fn test_missing_file_field() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    let response = app
        .oneshot(upload_request("image", &png_bytes(8, 8)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json.as_object().unwrap().len(), 1);
    assert_eq!(
        json["error"],
        "Failed to process image: missing multipart field 'file'"
    );
}

#[tokio::test]
async fn test_non_multipart_body() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze-image/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"file": "abc"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process image:"));
}

#[tokio::test]
async fn test_empty_upload() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    let response = app.oneshot(upload_request("file", b"")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Failed to process image: Image data is empty"
    );
}

#[tokio::test]
async fn test_oversized_upload_is_payload_too_large() {
    let app = build_app(
        FakeDetector { labels: vec![] },
        FakeScene::picking("city"),
        EchoGenerator,
    );

    // Past the 20 MiB image limit and the 1 MiB multipart slack
    let data = vec![0u8; 22 * 1024 * 1024];
    let response = app.oneshot(upload_request("file", &data)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let json = body_json(response).await;
    assert_eq!(json.as_object().unwrap().len(), 1);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to process image:"));
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let app = build_app(BrokenDetector, FakeScene::picking("city"), EchoGenerator);

    let response = app
        .oneshot(upload_request("file", &png_bytes(8, 8)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Failed to process image: Object detection failed: output tensor has wrong shape"
    );
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let app = build_app(
        FakeDetector {
            labels: vec!["bird"],
        },
        FakeScene::picking("forest"),
        EchoGenerator,
    );

    let image = png_bytes(8, 8);
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"bird.png\"\r\n\
             Content-Type: image/png\r\n\r\n",
            b = BOUNDARY
        )
        .as_bytes(),
    );
    body.extend_from_slice(&image);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze-image/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["objects"], serde_json::json!(["bird"]));
}
