mod helpers;

use std::time::{Duration, Instant};

use serde_json::{json, Value};

use helpers::{setup_test_app, write_raw};

#[tokio::test]
async fn accepts_and_replies_before_any_processing() {
    let app = setup_test_app();
    write_raw(&app, "clip.mov", b"fake mov bytes");

    let start = Instant::now();
    let response = app
        .server
        .post("/process-video")
        .json(&json!({ "videoName": "clip.mov" }))
        .await;

    // The reply must not wait for transcode work.
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(response.status_code(), 202);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "processing");
    assert_eq!(body["videoName"], "clip.mov");
    assert!(body["message"].as_str().unwrap().contains("clip.mov"));
}

#[tokio::test]
async fn accepts_even_when_the_object_does_not_exist_yet() {
    // Validation of the object happens in the background job; the endpoint
    // only validates the request shape.
    let app = setup_test_app();

    let response = app
        .server
        .post("/process-video")
        .json(&json!({ "videoName": "ghost.mov", "expoPushToken": "ExponentPushToken[x]" }))
        .await;

    assert_eq!(response.status_code(), 202);
}

#[tokio::test]
async fn missing_video_name_is_a_400() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/process-video")
        .json(&json!({ "expoPushToken": "ExponentPushToken[x]" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Video name is required");
}

#[tokio::test]
async fn blank_video_name_is_a_400() {
    let app = setup_test_app();

    let response = app
        .server
        .post("/process-video")
        .json(&json!({ "videoName": "   " }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Video name is required");
}

#[tokio::test]
async fn empty_body_is_a_400() {
    let app = setup_test_app();

    let response = app.server.post("/process-video").await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"], "Video name is required");
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = setup_test_app();

    let response = app.server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}
