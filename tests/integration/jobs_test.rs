//! Job API tests.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test(start_paused = true)]
async fn health_endpoint_responds() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn submitted_job_runs_to_completion() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            "POST",
            "/api/jobs",
            Some(json!({ "job_type": "noop", "request": "{\"name\":\"dev\"}" })),
        )
        .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["data"]["status"], "pending");
    let id = body["data"]["id"].as_str().expect("job id").to_string();

    let finished = app.wait_for_terminal(&id).await;
    assert_eq!(finished["status"], "completed");
    assert_eq!(finished["result"], "ok");
    assert_eq!(finished["request"], "{\"name\":\"dev\"}");
}

#[tokio::test(start_paused = true)]
async fn failed_job_reports_its_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request("POST", "/api/jobs", Some(json!({ "job_type": "boom" })))
        .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    let id = body["data"]["id"].as_str().expect("job id").to_string();

    let finished = app.wait_for_terminal(&id).await;
    assert_eq!(finished["status"], "error");
    assert_eq!(finished["error"], "boom");
}

#[tokio::test(start_paused = true)]
async fn submit_rejects_empty_job_type() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request("POST", "/api/jobs", Some(json!({ "job_type": "  " })))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test(start_paused = true)]
async fn get_unknown_job_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.request("GET", "/api/jobs/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test(start_paused = true)]
async fn list_and_delete_jobs() {
    let app = TestApp::new().await;

    let (_, first) = app
        .request("POST", "/api/jobs", Some(json!({ "job_type": "noop" })))
        .await;
    let (_, second) = app
        .request("POST", "/api/jobs", Some(json!({ "job_type": "noop" })))
        .await;
    let first_id = first["data"]["id"].as_str().unwrap().to_string();
    let second_id = second["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app.request("GET", "/api/jobs", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = app
        .request("DELETE", &format!("/api/jobs/{first_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("GET", &format!("/api/jobs/{first_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request("GET", &format!("/api/jobs/{second_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
