//! HTTP-level tests for the ATS routes, driven through the router with `oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use ats_api::ats::AtsEngine;
use ats_api::config::Config;
use ats_api::routes::build_router;
use ats_api::state::AppState;

const JD: &str = "Must have React and Node.js experience. AWS preferred. Docker is a bonus.";
const RESUME: &str = "Experienced with React, Express, and basic AWS usage.";

fn app() -> Router {
    build_router(AppState::new(Config::default(), AtsEngine::default()))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "ats-api");
}

#[tokio::test]
async fn test_analyze_returns_full_analysis() {
    let request = post_json(
        "/api/v1/ats/analyze",
        json!({ "resumeText": RESUME, "jobDescription": JD }),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["atsScore"], 51);
    assert_eq!(body["selectionProbability"], 37);
    assert_eq!(body["matchedSkills"], json!(["react", "aws"]));
    assert_eq!(body["missingSkills"], json!(["node.js"]));
    assert_eq!(body["improvements"][0]["priority"], "High");
    assert!(body["explainability"]["resumeData"]["skillsFound"].is_array());
}

#[tokio::test]
async fn test_analyze_rejects_blank_resume() {
    let request = post_json(
        "/api/v1/ats/analyze",
        json!({ "resumeText": "   ", "jobDescription": JD }),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "resumeText cannot be empty");
}

#[tokio::test]
async fn test_analyze_rejects_missing_field() {
    let request = post_json("/api/v1/ats/analyze", json!({ "resumeText": RESUME }));
    let (status, _) = send(app(), request).await;
    assert!(status.is_client_error(), "status was {status}");
}

#[tokio::test]
async fn test_parse_jd_preview() {
    let request = post_json("/api/v1/ats/parse-jd", json!({ "jobDescription": JD }));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mandatorySkills"], json!(["react", "node.js"]));
    assert_eq!(body["preferredSkills"], json!(["aws"]));
    assert_eq!(body["optionalSkills"], json!(["docker"]));
    assert!(body.get("experienceRequired").is_some());
    assert!(body.get("mandatory_skills").is_none());
}

#[tokio::test]
async fn test_parse_jd_rejects_blank() {
    let request = post_json("/api/v1/ats/parse-jd", json!({ "jobDescription": "" }));
    let (status, body) = send(app(), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "jobDescription cannot be empty");
}

#[tokio::test]
async fn test_parse_resume_preview() {
    let request = post_json("/api/v1/ats/parse-resume", json!({ "resumeText": RESUME }));
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["skills"], json!(["react", "express", "aws"]));
    assert_eq!(body["projects"], json!([]));
    assert!(body.get("experienceYears").is_some());
    assert!(body.get("experience_years").is_none());
}

#[tokio::test]
async fn test_body_limit_enforced() {
    let config = Config {
        max_body_bytes: 64,
        ..Config::default()
    };
    let app = build_router(AppState::new(config, AtsEngine::default()));
    let request = post_json(
        "/api/v1/ats/analyze",
        json!({ "resumeText": RESUME.repeat(10), "jobDescription": JD }),
    );
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
