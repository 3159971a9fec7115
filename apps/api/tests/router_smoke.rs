use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use screener::config::Config;
use screener::matching::enhancement::{EnhancementAdapter, EnhancementError, SemanticMatcher};
use screener::routes::build_router;
use screener::state::AppState;

const BOUNDARY: &str = "screener-test-boundary";

struct FixedMatcher(&'static str);

#[async_trait]
impl SemanticMatcher for FixedMatcher {
    async fn submit(&self, _resume: &str, _job: &str) -> Result<String, EnhancementError> {
        Ok(self.0.to_string())
    }
}

fn app_with(config: Config, enhancer: Option<EnhancementAdapter>) -> Router {
    build_router(AppState::new(config, enhancer))
}

fn app() -> Router {
    app_with(Config::default(), None)
}

fn upload(file_name: &str, content: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/api/v1/resumes/parse")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn parses_plain_text_resume() {
    let text = b"Jane Doe\njane.doe@example.com\n(555) 123-4567\nSkills: Python, Docker, Linux\n";
    let response = app().oneshot(upload("jane.txt", text)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert!(body["resume_id"].as_str().is_some());
    let profile = &body["profile"];
    assert_eq!(profile["candidate_name"], "Jane Doe");
    assert_eq!(profile["email"], "jane.doe@example.com");
    assert_eq!(profile["skills"], json!(["Python", "Docker", "Linux"]));
}

#[tokio::test]
async fn rejects_unknown_extension() {
    let response = app().oneshot(upload("photo.xyz", b"data")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(json_body(response).await["error"]["code"], "UNSUPPORTED_FORMAT");
}

#[tokio::test]
async fn docx_is_not_yet_supported() {
    let response = app().oneshot(upload("cv.docx", b"PK\x03\x04")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn corrupt_pdf_is_unprocessable() {
    let response = app()
        .oneshot(upload("cv.pdf", b"definitely not a pdf"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let config = Config {
        max_upload_bytes: 16,
        ..Config::default()
    };
    let response = app_with(config, None)
        .oneshot(upload("cv.txt", &[b'a'; 64]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn match_is_scored_and_ranked_for_the_job() {
    let app = app();
    let job_id = Uuid::new_v4();
    let job = json!({
        "title": "Backend Engineer",
        "required_skills": ["Go", "SQL"],
        "nice_to_have_skills": ["Kubernetes"],
        "min_experience": 5
    });

    let strong = Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/v1/matches",
            json!({
                "resume_id": strong,
                "job_id": job_id,
                "profile": { "skills": ["Golang", "MySQL", "Docker"] },
                "job": job.clone(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let result = json_body(response).await;
    // 0.4 + 0.0 + 0.0 + 0.1
    assert_eq!(result["score"], 50);
    assert_eq!(result["ai_enhanced"], false);

    let weak = Uuid::new_v4();
    app.clone()
        .oneshot(post_json(
            "/api/v1/matches",
            json!({
                "resume_id": weak,
                "job_id": job_id,
                "profile": { "skills": ["Excel"] },
                "job": job,
            }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get(&format!("/api/v1/jobs/{job_id}/candidates?limit=5")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ranked = json_body(response).await;
    let order: Vec<&str> = ranked
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["resume_id"].as_str().unwrap())
        .collect();
    assert_eq!(order, vec![strong.to_string(), weak.to_string()]);
}

#[tokio::test]
async fn batch_match_blends_enhancement() {
    let adapter = EnhancementAdapter::new(
        Arc::new(FixedMatcher(r#"{"score": 90, "reasoning": "strong fit"}"#)),
        Duration::from_secs(5),
    );
    let app = app_with(Config::default(), Some(adapter));
    let job_id = Uuid::new_v4();

    let response = app
        .oneshot(post_json(
            &format!("/api/v1/jobs/{job_id}/matches"),
            json!({
                "job": { "title": "Rust Engineer", "required_skills": ["Rust"] },
                "candidates": [
                    { "resume_id": Uuid::new_v4(), "profile": { "skills": ["Rust"] } },
                    { "resume_id": Uuid::new_v4(), "profile": { "skills": ["Java"] } }
                ]
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let results = json_body(response).await;
    let scores: Vec<u64> = results
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["score"].as_u64().unwrap())
        .collect();
    // 100*0.6 + 90*0.4 = 96 and 60*0.6 + 90*0.4 = 72
    assert_eq!(scores, vec![96, 72]);
    assert_eq!(results[0]["ai_reasoning"], "strong fit");
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let response = app()
        .oneshot(get(&format!(
            "/api/v1/jobs/{}/candidates?limit=0",
            Uuid::new_v4()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rate_limit_rejects_excess_requests() {
    let config = Config {
        rate_limit_requests: 2,
        ..Config::default()
    };
    let app = app_with(config, None);
    let uri = format!("/api/v1/jobs/{}/candidates", Uuid::new_v4());

    for _ in 0..2 {
        let response = app.clone().oneshot(get(&uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key(header::RETRY_AFTER));

    // health sits outside the limiter
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn rotating_forwarded_header_does_not_reset_limit() {
    let config = Config {
        rate_limit_requests: 1,
        ..Config::default()
    };
    let app = app_with(config, None);
    let uri = format!("/api/v1/jobs/{}/candidates", Uuid::new_v4());

    let mut statuses = Vec::new();
    for i in 0..5 {
        let request = Request::builder()
            .uri(&uri)
            .header("x-forwarded-for", format!("10.0.0.{i}"))
            .body(Body::empty())
            .unwrap();
        statuses.push(app.clone().oneshot(request).await.unwrap().status());
    }

    assert_eq!(statuses[0], StatusCode::OK);
    assert!(statuses[1..]
        .iter()
        .all(|s| *s == StatusCode::TOO_MANY_REQUESTS));
}
