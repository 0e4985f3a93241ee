// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing::{delete, get, post};
use axum::{Extension, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

use newsrake::config::settings::Settings;
use newsrake::orchestrator::JobService;
use newsrake::presentation::handlers::{job_handler, source_handler};
use newsrake::presentation::routes::{health_check, version};

use crate::helpers::{
    harness, InMemoryContentRepo, InMemoryJobRepo, InMemoryLogRepo, InMemorySourceRepo, TestHarness,
};

type TestJobService =
    JobService<InMemorySourceRepo, InMemoryJobRepo, InMemoryContentRepo, InMemoryLogRepo>;

/// 以内存仓库实例化泛型处理器，构建与生产路由同构的测试路由
fn api_router(h: &TestHarness) -> Router {
    let service: Arc<TestJobService> = Arc::new(JobService::new(
        h.job_repo.clone(),
        h.registry.clone(),
        h.runner.clone(),
    ));
    let settings = Arc::new(Settings::new().expect("default settings"));

    Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version))
        .route(
            "/v1/jobs",
            post(
                job_handler::create_job::<
                    InMemorySourceRepo,
                    InMemoryJobRepo,
                    InMemoryContentRepo,
                    InMemoryLogRepo,
                >,
            ),
        )
        .route(
            "/v1/jobs/{id}",
            get(job_handler::get_job::<InMemoryJobRepo>),
        )
        .route(
            "/v1/jobs/{id}/logs",
            get(job_handler::get_job_logs::<InMemoryJobRepo, InMemoryLogRepo>),
        )
        .route(
            "/v1/jobs/{id}",
            delete(
                job_handler::cancel_job::<
                    InMemorySourceRepo,
                    InMemoryJobRepo,
                    InMemoryContentRepo,
                    InMemoryLogRepo,
                >,
            ),
        )
        .route(
            "/v1/sources",
            post(source_handler::create_source::<InMemorySourceRepo>),
        )
        .route(
            "/v1/sources",
            get(source_handler::list_sources::<InMemorySourceRepo>),
        )
        .route(
            "/v1/sources/{id}",
            get(source_handler::get_source::<InMemorySourceRepo>),
        )
        .layer(Extension(h.source_repo.clone()))
        .layer(Extension(h.job_repo.clone()))
        .layer(Extension(h.log_repo.clone()))
        .layer(Extension(service))
        .layer(Extension(settings))
}

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_and_version_endpoints() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");

    let response = router
        .oneshot(empty_request("GET", "/v1/version"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], env!("CARGO_PKG_VERSION").as_bytes());
}

#[tokio::test]
async fn test_create_source_applies_policy_defaults() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/sources",
            json!({
                "name": "wire",
                "domain": "news.test",
                "feed_url": "https://news.test/feed.xml"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["policy"]["request_delay_ms"], 1000);
    assert_eq!(created["policy"]["timeout_secs"], 15);
    assert_eq!(created["policy"]["respect_robots_txt"], true);
    assert_eq!(created["health"]["is_healthy"], true);

    let id = created["id"].as_str().unwrap();
    let response = router
        .oneshot(empty_request("GET", &format!("/v1/sources/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["name"], "wire");
}

#[tokio::test]
async fn test_create_source_rejects_blank_name() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .oneshot(json_request(
            "POST",
            "/v1/sources",
            json!({ "name": "  ", "domain": "news.test", "feed_url": "https://news.test/feed.xml" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_source_is_not_found() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .oneshot(empty_request(
            "GET",
            &format!("/v1/sources/{}", Uuid::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_job_validates_request() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/jobs",
            json!({ "source_ids": [], "articles_per_source": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(json_request(
            "POST",
            "/v1/jobs",
            json!({ "source_ids": [Uuid::new_v4()], "articles_per_source": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trigger_job_with_unknown_source_finishes_failed() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/jobs",
            json!({ "source_ids": [Uuid::new_v4()], "articles_per_source": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let accepted = body_json(response).await;
    assert_eq!(accepted["status"], "new");
    let id = accepted["id"].as_str().unwrap().to_string();

    // The job runs in the background, poll until it reaches a terminal state
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    let finished = loop {
        let response = router
            .clone()
            .oneshot(empty_request("GET", &format!("/v1/jobs/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let job = body_json(response).await;
        if job["status"] != "new" && job["status"] != "in_progress" {
            break job;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "job did not reach a terminal state"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    };

    assert_eq!(finished["status"], "failed");
    assert_eq!(finished["total_articles"], 0);
    assert_eq!(finished["total_errors"], 1);

    let response = router
        .oneshot(empty_request("GET", &format!("/v1/jobs/{}/logs", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let logs = body_json(response).await;
    assert!(logs.as_array().map(|a| !a.is_empty()).unwrap_or(false));
}

#[tokio::test]
async fn test_cancel_job_that_is_not_running_conflicts() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .oneshot(empty_request(
            "DELETE",
            &format!("/v1/jobs/{}", Uuid::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"], "job is not running");
}

#[tokio::test]
async fn test_logs_for_unknown_job_is_not_found() {
    let h = harness(4);
    let router = api_router(&h);

    let response = router
        .oneshot(empty_request(
            "GET",
            &format!("/v1/jobs/{}/logs", Uuid::new_v4()),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
