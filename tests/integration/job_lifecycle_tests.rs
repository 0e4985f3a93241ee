// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use newsrake::domain::models::content_item::ProcessingStatus;
use newsrake::domain::models::scraping_job::{JobStatus, ScrapingJob};
use newsrake::domain::models::source::{ScrapePolicy, Source};
use newsrake::domain::repositories::job_repository::JobRepository;
use newsrake::domain::repositories::log_repository::LogRepository;
use newsrake::domain::repositories::source_repository::SourceRepository;

use crate::helpers::{article_html, feed_xml, harness, wait_until};

async fn mount_feed(server: &MockServer, feed_path: &str, links: &[String]) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed_xml(links)))
        .mount(server)
        .await;
}

async fn mount_article(server: &MockServer, article_path: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(article_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html(title)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_all_articles_succeed_job_is_successful() {
    let server = MockServer::start().await;
    let links: Vec<String> = (1..=5).map(|i| format!("{}/a{}", server.uri(), i)).collect();
    mount_feed(&server, "/feed.xml", &links).await;
    for i in 1..=5 {
        mount_article(&server, &format!("/a{}", i), &format!("Story {}", i)).await;
    }

    let h = harness(4);
    let source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;

    let job = h.run_job(vec![source.id], 3).await;

    assert_eq!(job.status, JobStatus::Successful);
    assert_eq!(job.total_articles, 3);
    assert_eq!(job.total_errors, 0);

    let items = h.content_repo.items();
    assert_eq!(items.len(), 3);
    for item in &items {
        assert_eq!(item.processing_status, ProcessingStatus::Completed);
        assert!(item.title.is_some());
        assert!(item.body.contains("\n\n\n"));
    }

    let logs = h.log_repo.find_by_job(job.id).await.unwrap();
    assert!(!logs.is_empty());
}

#[tokio::test]
async fn test_one_timeout_job_is_partial() {
    let server = MockServer::start().await;
    let links: Vec<String> = (1..=3).map(|i| format!("{}/t{}", server.uri(), i)).collect();
    mount_feed(&server, "/feed.xml", &links).await;
    mount_article(&server, "/t1", "Fast One").await;
    Mock::given(method("GET"))
        .and(path("/t2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(article_html("Slow One"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    mount_article(&server, "/t3", "Fast Two").await;

    let h = harness(4);
    let source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;

    let job = h.run_job(vec![source.id], 3).await;

    assert_eq!(job.status, JobStatus::Partial);
    assert_eq!(job.total_articles, 2);
    assert_eq!(job.total_errors, 1);

    let logs = h.log_repo.find_by_job(job.id).await.unwrap();
    assert!(logs.iter().any(|l| l
        .detail
        .as_ref()
        .map(|d| d["kind"] == "article_fetch_timeout")
        .unwrap_or(false)));

    // The timed-out attempt contributes its real elapsed time (about one
    // second here) instead of dragging the average toward zero
    let stored = h.source_repo.find_by_id(source.id).await.unwrap().unwrap();
    assert!(stored.health.avg_response_time_ms >= 100.0);
}

#[tokio::test]
async fn test_two_sources_share_one_job() {
    let server = MockServer::start().await;
    for i in 1..=2 {
        let links = vec![
            format!("{}/m{}/a1", server.uri(), i),
            format!("{}/m{}/a2", server.uri(), i),
        ];
        mount_feed(&server, &format!("/feed{}.xml", i), &links).await;
        mount_article(&server, &format!("/m{}/a1", i), &format!("Feed {} First", i)).await;
        mount_article(&server, &format!("/m{}/a2", i), &format!("Feed {} Second", i)).await;
    }

    let h = harness(4);
    let first = h
        .add_source("wire-a", format!("{}/feed1.xml", server.uri()))
        .await;
    let second = h
        .add_source("wire-b", format!("{}/feed2.xml", server.uri()))
        .await;

    let job = h.run_job(vec![first.id, second.id], 2).await;

    assert_eq!(job.status, JobStatus::Successful);
    assert_eq!(job.total_articles, 4);
    assert_eq!(job.total_errors, 0);

    let items = h.content_repo.items();
    assert_eq!(items.iter().filter(|i| i.source_id == first.id).count(), 2);
    assert_eq!(items.iter().filter(|i| i.source_id == second.id).count(), 2);
}

#[tokio::test]
async fn test_feed_down_sole_source_job_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = harness(4);
    let source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;

    let job = h.run_job(vec![source.id], 3).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.total_articles, 0);
    assert_eq!(job.total_errors, 1);

    let logs = h.log_repo.find_by_job(job.id).await.unwrap();
    assert!(logs.iter().any(|l| l
        .detail
        .as_ref()
        .map(|d| d["kind"] == "feed_unavailable")
        .unwrap_or(false)));
}

#[tokio::test]
async fn test_rerun_against_unchanged_storage_creates_nothing() {
    let server = MockServer::start().await;
    let links: Vec<String> = (1..=3).map(|i| format!("{}/d{}", server.uri(), i)).collect();
    mount_feed(&server, "/feed.xml", &links).await;
    for i in 1..=3 {
        mount_article(&server, &format!("/d{}", i), &format!("Story {}", i)).await;
    }

    let h = harness(4);
    let source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;

    let first = h.run_job(vec![source.id], 3).await;
    assert_eq!(first.status, JobStatus::Successful);
    assert_eq!(h.content_repo.items().len(), 3);

    // Same feed, same storage: everything is deduplicated away
    let second = h.run_job(vec![source.id], 3).await;
    assert_eq!(second.status, JobStatus::Successful);
    assert_eq!(second.total_articles, 0);
    assert_eq!(second.total_errors, 0);
    assert_eq!(h.content_repo.items().len(), 3);
}

#[tokio::test]
async fn test_three_consecutive_failures_skip_remaining_candidates() {
    let server = MockServer::start().await;
    let links: Vec<String> = (1..=5).map(|i| format!("{}/f{}", server.uri(), i)).collect();
    mount_feed(&server, "/feed.xml", &links).await;
    for i in 1..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/f{}", i)))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;
    }
    for i in 4..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/f{}", i)))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
    }

    let h = harness(4);
    let source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;

    let job = h.run_job(vec![source.id], 5).await;

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.total_articles, 0);
    assert_eq!(job.total_errors, 3);

    // Health snapshot is written back to the source
    let stored = h.source_repo.find_by_id(source.id).await.unwrap().unwrap();
    assert!(!stored.health.is_healthy);
    assert_eq!(stored.health.consecutive_failures, 3);
}

#[tokio::test]
async fn test_empty_extraction_is_stored_and_counted_as_error() {
    let server = MockServer::start().await;
    let links = vec![format!("{}/empty", server.uri())];
    mount_feed(&server, "/feed.xml", &links).await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&server)
        .await;

    let h = harness(4);
    let source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;

    let job = h.run_job(vec![source.id], 1).await;

    // The empty item is kept for inspection but the job records the error
    assert_eq!(job.total_articles, 1);
    assert_eq!(job.total_errors, 1);
    assert_eq!(job.status, JobStatus::Partial);

    let items = h.content_repo.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].processing_status, ProcessingStatus::Failed);
    assert_eq!(items[0].quality_score, 0);
}

#[tokio::test]
async fn test_robots_disallowed_url_is_skipped_without_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /blocked"),
        )
        .mount(&server)
        .await;

    let links = vec![
        format!("{}/ok1", server.uri()),
        format!("{}/blocked/a", server.uri()),
        format!("{}/ok2", server.uri()),
    ];
    mount_feed(&server, "/feed.xml", &links).await;
    mount_article(&server, "/ok1", "Open One").await;
    mount_article(&server, "/ok2", "Open Two").await;
    Mock::given(method("GET"))
        .and(path("/blocked/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("Blocked")))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(4);
    let mut source = h
        .add_source("wire", format!("{}/feed.xml", server.uri()))
        .await;
    source.policy.respect_robots_txt = true;
    h.source_repo.create(&source).await.unwrap();

    let job = h.run_job(vec![source.id], 3).await;

    // A disallowed URL is not an error
    assert_eq!(job.status, JobStatus::Successful);
    assert_eq!(job.total_articles, 2);
    assert_eq!(job.total_errors, 0);

    let logs = h.log_repo.find_by_job(job.id).await.unwrap();
    assert!(logs
        .iter()
        .any(|l| l.message.contains("disallowed by robots.txt")));
}

#[tokio::test]
async fn test_cancellation_between_sources_skips_remaining_sources() {
    let server = MockServer::start().await;
    for i in 1..=3 {
        mount_feed(
            &server,
            &format!("/feed{}.xml", i),
            &[format!("{}/s{}/a1", server.uri(), i)],
        )
        .await;
        Mock::given(method("GET"))
            .and(path(format!("/s{}/a1", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_html("Sole Story"))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;
    }

    // Pool of one serializes the sources, so a cancel issued while the
    // first source is mid-fetch must stop the other two at the
    // between-sources checkpoint
    let h = harness(1);
    let policy = ScrapePolicy {
        request_delay_ms: 0,
        timeout_secs: 2,
        user_agent: "newsrake-tests/0.1".to_string(),
        respect_robots_txt: false,
    };
    let mut ids = Vec::new();
    for i in 1..=3 {
        let source = Source::new(
            format!("wire-{}", i),
            "news.test".to_string(),
            format!("{}/feed{}.xml", server.uri(), i),
            policy.clone(),
        );
        h.source_repo.create(&source).await.unwrap();
        ids.push(source.id);
    }

    let job = ScrapingJob::new(ids, 1);
    h.job_repo.create(&job).await.unwrap();
    let runner = h.runner.clone();
    let spawned = job.clone();
    let run = tokio::spawn(async move { runner.run(spawned).await });

    // Cancel while the first source's article fetch is still in flight
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let seen = server.received_requests().await.unwrap();
        if seen.iter().any(|r| r.url.path().ends_with("/a1")) {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "no article fetch started"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(h.registry.request_cancel(job.id));

    run.await.unwrap();

    let finished = h.job_repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Cancelled);
    assert_eq!(finished.total_articles, 1);
    assert_eq!(finished.total_errors, 0);

    // Only the first source was ever touched, the in-flight article
    // completed and the remaining sources made no HTTP requests at all
    let requests = server.received_requests().await.unwrap();
    let feed_fetches = requests
        .iter()
        .filter(|r| r.url.path().starts_with("/feed"))
        .count();
    let article_fetches = requests
        .iter()
        .filter(|r| r.url.path().ends_with("/a1"))
        .count();
    assert_eq!(feed_fetches, 1);
    assert_eq!(article_fetches, 1);
}

#[tokio::test]
async fn test_cancellation_stops_at_next_checkpoint() {
    let server = MockServer::start().await;
    let links: Vec<String> = (1..=3).map(|i| format!("{}/c{}", server.uri(), i)).collect();
    mount_feed(&server, "/feed.xml", &links).await;
    mount_article(&server, "/c1", "Before Cancel").await;
    for i in 2..=3 {
        Mock::given(method("GET"))
            .and(path(format!("/c{}", i)))
            .respond_with(ResponseTemplate::new(200).set_body_string(article_html("Late")))
            .expect(0)
            .mount(&server)
            .await;
    }

    let h = harness(1);
    // A long delay between articles leaves a wide cancellation window
    let policy = ScrapePolicy {
        request_delay_ms: 2000,
        timeout_secs: 1,
        user_agent: "newsrake-tests/0.1".to_string(),
        respect_robots_txt: false,
    };
    let source = Source::new(
        "wire".to_string(),
        "news.test".to_string(),
        format!("{}/feed.xml", server.uri()),
        policy,
    );
    h.source_repo.create(&source).await.unwrap();

    let job = ScrapingJob::new(vec![source.id], 3);
    h.job_repo.create(&job).await.unwrap();
    let runner = h.runner.clone();
    let spawned = job.clone();
    let run = tokio::spawn(async move { runner.run(spawned).await });

    wait_until(|| !h.content_repo.items().is_empty(), Duration::from_secs(5)).await;
    assert!(h.registry.request_cancel(job.id));

    run.await.unwrap();

    let finished = h.job_repo.find_by_id(job.id).await.unwrap().unwrap();
    assert_eq!(finished.status, JobStatus::Cancelled);
    assert_eq!(finished.total_articles, 1);
    assert_eq!(finished.total_errors, 0);
    assert!(!h.registry.is_running(job.id));
}
