// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use newsrake::domain::models::content_item::ContentItem;
use newsrake::domain::models::log_entry::LogEntry;
use newsrake::domain::models::scraping_job::{JobStatus, ScrapingJob};
use newsrake::domain::models::source::{ScrapePolicy, Source, SourceHealth};
use newsrake::domain::repositories::content_repository::ContentRepository;
use newsrake::domain::repositories::job_repository::JobRepository;
use newsrake::domain::repositories::log_repository::LogRepository;
use newsrake::domain::repositories::source_repository::{RepositoryError, SourceRepository};
use newsrake::extraction::engine::ExtractionEngine;
use newsrake::extraction::ExtractionConfig;
use newsrake::health::tracker::{HealthConfig, SourceHealthTracker};
use newsrake::infrastructure::http::client::ArticleFetcher;
use newsrake::ingest::feed::FeedIngestor;
use newsrake::orchestrator::{JobRegistry, JobRunner};
use newsrake::utils::robots::RobotsChecker;

#[derive(Default)]
pub struct InMemorySourceRepo {
    sources: Mutex<HashMap<Uuid, Source>>,
}

#[async_trait]
impl SourceRepository for InMemorySourceRepo {
    async fn create(&self, source: &Source) -> Result<Source, RepositoryError> {
        self.sources.lock().insert(source.id, source.clone());
        Ok(source.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Source>, RepositoryError> {
        Ok(self.sources.lock().get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Source>, RepositoryError> {
        let sources = self.sources.lock();
        Ok(ids.iter().filter_map(|id| sources.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Source>, RepositoryError> {
        Ok(self.sources.lock().values().cloned().collect())
    }

    async fn update_health(&self, id: Uuid, health: &SourceHealth) -> Result<(), RepositoryError> {
        let mut sources = self.sources.lock();
        let source = sources.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        source.health = health.clone();
        source.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryJobRepo {
    jobs: Mutex<HashMap<Uuid, ScrapingJob>>,
}

#[async_trait]
impl JobRepository for InMemoryJobRepo {
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError> {
        self.jobs.lock().insert(job.id, job.clone());
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError> {
        Ok(self.jobs.lock().get(&id).cloned())
    }

    async fn mark_started(
        &self,
        id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        job.status = JobStatus::InProgress;
        job.started_at = Some(started_at);
        Ok(())
    }

    async fn mark_terminal(
        &self,
        id: Uuid,
        status: JobStatus,
        total_articles: i32,
        total_errors: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        job.status = status;
        job.total_articles = total_articles;
        job.total_errors = total_errors;
        job.completed_at = Some(completed_at);
        Ok(())
    }

    async fn increment_errors(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.lock();
        let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        job.total_errors += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryContentRepo {
    items: Mutex<Vec<ContentItem>>,
}

impl InMemoryContentRepo {
    pub fn items(&self) -> Vec<ContentItem> {
        self.items.lock().clone()
    }
}

#[async_trait]
impl ContentRepository for InMemoryContentRepo {
    async fn save_and_count(&self, item: &ContentItem) -> Result<(), RepositoryError> {
        self.items.lock().push(item.clone());
        Ok(())
    }

    async fn hashes_for_source(
        &self,
        source_id: Uuid,
    ) -> Result<HashSet<String>, RepositoryError> {
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|i| i.source_id == source_id)
            .map(|i| i.content_hash.clone())
            .collect())
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<ContentItem>, RepositoryError> {
        Ok(self
            .items
            .lock()
            .iter()
            .filter(|i| i.job_id == job_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryLogRepo {
    entries: Mutex<Vec<LogEntry>>,
}

#[async_trait]
impl LogRepository for InMemoryLogRepo {
    async fn append(&self, entry: &LogEntry) -> Result<(), RepositoryError> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<LogEntry>, RepositoryError> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|e| e.job_id == job_id)
            .cloned()
            .collect())
    }
}

pub struct TestHarness {
    pub source_repo: Arc<InMemorySourceRepo>,
    pub job_repo: Arc<InMemoryJobRepo>,
    pub content_repo: Arc<InMemoryContentRepo>,
    pub log_repo: Arc<InMemoryLogRepo>,
    pub registry: Arc<JobRegistry>,
    pub runner:
        Arc<JobRunner<InMemorySourceRepo, InMemoryJobRepo, InMemoryContentRepo, InMemoryLogRepo>>,
}

pub fn harness(pool_size: usize) -> TestHarness {
    let source_repo = Arc::new(InMemorySourceRepo::default());
    let job_repo = Arc::new(InMemoryJobRepo::default());
    let content_repo = Arc::new(InMemoryContentRepo::default());
    let log_repo = Arc::new(InMemoryLogRepo::default());
    let registry = Arc::new(JobRegistry::new());

    let client = reqwest::Client::new();
    let runner = Arc::new(JobRunner::new(
        source_repo.clone(),
        job_repo.clone(),
        content_repo.clone(),
        log_repo.clone(),
        Arc::new(FeedIngestor::new(client.clone())),
        Arc::new(ArticleFetcher::new(client)),
        Arc::new(ExtractionEngine::new(ExtractionConfig::default())),
        Arc::new(SourceHealthTracker::new(HealthConfig::default())),
        RobotsChecker::new(),
        registry.clone(),
        pool_size,
        45,
    ));

    TestHarness {
        source_repo,
        job_repo,
        content_repo,
        log_repo,
        registry,
        runner,
    }
}

impl TestHarness {
    /// 注册一个指向mock服务器的信息源
    pub async fn add_source(&self, name: &str, feed_url: String) -> Source {
        let policy = ScrapePolicy {
            request_delay_ms: 0,
            timeout_secs: 1,
            user_agent: "newsrake-tests/0.1".to_string(),
            respect_robots_txt: false,
        };
        let source = Source::new(name.to_string(), "news.test".to_string(), feed_url, policy);
        self.source_repo.create(&source).await.unwrap();
        source
    }

    /// 同步执行一个作业直至终态并返回最终作业记录
    pub async fn run_job(&self, source_ids: Vec<Uuid>, articles_per_source: u32) -> ScrapingJob {
        let job = ScrapingJob::new(source_ids, articles_per_source);
        self.job_repo.create(&job).await.unwrap();
        self.runner.clone().run(job.clone()).await;
        self.job_repo.find_by_id(job.id).await.unwrap().unwrap()
    }
}

/// 构造一份RSS订阅源XML
pub fn feed_xml(links: &[String]) -> String {
    let items: String = links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            format!(
                "<item><title>Story {}</title><link>{}</link></item>",
                i + 1,
                link
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
        <rss version="2.0"><channel><title>Wire</title><language>en</language>{}</channel></rss>"#,
        items
    )
}

/// 构造一篇可提取的文章页面
pub fn article_html(title: &str) -> String {
    format!(
        r#"<html lang="en"><head>
        <meta name="author" content="Test Reporter">
        <meta property="article:published_time" content="2025-08-01T09:30:00Z">
        </head><body>
        <h1>{}</h1>
        <div class="article-body">
            <p>The first paragraph of this story carries enough prose to survive filtering.</p>
            <p>The second paragraph of this story also carries enough prose to survive.</p>
            <p>The third paragraph closes out the piece with a few more words of prose.</p>
        </div>
        </body></html>"#,
        title
    )
}

/// 轮询等待条件成立
pub async fn wait_until<F>(mut condition: F, timeout: Duration)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {:?}",
            timeout
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
