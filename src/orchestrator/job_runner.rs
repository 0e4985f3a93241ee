// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use futures::future::join_all;
use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Semaphore};
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::models::content_item::{ContentItem, ProcessingStatus};
use crate::domain::models::log_entry::LogEntry;
use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::models::source::Source;
use crate::domain::repositories::content_repository::ContentRepository;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::log_repository::LogRepository;
use crate::domain::repositories::source_repository::SourceRepository;
use crate::extraction::engine::ExtractionEngine;
use crate::health::tracker::SourceHealthTracker;
use crate::infrastructure::http::client::ArticleFetcher;
use crate::ingest::dedup::DedupIndex;
use crate::ingest::feed::{CandidateArticle, FeedIngestor};
use crate::orchestrator::accumulator::{spawn_accumulator, JobEvent};
use crate::orchestrator::registry::{CancelFlag, JobRegistry};
use crate::utils::errors::ScrapeError;
use crate::utils::robots::RobotsChecker;

/// 作业执行器
///
/// 驱动单个抓取作业的完整生命周期：源工作池、每源串行的
/// 文章循环、协作式取消与终态落库。即使执行期间发生配置级
/// 故障，作业也必须进入终态，绝不滞留在 InProgress。
pub struct JobRunner<S, J, C, L>
where
    S: SourceRepository + 'static,
    J: JobRepository + 'static,
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
{
    source_repo: Arc<S>,
    job_repo: Arc<J>,
    content_repo: Arc<C>,
    log_repo: Arc<L>,
    ingestor: Arc<FeedIngestor>,
    fetcher: Arc<ArticleFetcher>,
    engine: Arc<ExtractionEngine>,
    health: Arc<SourceHealthTracker>,
    robots: RobotsChecker,
    registry: Arc<JobRegistry>,
    pool_size: usize,
    quality_threshold: u8,
}

impl<S, J, C, L> JobRunner<S, J, C, L>
where
    S: SourceRepository + 'static,
    J: JobRepository + 'static,
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
{
    /// 创建新的作业执行器实例
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source_repo: Arc<S>,
        job_repo: Arc<J>,
        content_repo: Arc<C>,
        log_repo: Arc<L>,
        ingestor: Arc<FeedIngestor>,
        fetcher: Arc<ArticleFetcher>,
        engine: Arc<ExtractionEngine>,
        health: Arc<SourceHealthTracker>,
        robots: RobotsChecker,
        registry: Arc<JobRegistry>,
        pool_size: usize,
        quality_threshold: u8,
    ) -> Self {
        Self {
            source_repo,
            job_repo,
            content_repo,
            log_repo,
            ingestor,
            fetcher,
            engine,
            health,
            robots,
            registry,
            pool_size,
            quality_threshold,
        }
    }

    /// 执行一个新建状态的作业直至终态
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    pub async fn run(self: Arc<Self>, job: ScrapingJob) {
        let job_id = job.id;
        let articles_per_source = job.articles_per_source;
        let source_ids = job.source_ids.clone();

        let job = match job.start() {
            Ok(j) => j,
            Err(e) => {
                error!("job cannot start: {}", e);
                return;
            }
        };

        if let Err(e) = self
            .job_repo
            .mark_started(job_id, job.started_at.unwrap_or_else(Utc::now))
            .await
        {
            error!("failed to mark job started: {}", e);
            self.finalize(job_id, JobStatus::Failed, 0, 1).await;
            return;
        }

        let flag = self.registry.register(job_id);

        let sources = match self.source_repo.find_by_ids(&source_ids).await {
            Ok(s) => s,
            Err(e) => {
                error!("failed to load job sources: {}", e);
                self.append_log(
                    LogEntry::error(job_id, "failed to load sources, job aborted")
                        .with_detail(json!({"reason": e.to_string()})),
                )
                .await;
                self.finalize(job_id, JobStatus::Failed, 0, 1).await;
                self.registry.remove(job_id);
                return;
            }
        };

        let (tx, accumulator) = spawn_accumulator(
            job_id,
            self.content_repo.clone(),
            self.log_repo.clone(),
            self.job_repo.clone(),
        );

        // Requested ids with no matching source count as source-level errors
        for id in source_ids.iter().filter(|id| !sources.iter().any(|s| s.id == **id)) {
            let log = LogEntry::error(job_id, format!("source {} not found", id));
            send_event(&tx, JobEvent::Failed { log }).await;
        }

        let parallelism = self.pool_size.max(1).min(sources.len().max(1));
        let semaphore = Arc::new(Semaphore::new(parallelism));
        let dedup = Arc::new(DedupIndex::new());

        info!(sources = sources.len(), parallelism, "job started");

        let mut handles = Vec::with_capacity(sources.len());
        for source in sources {
            let runner = self.clone();
            let semaphore = semaphore.clone();
            let tx = tx.clone();
            let dedup = dedup.clone();
            let flag = flag.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                // Cancellation checkpoint between sources
                if flag.is_cancelled() {
                    return;
                }
                runner
                    .process_source(job_id, source, articles_per_source, &tx, &dedup, &flag)
                    .await;
            }));
        }

        join_all(handles).await;
        drop(tx);

        let counters = match accumulator.await {
            Ok(c) => c,
            Err(e) => {
                error!("accumulator task failed: {}", e);
                Default::default()
            }
        };

        let status = if flag.is_cancelled() {
            JobStatus::Cancelled
        } else {
            JobStatus::terminal_for(counters.total_articles, counters.total_errors)
        };

        self.append_log(
            LogEntry::info(job_id, format!("job finished with status {}", status)).with_detail(
                json!({
                    "status": status.to_string(),
                    "total_articles": counters.total_articles,
                    "total_errors": counters.total_errors,
                }),
            ),
        )
        .await;

        self.finalize(job_id, status, counters.total_articles, counters.total_errors)
            .await;
        self.registry.remove(job_id);

        info!(
            status = %status,
            total_articles = counters.total_articles,
            total_errors = counters.total_errors,
            "job finished"
        );
    }

    /// 处理单个信息源
    ///
    /// 同一源内的文章请求严格串行并遵守请求间隔；文章之间是
    /// 取消检查点；连续失败达到阈值后跳过剩余候选。
    #[instrument(skip_all, fields(job_id = %job_id, source = %source.name))]
    async fn process_source(
        &self,
        job_id: Uuid,
        source: Source,
        articles_per_source: u32,
        tx: &mpsc::Sender<JobEvent>,
        dedup: &DedupIndex,
        flag: &CancelFlag,
    ) {
        if !source.health.is_healthy {
            send_event(
                tx,
                JobEvent::Log(
                    LogEntry::warning(
                        job_id,
                        format!("source {} was unhealthy after previous runs", source.name),
                    )
                    .with_source(source.id),
                ),
            )
            .await;
        }

        match self.content_repo.hashes_for_source(source.id).await {
            Ok(known) => dedup.preload(known),
            Err(e) => {
                warn!("failed to preload content hashes: {}", e);
            }
        }

        let feed_started = Instant::now();
        let candidates = match self
            .ingestor
            .fetch_candidates(&source, articles_per_source, dedup)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                self.health.record_attempt(
                    source.id,
                    false,
                    feed_started.elapsed().as_millis() as u64,
                );
                let log = LogEntry::error(job_id, e.to_string())
                    .with_source(source.id)
                    .with_detail(e.detail());
                send_event(tx, JobEvent::Failed { log }).await;
                self.persist_health(&source).await;
                return;
            }
        };

        send_event(
            tx,
            JobEvent::Log(
                LogEntry::info(
                    job_id,
                    format!("{} candidates for source {}", candidates.len(), source.name),
                )
                .with_source(source.id),
            ),
        )
        .await;

        for (index, candidate) in candidates.iter().enumerate() {
            if index > 0 {
                // Per-source politeness delay with a little jitter
                let jitter: u64 = rand::rng().random_range(0..=100);
                sleep(Duration::from_millis(source.policy.request_delay_ms + jitter)).await;
            }

            // Cancellation checkpoint between articles, after the delay
            if flag.is_cancelled() {
                send_event(
                    tx,
                    JobEvent::Log(
                        LogEntry::info(job_id, "cancellation observed, stopping source")
                            .with_source(source.id),
                    ),
                )
                .await;
                break;
            }

            if source.policy.respect_robots_txt
                && !self
                    .robots
                    .is_allowed(&candidate.url, &source.policy.user_agent)
                    .await
            {
                send_event(
                    tx,
                    JobEvent::Log(
                        LogEntry::info(
                            job_id,
                            format!("{} disallowed by robots.txt, skipped", candidate.url),
                        )
                        .with_source(source.id),
                    ),
                )
                .await;
                continue;
            }

            self.process_article(job_id, &source, candidate, tx).await;

            if !self.health.is_healthy(source.id) {
                let snapshot = self.health.snapshot(source.id);
                send_event(
                    tx,
                    JobEvent::Log(
                        LogEntry::warning(
                            job_id,
                            format!(
                                "source {} unhealthy, skipping remaining candidates",
                                source.name
                            ),
                        )
                        .with_source(source.id)
                        .with_detail(json!({
                            "consecutive_failures": snapshot.consecutive_failures,
                            "success_rate": snapshot.success_rate,
                        })),
                    ),
                )
                .await;
                break;
            }
        }

        self.persist_health(&source).await;
    }

    /// 抓取并提取单篇文章，产出对应的作业事件
    async fn process_article(
        &self,
        job_id: Uuid,
        source: &Source,
        candidate: &CandidateArticle,
        tx: &mpsc::Sender<JobEvent>,
    ) {
        // Failures carry their real elapsed time so timeouts do not drag
        // the average response time toward zero
        let fetch_started = Instant::now();
        let page = match self.fetcher.fetch(&candidate.url, &source.policy).await {
            Ok(p) => p,
            Err(e) => {
                self.health.record_attempt(
                    source.id,
                    false,
                    fetch_started.elapsed().as_millis() as u64,
                );
                let log = LogEntry::error(job_id, e.to_string())
                    .with_source(source.id)
                    .with_detail(e.detail());
                send_event(tx, JobEvent::Failed { log }).await;
                return;
            }
        };
        self.health.record_attempt(source.id, true, page.elapsed_ms);

        let result = self.engine.extract(
            &page.html,
            &candidate.url,
            candidate.language_hint.as_deref(),
        );

        let body_is_empty = result.body_is_empty();
        let processing_status =
            ProcessingStatus::from_quality(body_is_empty, result.quality_score, self.quality_threshold);

        let item = ContentItem {
            id: Uuid::new_v4(),
            source_id: source.id,
            job_id,
            source_url: candidate.url.clone(),
            title: result.title.or_else(|| candidate.title_hint.clone()),
            author: result.author,
            published_at_raw: result.published_at_raw,
            published_at: result.published_at.or(candidate.published_hint),
            body: result.body,
            language: result.language,
            processing_status,
            quality_score: result.quality_score as i32,
            content_hash: candidate.content_hash.clone(),
            created_at: Utc::now(),
        };

        let log = LogEntry::info(
            job_id,
            format!("extracted {} ({})", candidate.url, processing_status),
        )
        .with_source(source.id)
        .with_detail(json!({
            "quality_score": item.quality_score,
            "paragraphs": result.paragraph_count,
            "elapsed_ms": page.elapsed_ms,
            "traces": result.traces,
        }));

        send_event(tx, JobEvent::Scraped { item, log }).await;

        // Empty extractions are stored for inspection and counted as errors
        if body_is_empty {
            let err = ScrapeError::ExtractionEmpty {
                url: candidate.url.clone(),
            };
            let log = LogEntry::error(job_id, err.to_string())
                .with_source(source.id)
                .with_detail(err.detail());
            send_event(tx, JobEvent::Failed { log }).await;
        }
    }

    /// 将终态与计数落库，失败时仅能记录到进程日志
    async fn finalize(&self, job_id: Uuid, status: JobStatus, articles: i32, errors: i32) {
        if let Err(e) = self
            .job_repo
            .mark_terminal(job_id, status, articles, errors, Utc::now())
            .await
        {
            error!(job_id = %job_id, "failed to persist terminal job state: {}", e);
        }
    }

    /// 将健康度快照写回信息源
    async fn persist_health(&self, source: &Source) {
        let snapshot = self.health.snapshot(source.id);
        if let Err(e) = self.source_repo.update_health(source.id, &snapshot).await {
            warn!(source = %source.name, "failed to persist source health: {}", e);
        }
    }

    /// 直接追加一条作业日志（累加器之外的生命周期日志）
    async fn append_log(&self, entry: LogEntry) {
        if let Err(e) = self.log_repo.append(&entry).await {
            error!(job_id = %entry.job_id, "failed to append job log: {}", e);
        }
    }
}

async fn send_event(tx: &mpsc::Sender<JobEvent>, event: JobEvent) {
    if tx.send(event).await.is_err() {
        error!("job event channel closed before workers finished");
    }
}
