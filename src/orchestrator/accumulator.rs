// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;
use uuid::Uuid;

use crate::domain::models::content_item::ContentItem;
use crate::domain::models::log_entry::LogEntry;
use crate::domain::repositories::content_repository::ContentRepository;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::log_repository::LogRepository;

/// 事件通道缓冲大小
const EVENT_BUFFER: usize = 64;

/// 作业事件
///
/// 工作协程通过通道上报的抓取结果，由累加器串行消费。
#[derive(Debug)]
pub enum JobEvent {
    /// 成功提取一篇文章（条目入库并计数，附带日志）
    Scraped { item: ContentItem, log: LogEntry },
    /// 发生一次错误（源级或文章级，计入错误计数）
    Failed { log: LogEntry },
    /// 纯日志事件，不影响计数
    Log(LogEntry),
}

/// 作业最终计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCounters {
    /// 已抓取文章总数
    pub total_articles: i32,
    /// 错误总数
    pub total_errors: i32,
}

/// 启动作业计数累加器
///
/// 计数器只有这一个写入方：工作协程发送事件，累加器串行地
/// 入库、追加日志并累加计数，避免跨协程的计数竞争。通道
/// 关闭后返回最终计数。
///
/// 持久化失败不会中止累加：入库失败的条目转记为错误，
/// 日志写入失败仅记录到进程日志。
pub fn spawn_accumulator<C, L, J>(
    job_id: Uuid,
    content_repo: Arc<C>,
    log_repo: Arc<L>,
    job_repo: Arc<J>,
) -> (mpsc::Sender<JobEvent>, JoinHandle<JobCounters>)
where
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
    J: JobRepository + 'static,
{
    let (tx, mut rx) = mpsc::channel::<JobEvent>(EVENT_BUFFER);

    let handle = tokio::spawn(async move {
        let mut counters = JobCounters::default();

        while let Some(event) = rx.recv().await {
            match event {
                JobEvent::Scraped { item, log } => {
                    match content_repo.save_and_count(&item).await {
                        Ok(()) => {
                            counters.total_articles += 1;
                            append_log(log_repo.as_ref(), &log).await;
                        }
                        Err(e) => {
                            error!(job_id = %job_id, url = %item.source_url, "failed to persist content item: {}", e);
                            counters.total_errors += 1;
                            let failure = LogEntry::error(
                                job_id,
                                format!("failed to persist article {}", item.source_url),
                            )
                            .with_source(item.source_id);
                            append_log(log_repo.as_ref(), &failure).await;
                        }
                    }
                }
                JobEvent::Failed { log } => {
                    counters.total_errors += 1;
                    if let Err(e) = job_repo.increment_errors(job_id).await {
                        error!(job_id = %job_id, "failed to increment job error counter: {}", e);
                    }
                    append_log(log_repo.as_ref(), &log).await;
                }
                JobEvent::Log(log) => {
                    append_log(log_repo.as_ref(), &log).await;
                }
            }
        }

        counters
    });

    (tx, handle)
}

async fn append_log<L: LogRepository + ?Sized>(log_repo: &L, entry: &LogEntry) {
    if let Err(e) = log_repo.append(entry).await {
        error!(job_id = %entry.job_id, "failed to append job log: {}", e);
    }
}
