// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 作业编排模块
//!
//! 作业状态机、运行中作业注册表、计数累加器与执行器。

pub mod accumulator;
pub mod job_runner;
pub mod registry;

pub use accumulator::{JobCounters, JobEvent};
pub use job_runner::JobRunner;
pub use registry::{CancelFlag, JobRegistry};

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::models::scraping_job::ScrapingJob;
use crate::domain::repositories::content_repository::ContentRepository;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::log_repository::LogRepository;
use crate::domain::repositories::source_repository::{RepositoryError, SourceRepository};

/// 作业服务
///
/// 表现层的编排入口：创建作业记录并派生异步执行，
/// 将取消请求转发给注册表。
pub struct JobService<S, J, C, L>
where
    S: SourceRepository + 'static,
    J: JobRepository + 'static,
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
{
    job_repo: Arc<J>,
    registry: Arc<JobRegistry>,
    runner: Arc<JobRunner<S, J, C, L>>,
}

impl<S, J, C, L> JobService<S, J, C, L>
where
    S: SourceRepository + 'static,
    J: JobRepository + 'static,
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
{
    /// 创建作业服务
    pub fn new(
        job_repo: Arc<J>,
        registry: Arc<JobRegistry>,
        runner: Arc<JobRunner<S, J, C, L>>,
    ) -> Self {
        Self {
            job_repo,
            registry,
            runner,
        }
    }

    /// 触发一个新作业
    ///
    /// 作业记录先落库，执行在后台任务中进行；调用方立即获得
    /// 作业ID用于后续查询。
    pub async fn trigger(
        &self,
        source_ids: Vec<Uuid>,
        articles_per_source: u32,
    ) -> Result<ScrapingJob, RepositoryError> {
        let job = ScrapingJob::new(source_ids, articles_per_source);
        self.job_repo.create(&job).await?;

        let runner = self.runner.clone();
        let spawned = job.clone();
        tokio::spawn(async move {
            runner.run(spawned).await;
        });

        Ok(job)
    }

    /// 请求取消一个运行中的作业
    ///
    /// 返回 false 表示作业不在运行中（未开始或已进入终态）。
    pub fn request_cancel(&self, job_id: Uuid) -> bool {
        self.registry.request_cancel(job_id)
    }
}
