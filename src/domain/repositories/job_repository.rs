// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::source_repository::RepositoryError;
use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// 作业仓库特质
///
/// 定义抓取作业数据访问接口。状态列是作业对外唯一的
/// 成败信号，详细诊断通过日志仓库查询。
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// 创建作业
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError>;
    /// 根据ID查找作业
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError>;
    /// 标记作业开始执行（New → InProgress）
    async fn mark_started(
        &self,
        id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    /// 写入终态与最终计数
    async fn mark_terminal(
        &self,
        id: Uuid,
        status: JobStatus,
        total_articles: i32,
        total_errors: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;
    /// 增加错误计数
    async fn increment_errors(&self, id: Uuid) -> Result<(), RepositoryError>;
}
