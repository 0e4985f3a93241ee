// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::source_repository::RepositoryError;
use crate::domain::models::log_entry::LogEntry;
use async_trait::async_trait;
use uuid::Uuid;

/// 日志仓库特质
///
/// 仅追加。同一信息源的文章级日志按抓取顺序写入；
/// 跨源之间不保证顺序。
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// 追加一条日志
    async fn append(&self, entry: &LogEntry) -> Result<(), RepositoryError>;
    /// 按追加顺序查询某作业的全部日志
    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<LogEntry>, RepositoryError>;
}
