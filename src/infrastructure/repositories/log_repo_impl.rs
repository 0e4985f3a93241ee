// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::log_entry::{LogEntry, LogLevel};
use crate::domain::repositories::log_repository::LogRepository;
use crate::domain::repositories::source_repository::RepositoryError;
use crate::infrastructure::database::entities::job_log as log_entity;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 日志仓库实现
pub struct LogRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl LogRepositoryImpl {
    /// 创建新的日志仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: log_entity::Model) -> Result<LogEntry, RepositoryError> {
    let level: LogLevel = m.level.parse().map_err(|_| {
        RepositoryError::Database(DbErr::Custom(format!("Invalid log level: {}", m.level)))
    })?;

    Ok(LogEntry {
        id: m.id,
        job_id: m.job_id,
        source_id: m.source_id,
        level,
        message: m.message,
        detail: m.detail,
        created_at: m.created_at.into(),
    })
}

#[async_trait]
impl LogRepository for LogRepositoryImpl {
    async fn append(&self, entry: &LogEntry) -> Result<(), RepositoryError> {
        // seq stays unset, the database assigns the append position
        let model = log_entity::ActiveModel {
            id: Set(entry.id),
            job_id: Set(entry.job_id),
            source_id: Set(entry.source_id),
            level: Set(entry.level.to_string()),
            message: Set(entry.message.clone()),
            detail: Set(entry.detail.clone()),
            created_at: Set(entry.created_at.into()),
            ..Default::default()
        };

        model.insert(self.db.as_ref()).await?;
        Ok(())
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<LogEntry>, RepositoryError> {
        let models = log_entity::Entity::find()
            .filter(log_entity::Column::JobId.eq(job_id))
            .order_by_asc(log_entity::Column::CreatedAt)
            .order_by_asc(log_entity::Column::Seq)
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(to_domain).collect()
    }
}
