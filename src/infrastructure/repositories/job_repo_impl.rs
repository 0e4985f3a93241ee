// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scraping_job::{JobStatus, ScrapingJob};
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::source_repository::RepositoryError;
use crate::infrastructure::database::entities::scraping_job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{sea_query::Expr, *};
use std::sync::Arc;
use uuid::Uuid;

/// 作业仓库实现
pub struct JobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl JobRepositoryImpl {
    /// 创建新的作业仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: job_entity::Model) -> Result<ScrapingJob, RepositoryError> {
    let source_ids: Vec<Uuid> = serde_json::from_value(m.source_ids)
        .map_err(|e| RepositoryError::Database(DbErr::Custom(e.to_string())))?;
    let status: JobStatus = m.status.parse().map_err(|_| {
        RepositoryError::Database(DbErr::Custom(format!("Invalid job status: {}", m.status)))
    })?;

    Ok(ScrapingJob {
        id: m.id,
        source_ids,
        articles_per_source: m.articles_per_source as u32,
        status,
        total_articles: m.total_articles,
        total_errors: m.total_errors,
        triggered_at: m.triggered_at.into(),
        started_at: m.started_at.map(Into::into),
        completed_at: m.completed_at.map(Into::into),
    })
}

#[async_trait]
impl JobRepository for JobRepositoryImpl {
    async fn create(&self, job: &ScrapingJob) -> Result<ScrapingJob, RepositoryError> {
        let source_ids = serde_json::to_value(&job.source_ids)
            .map_err(|e| RepositoryError::Database(DbErr::Custom(e.to_string())))?;

        let model = job_entity::ActiveModel {
            id: Set(job.id),
            source_ids: Set(source_ids),
            articles_per_source: Set(job.articles_per_source as i32),
            status: Set(job.status.to_string()),
            total_articles: Set(job.total_articles),
            total_errors: Set(job.total_errors),
            triggered_at: Set(job.triggered_at.into()),
            started_at: Set(job.started_at.map(Into::into)),
            completed_at: Set(job.completed_at.map(Into::into)),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapingJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        model.map(to_domain).transpose()
    }

    async fn mark_started(
        &self,
        id: Uuid,
        started_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let model = job_entity::ActiveModel {
            id: Set(id),
            status: Set(JobStatus::InProgress.to_string()),
            started_at: Set(Some(started_at.into())),
            ..Default::default()
        };

        model.update(self.db.as_ref()).await?;
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
        let model = job_entity::ActiveModel {
            id: Set(id),
            status: Set(status.to_string()),
            total_articles: Set(total_articles),
            total_errors: Set(total_errors),
            completed_at: Set(Some(completed_at.into())),
            ..Default::default()
        };

        model.update(self.db.as_ref()).await?;
        Ok(())
    }

    async fn increment_errors(&self, id: Uuid) -> Result<(), RepositoryError> {
        job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::TotalErrors,
                Expr::col(job_entity::Column::TotalErrors).add(1),
            )
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(())
    }
}
