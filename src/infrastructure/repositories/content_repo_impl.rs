// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::content_item::{ContentItem, ProcessingStatus};
use crate::domain::repositories::content_repository::ContentRepository;
use crate::domain::repositories::source_repository::RepositoryError;
use crate::infrastructure::database::entities::content_item as item_entity;
use crate::infrastructure::database::entities::scraping_job as job_entity;
use async_trait::async_trait;
use sea_orm::{sea_query::Expr, *};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// 内容条目仓库实现
pub struct ContentRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ContentRepositoryImpl {
    /// 创建新的内容条目仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: item_entity::Model) -> Result<ContentItem, RepositoryError> {
    let processing_status: ProcessingStatus = m.processing_status.parse().map_err(|_| {
        RepositoryError::Database(DbErr::Custom(format!(
            "Invalid processing status: {}",
            m.processing_status
        )))
    })?;

    Ok(ContentItem {
        id: m.id,
        source_id: m.source_id,
        job_id: m.job_id,
        source_url: m.source_url,
        title: m.title,
        author: m.author,
        published_at_raw: m.published_at_raw,
        published_at: m.published_at.map(Into::into),
        body: m.body,
        language: m.language,
        processing_status,
        quality_score: m.quality_score,
        content_hash: m.content_hash,
        created_at: m.created_at.into(),
    })
}

#[async_trait]
impl ContentRepository for ContentRepositoryImpl {
    async fn save_and_count(&self, item: &ContentItem) -> Result<(), RepositoryError> {
        // Item insert and job counter increment commit together or not at all
        let txn = self.db.begin().await?;

        let model = item_entity::ActiveModel {
            id: Set(item.id),
            source_id: Set(item.source_id),
            job_id: Set(item.job_id),
            source_url: Set(item.source_url.clone()),
            title: Set(item.title.clone()),
            author: Set(item.author.clone()),
            published_at_raw: Set(item.published_at_raw.clone()),
            published_at: Set(item.published_at.map(Into::into)),
            body: Set(item.body.clone()),
            language: Set(item.language.clone()),
            processing_status: Set(item.processing_status.to_string()),
            quality_score: Set(item.quality_score),
            content_hash: Set(item.content_hash.clone()),
            created_at: Set(item.created_at.into()),
        };
        model.insert(&txn).await?;

        job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::TotalArticles,
                Expr::col(job_entity::Column::TotalArticles).add(1),
            )
            .filter(job_entity::Column::Id.eq(item.job_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn hashes_for_source(
        &self,
        source_id: Uuid,
    ) -> Result<HashSet<String>, RepositoryError> {
        let hashes: Vec<String> = item_entity::Entity::find()
            .select_only()
            .column(item_entity::Column::ContentHash)
            .filter(item_entity::Column::SourceId.eq(source_id))
            .into_tuple()
            .all(self.db.as_ref())
            .await?;
        Ok(hashes.into_iter().collect())
    }

    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<ContentItem>, RepositoryError> {
        let models = item_entity::Entity::find()
            .filter(item_entity::Column::JobId.eq(job_id))
            .order_by_asc(item_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        models.into_iter().map(to_domain).collect()
    }
}
