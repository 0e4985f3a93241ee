// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source::{ScrapePolicy, Source, SourceHealth};
use crate::domain::repositories::source_repository::{RepositoryError, SourceRepository};
use crate::infrastructure::database::entities::source as source_entity;
use async_trait::async_trait;
use sea_orm::*;
use std::sync::Arc;
use uuid::Uuid;

/// 信息源仓库实现
pub struct SourceRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl SourceRepositoryImpl {
    /// 创建新的信息源仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

fn to_domain(m: source_entity::Model) -> Source {
    Source {
        id: m.id,
        name: m.name,
        domain: m.domain,
        feed_url: m.feed_url,
        policy: ScrapePolicy {
            request_delay_ms: m.request_delay_ms as u64,
            timeout_secs: m.timeout_secs as u64,
            user_agent: m.user_agent,
            respect_robots_txt: m.respect_robots_txt,
        },
        health: SourceHealth {
            success_rate: m.success_rate,
            avg_response_time_ms: m.avg_response_time_ms,
            consecutive_failures: m.consecutive_failures as u32,
            is_healthy: m.is_healthy,
        },
        created_at: m.created_at.into(),
        updated_at: m.updated_at.into(),
    }
}

#[async_trait]
impl SourceRepository for SourceRepositoryImpl {
    async fn create(&self, source: &Source) -> Result<Source, RepositoryError> {
        let model = source_entity::ActiveModel {
            id: Set(source.id),
            name: Set(source.name.clone()),
            domain: Set(source.domain.clone()),
            feed_url: Set(source.feed_url.clone()),
            request_delay_ms: Set(source.policy.request_delay_ms as i64),
            timeout_secs: Set(source.policy.timeout_secs as i64),
            user_agent: Set(source.policy.user_agent.clone()),
            respect_robots_txt: Set(source.policy.respect_robots_txt),
            success_rate: Set(source.health.success_rate),
            avg_response_time_ms: Set(source.health.avg_response_time_ms),
            consecutive_failures: Set(source.health.consecutive_failures as i32),
            is_healthy: Set(source.health.is_healthy),
            created_at: Set(source.created_at.into()),
            updated_at: Set(source.updated_at.into()),
        };

        model.insert(self.db.as_ref()).await?;
        Ok(source.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Source>, RepositoryError> {
        let model = source_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(model.map(to_domain))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Source>, RepositoryError> {
        let models = source_entity::Entity::find()
            .filter(source_entity::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await?;

        // Preserve the requested order; missing ids are silently omitted
        let mut by_id: std::collections::HashMap<Uuid, Source> = models
            .into_iter()
            .map(|m| (m.id, to_domain(m)))
            .collect();

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn list(&self) -> Result<Vec<Source>, RepositoryError> {
        let models = source_entity::Entity::find()
            .order_by_asc(source_entity::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update_health(&self, id: Uuid, health: &SourceHealth) -> Result<(), RepositoryError> {
        let model = source_entity::ActiveModel {
            id: Set(id),
            success_rate: Set(health.success_rate),
            avg_response_time_ms: Set(health.avg_response_time_ms),
            consecutive_failures: Set(health.consecutive_failures as i32),
            is_healthy: Set(health.is_healthy),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        model.update(self.db.as_ref()).await?;
        Ok(())
    }
}
