// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::source_repository::RepositoryError;
use crate::domain::models::content_item::ContentItem;
use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

/// 内容条目仓库特质
///
/// 条目创建后不再修改。`save_and_count` 必须原子地完成入库与
/// 作业计数递增：条目绝不会只被计数而未入库，反之亦然。
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// 原子地保存条目并递增所属作业的已抓取计数
    async fn save_and_count(&self, item: &ContentItem) -> Result<(), RepositoryError>;
    /// 获取某信息源全部已存储的内容哈希（用于去重索引的播种）
    async fn hashes_for_source(&self, source_id: Uuid) -> Result<HashSet<String>, RepositoryError>;
    /// 查询某作业产出的全部条目
    async fn find_by_job(&self, job_id: Uuid) -> Result<Vec<ContentItem>, RepositoryError>;
}
