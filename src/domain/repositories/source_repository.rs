// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source::{Source, SourceHealth};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 信息源仓库特质
///
/// 定义信息源数据访问接口。核心层只读取策略与健康度字段、
/// 写入健康度字段；信息源的删除属于外部管理操作。
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// 创建信息源
    async fn create(&self, source: &Source) -> Result<Source, RepositoryError>;
    /// 根据ID查找信息源
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Source>, RepositoryError>;
    /// 根据ID集合查找信息源，保持请求顺序，缺失的ID被省略
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Source>, RepositoryError>;
    /// 列出全部信息源
    async fn list(&self) -> Result<Vec<Source>, RepositoryError>;
    /// 更新信息源健康度字段
    async fn update_health(&self, id: Uuid, health: &SourceHealth) -> Result<(), RepositoryError>;
}
