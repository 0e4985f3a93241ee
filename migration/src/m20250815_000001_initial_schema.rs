// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

/// 数据库初始模式迁移
///
/// 创建 sources、scraping_jobs、content_items 和 job_logs 四张核心表。
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    /// 应用数据库迁移
    ///
    /// # 参数
    ///
    /// * `manager` - 数据库模式管理器
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 迁移成功
    /// * `Err(DbErr)` - 迁移失败
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. Create sources table (no dependencies)
        manager
            .create_table(
                Table::create()
                    .table(Sources::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sources::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sources::Name).string().not_null())
                    .col(ColumnDef::new(Sources::Domain).string().not_null())
                    .col(ColumnDef::new(Sources::FeedUrl).string().not_null())
                    .col(
                        ColumnDef::new(Sources::RequestDelayMs)
                            .big_integer()
                            .not_null()
                            .default(1000),
                    )
                    .col(
                        ColumnDef::new(Sources::TimeoutSecs)
                            .big_integer()
                            .not_null()
                            .default(15),
                    )
                    .col(ColumnDef::new(Sources::UserAgent).string().not_null())
                    .col(
                        ColumnDef::new(Sources::RespectRobotsTxt)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sources::SuccessRate)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(Sources::AvgResponseTimeMs)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Sources::ConsecutiveFailures)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Sources::IsHealthy)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Sources::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Sources::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 2. Create scraping_jobs table
        manager
            .create_table(
                Table::create()
                    .table(ScrapingJobs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapingJobs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapingJobs::SourceIds).json().not_null())
                    .col(
                        ColumnDef::new(ScrapingJobs::ArticlesPerSource)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScrapingJobs::Status).string().not_null())
                    .col(
                        ColumnDef::new(ScrapingJobs::TotalArticles)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::TotalErrors)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::TriggeredAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::StartedAt).timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(ScrapingJobs::CompletedAt).timestamp_with_time_zone(),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. Create content_items table (depends on sources and scraping_jobs)
        manager
            .create_table(
                Table::create()
                    .table(ContentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentItems::SourceId).uuid().not_null())
                    .col(ColumnDef::new(ContentItems::JobId).uuid().not_null())
                    .col(ColumnDef::new(ContentItems::SourceUrl).string().not_null())
                    .col(ColumnDef::new(ContentItems::Title).text())
                    .col(ColumnDef::new(ContentItems::Author).text())
                    .col(ColumnDef::new(ContentItems::PublishedAtRaw).text())
                    .col(
                        ColumnDef::new(ContentItems::PublishedAt).timestamp_with_time_zone(),
                    )
                    .col(ColumnDef::new(ContentItems::Body).text().not_null())
                    .col(
                        ColumnDef::new(ContentItems::ProcessingStatus)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentItems::QualityScore)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ContentItems::ContentHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_items_source_id")
                            .from(ContentItems::Table, ContentItems::SourceId)
                            .to(Sources::Table, Sources::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_content_items_job_id")
                            .from(ContentItems::Table, ContentItems::JobId)
                            .to(ScrapingJobs::Table, ScrapingJobs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. Create job_logs table (append-only)
        manager
            .create_table(
                Table::create()
                    .table(JobLogs::Table)
                    .if_not_exists()
                    // Monotonic sequence so entries written within the same
                    // timestamp granularity still read back in append order
                    .col(
                        ColumnDef::new(JobLogs::Seq)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobLogs::Id).uuid().not_null())
                    .col(ColumnDef::new(JobLogs::JobId).uuid().not_null())
                    .col(ColumnDef::new(JobLogs::SourceId).uuid())
                    .col(ColumnDef::new(JobLogs::Level).string().not_null())
                    .col(ColumnDef::new(JobLogs::Message).text().not_null())
                    .col(ColumnDef::new(JobLogs::Detail).json())
                    .col(
                        ColumnDef::new(JobLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_logs_job_id")
                            .from(JobLogs::Table, JobLogs::JobId)
                            .to(ScrapingJobs::Table, ScrapingJobs::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 5. Indexes for the hot query paths
        manager
            .create_index(
                Index::create()
                    .name("idx_content_items_hash")
                    .table(ContentItems::Table)
                    .col(ContentItems::SourceId)
                    .col(ContentItems::ContentHash)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_logs_job_id")
                    .table(JobLogs::Table)
                    .col(JobLogs::JobId)
                    .col(JobLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    /// 回滚数据库迁移
    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContentItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScrapingJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sources::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// sources 表标识符
#[derive(DeriveIden)]
enum Sources {
    Table,
    Id,
    Name,
    Domain,
    FeedUrl,
    RequestDelayMs,
    TimeoutSecs,
    UserAgent,
    RespectRobotsTxt,
    SuccessRate,
    AvgResponseTimeMs,
    ConsecutiveFailures,
    IsHealthy,
    CreatedAt,
    UpdatedAt,
}

/// scraping_jobs 表标识符
#[derive(DeriveIden)]
enum ScrapingJobs {
    Table,
    Id,
    SourceIds,
    ArticlesPerSource,
    Status,
    TotalArticles,
    TotalErrors,
    TriggeredAt,
    StartedAt,
    CompletedAt,
}

/// content_items 表标识符
#[derive(DeriveIden)]
enum ContentItems {
    Table,
    Id,
    SourceId,
    JobId,
    SourceUrl,
    Title,
    Author,
    PublishedAtRaw,
    PublishedAt,
    Body,
    ProcessingStatus,
    QualityScore,
    ContentHash,
    CreatedAt,
}

/// job_logs 表标识符
#[derive(DeriveIden)]
enum JobLogs {
    Table,
    Seq,
    Id,
    JobId,
    SourceId,
    Level,
    Message,
    Detail,
    CreatedAt,
}
