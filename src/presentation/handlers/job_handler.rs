// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::repositories::content_repository::ContentRepository;
use crate::domain::repositories::job_repository::JobRepository;
use crate::domain::repositories::log_repository::LogRepository;
use crate::domain::repositories::source_repository::SourceRepository;
use crate::orchestrator::JobService;

/// 作业创建请求
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    /// 请求抓取的信息源ID集合
    pub source_ids: Vec<Uuid>,
    /// 每个源的目标文章数
    pub articles_per_source: u32,
}

/// 触发新作业
///
/// 作业异步执行，接口立即返回 202 与作业ID。
pub async fn create_job<S, J, C, L>(
    Extension(service): Extension<Arc<JobService<S, J, C, L>>>,
    Json(payload): Json<CreateJobRequest>,
) -> impl IntoResponse
where
    S: SourceRepository + 'static,
    J: JobRepository + 'static,
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
{
    if payload.source_ids.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "source_ids must not be empty" })),
        )
            .into_response();
    }
    if payload.articles_per_source == 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "articles_per_source must be at least 1" })),
        )
            .into_response();
    }

    match service
        .trigger(payload.source_ids, payload.articles_per_source)
        .await
    {
        Ok(job) => (StatusCode::ACCEPTED, Json(job)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// 查询作业状态与计数
pub async fn get_job<J>(
    Extension(job_repo): Extension<Arc<J>>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse
where
    J: JobRepository + 'static,
{
    match job_repo.find_by_id(job_id).await {
        Ok(Some(job)) => (StatusCode::OK, Json(job)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// 按追加顺序查询作业日志
pub async fn get_job_logs<J, L>(
    Extension(job_repo): Extension<Arc<J>>,
    Extension(log_repo): Extension<Arc<L>>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse
where
    J: JobRepository + 'static,
    L: LogRepository + 'static,
{
    match job_repo.find_by_id(job_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }

    match log_repo.find_by_job(job_id).await {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// 请求取消运行中的作业
///
/// 取消是协作式的：接口只设置取消标志，作业在下一个检查点停止。
pub async fn cancel_job<S, J, C, L>(
    Extension(service): Extension<Arc<JobService<S, J, C, L>>>,
    Path(job_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SourceRepository + 'static,
    J: JobRepository + 'static,
    C: ContentRepository + 'static,
    L: LogRepository + 'static,
{
    if service.request_cancel(job_id) {
        (
            StatusCode::ACCEPTED,
            Json(json!({ "job_id": job_id, "status": "cancelling" })),
        )
            .into_response()
    } else {
        (
            StatusCode::CONFLICT,
            Json(json!({ "error": "job is not running" })),
        )
            .into_response()
    }
}
