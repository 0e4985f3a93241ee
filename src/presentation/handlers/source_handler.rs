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

use crate::config::settings::Settings;
use crate::domain::models::source::{ScrapePolicy, Source};
use crate::domain::repositories::source_repository::SourceRepository;

/// 信息源创建请求
///
/// 策略字段可省略，缺省时使用配置的抓取器默认值。
#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub domain: String,
    pub feed_url: String,
    pub request_delay_ms: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
    pub respect_robots_txt: Option<bool>,
}

/// 创建信息源
pub async fn create_source<S>(
    Extension(source_repo): Extension<Arc<S>>,
    Extension(settings): Extension<Arc<Settings>>,
    Json(payload): Json<CreateSourceRequest>,
) -> impl IntoResponse
where
    S: SourceRepository + 'static,
{
    if payload.name.trim().is_empty() || payload.feed_url.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "name and feed_url must not be empty" })),
        )
            .into_response();
    }

    let defaults = &settings.scraper;
    let policy = ScrapePolicy {
        request_delay_ms: payload
            .request_delay_ms
            .unwrap_or(defaults.default_request_delay_ms),
        timeout_secs: payload.timeout_secs.unwrap_or(defaults.default_timeout_secs),
        user_agent: payload
            .user_agent
            .unwrap_or_else(|| defaults.default_user_agent.clone()),
        respect_robots_txt: payload.respect_robots_txt.unwrap_or(true),
    };

    let source = Source::new(payload.name, payload.domain, payload.feed_url, policy);
    match source_repo.create(&source).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// 列出全部信息源
pub async fn list_sources<S>(Extension(source_repo): Extension<Arc<S>>) -> impl IntoResponse
where
    S: SourceRepository + 'static,
{
    match source_repo.list().await {
        Ok(sources) => (StatusCode::OK, Json(sources)).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

/// 查询单个信息源（含健康度快照）
pub async fn get_source<S>(
    Extension(source_repo): Extension<Arc<S>>,
    Path(source_id): Path<Uuid>,
) -> impl IntoResponse
where
    S: SourceRepository + 'static,
{
    match source_repo.find_by_id(source_id).await {
        Ok(Some(source)) => (StatusCode::OK, Json(source)).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
