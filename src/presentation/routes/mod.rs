// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::content_repo_impl::ContentRepositoryImpl;
use crate::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use crate::infrastructure::repositories::log_repo_impl::LogRepositoryImpl;
use crate::infrastructure::repositories::source_repo_impl::SourceRepositoryImpl;
use crate::presentation::handlers::{job_handler, source_handler};
use axum::{
    routing::{delete, get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/jobs",
            post(
                job_handler::create_job::<
                    SourceRepositoryImpl,
                    JobRepositoryImpl,
                    ContentRepositoryImpl,
                    LogRepositoryImpl,
                >,
            ),
        )
        .route(
            "/v1/jobs/{id}",
            get(job_handler::get_job::<JobRepositoryImpl>),
        )
        .route(
            "/v1/jobs/{id}/logs",
            get(job_handler::get_job_logs::<JobRepositoryImpl, LogRepositoryImpl>),
        )
        .route(
            "/v1/jobs/{id}",
            delete(
                job_handler::cancel_job::<
                    SourceRepositoryImpl,
                    JobRepositoryImpl,
                    ContentRepositoryImpl,
                    LogRepositoryImpl,
                >,
            ),
        )
        .route(
            "/v1/sources",
            post(source_handler::create_source::<SourceRepositoryImpl>),
        )
        .route(
            "/v1/sources",
            get(source_handler::list_sources::<SourceRepositoryImpl>),
        )
        .route(
            "/v1/sources/{id}",
            get(source_handler::get_source::<SourceRepositoryImpl>),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
