// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::Extension;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use migration::{Migrator, MigratorTrait};
use newsrake::config::settings::Settings;
use newsrake::extraction::engine::ExtractionEngine;
use newsrake::extraction::ExtractionConfig;
use newsrake::health::tracker::{HealthConfig, SourceHealthTracker};
use newsrake::infrastructure::database::connection;
use newsrake::infrastructure::http::client::ArticleFetcher;
use newsrake::infrastructure::repositories::content_repo_impl::ContentRepositoryImpl;
use newsrake::infrastructure::repositories::job_repo_impl::JobRepositoryImpl;
use newsrake::infrastructure::repositories::log_repo_impl::LogRepositoryImpl;
use newsrake::infrastructure::repositories::source_repo_impl::SourceRepositoryImpl;
use newsrake::ingest::feed::FeedIngestor;
use newsrake::orchestrator::{JobRegistry, JobRunner, JobService};
use newsrake::presentation::routes;
use newsrake::utils::robots::RobotsChecker;
use newsrake::utils::telemetry;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting newsrake...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = Arc::new(connection::create_pool(&settings.database).await?);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let source_repo = Arc::new(SourceRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(JobRepositoryImpl::new(db.clone()));
    let content_repo = Arc::new(ContentRepositoryImpl::new(db.clone()));
    let log_repo = Arc::new(LogRepositoryImpl::new(db.clone()));

    // 5. Initialize scraping components
    let http_client = reqwest::Client::builder().build()?;
    let ingestor = Arc::new(FeedIngestor::new(http_client.clone()));
    let fetcher = Arc::new(ArticleFetcher::new(http_client));
    let engine = Arc::new(ExtractionEngine::new(ExtractionConfig::from(
        &settings.extraction,
    )));
    let health = Arc::new(SourceHealthTracker::new(HealthConfig::from(
        &settings.health,
    )));
    let robots = RobotsChecker::new();
    let registry = Arc::new(JobRegistry::new());

    let runner = Arc::new(JobRunner::new(
        source_repo.clone(),
        job_repo.clone(),
        content_repo.clone(),
        log_repo.clone(),
        ingestor,
        fetcher,
        engine,
        health,
        robots,
        registry.clone(),
        settings.scraper.worker_pool_size,
        settings.extraction.quality_threshold,
    ));
    let job_service = Arc::new(JobService::new(job_repo.clone(), registry, runner));
    info!("Job orchestrator initialized");

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(source_repo))
        .layer(Extension(job_repo))
        .layer(Extension(content_repo))
        .layer(Extension(log_repo))
        .layer(Extension(job_service))
        .layer(Extension(settings.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
