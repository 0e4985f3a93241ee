// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、抓取策略、提取阈值与健康度等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取器配置
    pub scraper: ScraperSettings,
    /// 提取配置
    pub extraction: ExtractionSettings,
    /// 健康度配置
    pub health: HealthSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取器配置设置
#[derive(Debug, Deserialize)]
pub struct ScraperSettings {
    /// 信息源工作池大小（实际并行度为 min(池大小, 源数量)）
    pub worker_pool_size: usize,
    /// 新建源的默认请求间隔（毫秒）
    pub default_request_delay_ms: u64,
    /// 新建源的默认请求超时（秒）
    pub default_timeout_secs: u64,
    /// 新建源的默认User-Agent
    pub default_user_agent: String,
}

/// 提取配置设置
///
/// 噪声过滤阈值是可调参数而非硬编码常量，需针对具体的源语料验证。
#[derive(Debug, Deserialize)]
pub struct ExtractionSettings {
    /// 段落最小长度（字符），低于该值且非唯一段落时被丢弃
    pub min_paragraph_len: usize,
    /// 质量评分阈值，达到该值的条目状态为 completed
    pub quality_threshold: u8,
    /// 被视为媒体说明容器的祖先class列表
    pub caption_classes: Vec<String>,
}

/// 健康度配置设置
#[derive(Debug, Deserialize)]
pub struct HealthSettings {
    /// 滚动成功率窗口大小（最近N次尝试）
    pub window: usize,
    /// 成功率下限，低于该值的源被标记为不健康
    pub success_rate_floor: f64,
    /// 连续失败阈值，达到该值的源被标记为不健康
    pub failure_threshold: u32,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.url", "sqlite://newsrake.db?mode=rwc")?
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            // Default scraper settings
            .set_default("scraper.worker_pool_size", 4)?
            .set_default("scraper.default_request_delay_ms", 1000)?
            .set_default("scraper.default_timeout_secs", 15)?
            .set_default(
                "scraper.default_user_agent",
                "newsrake/0.1 (+https://github.com/Kirky-X/newsrake)",
            )?
            // Default extraction thresholds
            .set_default("extraction.min_paragraph_len", 30)?
            .set_default("extraction.quality_threshold", 45)?
            .set_default(
                "extraction.caption_classes",
                vec![
                    "caption".to_string(),
                    "media-caption".to_string(),
                    "video-caption".to_string(),
                    "image-caption".to_string(),
                ],
            )?
            // Default health settings
            .set_default("health.window", 20)?
            .set_default("health.success_rate_floor", 0.5)?
            .set_default("health.failure_threshold", 3)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("NEWSRAKE").separator("__"));

        builder.build()?.try_deserialize()
    }
}
