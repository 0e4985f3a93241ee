// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 信息源实体
///
/// 表示一个已配置的新闻订阅源，包含身份信息、抓取策略和
/// 派生的健康度指标。健康度字段在每次抓取尝试后由健康度
/// 跟踪器更新，并且始终可以从抓取历史中重新计算出来。
/// 核心层从不删除信息源，删除属于外部管理操作。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Source {
    /// 信息源唯一标识符
    pub id: Uuid,
    /// 信息源名称，用于用户识别和日志展示
    pub name: String,
    /// 信息源域名
    pub domain: String,
    /// 订阅源URL（RSS/Atom）
    pub feed_url: String,
    /// 抓取策略
    pub policy: ScrapePolicy,
    /// 健康度指标
    pub health: SourceHealth,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 更新时间
    pub updated_at: DateTime<Utc>,
}

/// 抓取策略
///
/// 单个信息源的礼貌性与超时配置。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapePolicy {
    /// 同一源内两次请求之间的间隔（毫秒）
    pub request_delay_ms: u64,
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
    /// 请求使用的User-Agent
    pub user_agent: String,
    /// 是否遵守robots.txt
    pub respect_robots_txt: bool,
}

impl Default for ScrapePolicy {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            timeout_secs: 15,
            user_agent: "newsrake/0.1".to_string(),
            respect_robots_txt: true,
        }
    }
}

/// 信息源健康度快照
///
/// 滚动成功率、平均响应时间与连续失败计数。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceHealth {
    /// 滚动窗口内的成功率（0.0-1.0）
    pub success_rate: f64,
    /// 平均响应时间（毫秒）
    pub avg_response_time_ms: f64,
    /// 连续失败次数
    pub consecutive_failures: u32,
    /// 是否健康
    pub is_healthy: bool,
}

impl Default for SourceHealth {
    fn default() -> Self {
        Self {
            success_rate: 1.0,
            avg_response_time_ms: 0.0,
            consecutive_failures: 0,
            is_healthy: true,
        }
    }
}

impl Source {
    /// 创建一个新的信息源
    pub fn new(name: String, domain: String, feed_url: String, policy: ScrapePolicy) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            domain,
            feed_url,
            policy,
            health: SourceHealth::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
