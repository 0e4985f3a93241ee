// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use std::collections::VecDeque;
use tracing::warn;
use uuid::Uuid;

use crate::config::settings::HealthSettings;
use crate::domain::models::source::SourceHealth;

/// 健康度判定参数
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// 滚动窗口内保留的尝试次数
    pub window: usize,
    /// 成功率下限，低于该值判定为不健康
    pub success_rate_floor: f64,
    /// 连续失败阈值，达到即判定为不健康
    pub failure_threshold: u32,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            window: 20,
            success_rate_floor: 0.5,
            failure_threshold: 3,
        }
    }
}

impl From<&HealthSettings> for HealthConfig {
    fn from(settings: &HealthSettings) -> Self {
        Self {
            window: settings.window,
            success_rate_floor: settings.success_rate_floor,
            failure_threshold: settings.failure_threshold,
        }
    }
}

/// 单个信息源的尝试历史
#[derive(Debug, Default)]
struct AttemptHistory {
    /// 窗口内的尝试记录（成功标志与响应耗时）
    attempts: VecDeque<(bool, u64)>,
    /// 连续失败计数
    consecutive_failures: u32,
}

/// 信息源健康度跟踪器
///
/// 健康度指标是尝试历史的纯函数：每次抓取尝试记入滚动窗口，
/// 快照由窗口内容即时推导。跟踪器只维护内存状态，持久化由
/// 调用方通过仓储层完成。
#[derive(Debug, Default)]
pub struct SourceHealthTracker {
    config: HealthConfig,
    histories: DashMap<Uuid, AttemptHistory>,
}

impl SourceHealthTracker {
    /// 创建健康度跟踪器
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            histories: DashMap::new(),
        }
    }

    /// 记录一次抓取尝试
    ///
    /// # 参数
    ///
    /// * `source_id` - 信息源标识
    /// * `success` - 本次尝试是否成功
    /// * `response_time_ms` - 响应耗时（失败时传入已消耗时间）
    pub fn record_attempt(&self, source_id: Uuid, success: bool, response_time_ms: u64) {
        let mut history = self.histories.entry(source_id).or_default();

        history.attempts.push_back((success, response_time_ms));
        while history.attempts.len() > self.config.window {
            history.attempts.pop_front();
        }

        if success {
            history.consecutive_failures = 0;
        } else {
            history.consecutive_failures += 1;
            if history.consecutive_failures == self.config.failure_threshold {
                warn!(
                    source_id = %source_id,
                    threshold = self.config.failure_threshold,
                    "source reached consecutive failure threshold"
                );
            }
        }
    }

    /// 信息源当前是否健康
    ///
    /// 无历史记录的源视为健康。
    pub fn is_healthy(&self, source_id: Uuid) -> bool {
        self.snapshot(source_id).is_healthy
    }

    /// 计算信息源的健康度快照
    pub fn snapshot(&self, source_id: Uuid) -> SourceHealth {
        let Some(history) = self.histories.get(&source_id) else {
            return SourceHealth::default();
        };

        if history.attempts.is_empty() {
            return SourceHealth::default();
        }

        let total = history.attempts.len();
        let successes = history.attempts.iter().filter(|(ok, _)| *ok).count();
        let success_rate = successes as f64 / total as f64;
        let avg_response_time_ms =
            history.attempts.iter().map(|(_, ms)| *ms as f64).sum::<f64>() / total as f64;

        // The rate floor only applies once the window is full, otherwise a
        // single early failure would immediately sink the rate below it
        let rate_ok =
            total < self.config.window || success_rate >= self.config.success_rate_floor;
        let is_healthy =
            history.consecutive_failures < self.config.failure_threshold && rate_ok;

        SourceHealth {
            success_rate,
            avg_response_time_ms,
            consecutive_failures: history.consecutive_failures,
            is_healthy,
        }
    }
}
