// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 作业日志实体
///
/// 作业范围（可选地附带信息源范围）的结构化日志记录，
/// 携带机器可读的附加数据（提取轨迹、HTTP耗时、错误详情）。
/// 仅追加，创建后不可变。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 日志唯一标识符
    pub id: Uuid,
    /// 所属作业ID
    pub job_id: Uuid,
    /// 相关信息源ID（可选）
    pub source_id: Option<Uuid>,
    /// 日志级别
    pub level: LogLevel,
    /// 日志消息
    pub message: String,
    /// 附加数据负载
    pub detail: Option<Value>,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 日志级别枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// 信息
    Info,
    /// 警告
    Warning,
    /// 错误
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            _ => Err(()),
        }
    }
}

impl LogEntry {
    /// 创建一条日志
    pub fn new(job_id: Uuid, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            job_id,
            source_id: None,
            level,
            message: message.into(),
            detail: None,
            created_at: Utc::now(),
        }
    }

    /// 创建信息级日志
    pub fn info(job_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(job_id, LogLevel::Info, message)
    }

    /// 创建警告级日志
    pub fn warning(job_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(job_id, LogLevel::Warning, message)
    }

    /// 创建错误级日志
    pub fn error(job_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(job_id, LogLevel::Error, message)
    }

    /// 关联信息源
    pub fn with_source(mut self, source_id: Uuid) -> Self {
        self.source_id = Some(source_id);
        self
    }

    /// 附加结构化负载
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}
