// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 抓取内容条目实体
///
/// 表示一篇提取完成的文章。创建后不再修改；重新抓取要么
/// 产生新条目，要么被内容哈希去重掉。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// 条目唯一标识符
    pub id: Uuid,
    /// 所属信息源ID
    pub source_id: Uuid,
    /// 产生该条目的作业ID
    pub job_id: Uuid,
    /// 文章原始URL
    pub source_url: String,
    /// 提取的标题
    pub title: Option<String>,
    /// 提取的作者
    pub author: Option<String>,
    /// 提取的发布时间原始字符串
    pub published_at_raw: Option<String>,
    /// 解析后的发布时间（解析失败时保留原始字符串，此字段为空）
    pub published_at: Option<DateTime<Utc>>,
    /// 重建后的正文（段落以三重换行符分隔）
    pub body: String,
    /// 语言代码
    pub language: String,
    /// 处理状态
    pub processing_status: ProcessingStatus,
    /// 质量评分（0-100）
    pub quality_score: i32,
    /// 内容哈希，用于去重
    pub content_hash: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
}

/// 处理状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// 待处理
    #[default]
    Pending,
    /// 完成，质量评分达标
    Completed,
    /// 完成但质量评分低于阈值
    CompletedLowQuality,
    /// 失败，正文提取为空（仍然入库以便排查）
    Failed,
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::CompletedLowQuality => write!(f, "completed_low_quality"),
            ProcessingStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for ProcessingStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProcessingStatus::Pending),
            "completed" => Ok(ProcessingStatus::Completed),
            "completed_low_quality" => Ok(ProcessingStatus::CompletedLowQuality),
            "failed" => Ok(ProcessingStatus::Failed),
            _ => Err(()),
        }
    }
}

impl ProcessingStatus {
    /// 根据质量评分推导处理状态
    ///
    /// 正文为空 → Failed；评分达到阈值 → Completed；否则 → CompletedLowQuality
    pub fn from_quality(body_is_empty: bool, score: u8, threshold: u8) -> Self {
        if body_is_empty {
            ProcessingStatus::Failed
        } else if score >= threshold {
            ProcessingStatus::Completed
        } else {
            ProcessingStatus::CompletedLowQuality
        }
    }
}
