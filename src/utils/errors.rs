// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::{json, Value};
use thiserror::Error;

/// 抓取错误类型
///
/// 正常运行中不存在致命错误类别：源级错误导致该源在本次作业中被跳过，
/// 文章级错误只计入作业错误计数，循环继续执行。
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// 订阅源不可用（源级错误，记录日志后跳过该源）
    #[error("Feed unavailable for source {source_name}: {reason}")]
    FeedUnavailable { source_name: String, reason: String },

    /// 文章抓取失败（文章级错误，超时以外的网络错误或非2xx响应）
    #[error("Article fetch failed for {url} (status: {status:?}): {reason}")]
    ArticleFetchFailed {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// 文章抓取超时（文章级错误，携带独立的诊断负载）
    #[error("Article fetch timed out for {url} after {timeout_ms}ms")]
    ArticleFetchTimeout { url: String, timeout_ms: u64 },

    /// 正文提取结果为空（条目仍以 failed 状态入库，便于事后排查）
    #[error("Extraction produced no usable body for {url}")]
    ExtractionEmpty { url: String },
}

impl ScrapeError {
    /// 返回错误的机器可读类别名
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::FeedUnavailable { .. } => "feed_unavailable",
            ScrapeError::ArticleFetchFailed { .. } => "article_fetch_failed",
            ScrapeError::ArticleFetchTimeout { .. } => "article_fetch_timeout",
            ScrapeError::ExtractionEmpty { .. } => "extraction_empty",
        }
    }

    /// 构造用于日志负载的结构化诊断信息
    pub fn detail(&self) -> Value {
        match self {
            ScrapeError::FeedUnavailable { source_name, reason } => json!({
                "kind": self.kind(),
                "source": source_name,
                "reason": reason,
            }),
            ScrapeError::ArticleFetchFailed {
                url,
                status,
                reason,
            } => json!({
                "kind": self.kind(),
                "url": url,
                "status": status,
                "reason": reason,
            }),
            ScrapeError::ArticleFetchTimeout { url, timeout_ms } => json!({
                "kind": self.kind(),
                "url": url,
                "timeout_ms": timeout_ms,
            }),
            ScrapeError::ExtractionEmpty { url } => json!({
                "kind": self.kind(),
                "url": url,
            }),
        }
    }
}
