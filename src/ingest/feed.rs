// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use feed_rs::parser;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::models::source::Source;
use crate::ingest::dedup::DedupIndex;
use crate::utils::errors::ScrapeError;
use crate::utils::hash::content_hash;

/// 候选文章
///
/// 订阅源条目经去重后的产出，携带订阅源级别的提示信息。
#[derive(Debug, Clone)]
pub struct CandidateArticle {
    /// 文章URL
    pub url: String,
    /// 订阅源提供的标题提示
    pub title_hint: Option<String>,
    /// 订阅源提供的发布时间提示
    pub published_hint: Option<DateTime<Utc>>,
    /// 订阅源声明的语言提示
    pub language_hint: Option<String>,
    /// 内容哈希（去重键）
    pub content_hash: String,
}

/// 订阅源摄取器
///
/// 拉取并解析信息源的订阅地址，按作业目标数量产出候选文章。
/// 拉取或解析失败均归为源级错误，调用方跳过该源并继续作业。
pub struct FeedIngestor {
    client: reqwest::Client,
}

impl FeedIngestor {
    /// 创建订阅源摄取器
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// 拉取信息源的候选文章
    ///
    /// 条目按订阅源顺序处理，已出现在去重索引中的条目被跳过，
    /// 直到收集满 `limit` 条或条目耗尽。对不变的存储重复执行
    /// 会得到空结果。
    ///
    /// # 参数
    ///
    /// * `source` - 信息源
    /// * `limit` - 本次作业的单源文章目标数
    /// * `dedup` - 作业级共享去重索引
    pub async fn fetch_candidates(
        &self,
        source: &Source,
        limit: u32,
        dedup: &DedupIndex,
    ) -> Result<Vec<CandidateArticle>, ScrapeError> {
        let response = self
            .client
            .get(&source.feed_url)
            .header(reqwest::header::USER_AGENT, &source.policy.user_agent)
            .timeout(Duration::from_secs(source.policy.timeout_secs))
            .send()
            .await
            .map_err(|e| ScrapeError::FeedUnavailable {
                source_name: source.name.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ScrapeError::FeedUnavailable {
                source_name: source.name.clone(),
                reason: format!("feed returned status {}", response.status().as_u16()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ScrapeError::FeedUnavailable {
                source_name: source.name.clone(),
                reason: e.to_string(),
            })?;

        let feed =
            parser::parse(bytes.as_ref()).map_err(|e| ScrapeError::FeedUnavailable {
                source_name: source.name.clone(),
                reason: format!("feed parse error: {}", e),
            })?;

        let language_hint = feed.language.clone();
        let mut candidates = Vec::new();
        let mut skipped = 0usize;

        for entry in feed.entries {
            if candidates.len() >= limit as usize {
                break;
            }

            let Some(link) = entry.links.first().map(|l| l.href.clone()) else {
                warn!(source = %source.name, entry_id = %entry.id, "feed entry has no link, skipping");
                continue;
            };

            let hash = content_hash(&link);
            if !dedup.claim(&hash) {
                skipped += 1;
                continue;
            }

            candidates.push(CandidateArticle {
                url: link,
                title_hint: entry.title.map(|t| t.content),
                published_hint: entry.published.or(entry.updated),
                language_hint: language_hint.clone(),
                content_hash: hash,
            });
        }

        debug!(
            source = %source.name,
            candidates = candidates.len(),
            deduplicated = skipped,
            "feed ingestion finished"
        );

        Ok(candidates)
    }
}
