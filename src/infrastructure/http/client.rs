// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::{Duration, Instant};
use tracing::debug;

use crate::domain::models::source::ScrapePolicy;
use crate::utils::errors::ScrapeError;

/// 抓取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 页面HTML
    pub html: String,
    /// HTTP状态码
    pub status: u16,
    /// 响应耗时（毫秒）
    pub elapsed_ms: u64,
}

/// 文章抓取器
///
/// 按信息源策略执行单篇文章的HTTP抓取。超时与其它失败
/// 使用不同的错误类别，便于诊断负载区分。
pub struct ArticleFetcher {
    client: reqwest::Client,
}

impl ArticleFetcher {
    /// 创建文章抓取器
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// 抓取单篇文章
    ///
    /// # 参数
    ///
    /// * `url` - 文章URL
    /// * `policy` - 所属信息源的抓取策略（超时与User-Agent）
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchedPage)` - 抓取成功的页面
    /// * `Err(ScrapeError)` - 文章级错误，调用方计数后继续
    pub async fn fetch(&self, url: &str, policy: &ScrapePolicy) -> Result<FetchedPage, ScrapeError> {
        let timeout = Duration::from_secs(policy.timeout_secs);
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &policy.user_agent)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_request_error(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::ArticleFetchFailed {
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: format!("unexpected status {}", status.as_u16()),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| classify_request_error(url, timeout, e))?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(url, status = status.as_u16(), elapsed_ms, "article fetched");

        Ok(FetchedPage {
            html,
            status: status.as_u16(),
            elapsed_ms,
        })
    }
}

/// 将reqwest错误归类为超时或普通抓取失败
fn classify_request_error(url: &str, timeout: Duration, err: reqwest::Error) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::ArticleFetchTimeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        ScrapeError::ArticleFetchFailed {
            url: url.to_string(),
            status: err.status().map(|s| s.as_u16()),
            reason: err.to_string(),
        }
    }
}
