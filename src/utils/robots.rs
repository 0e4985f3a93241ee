// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use parking_lot::Mutex;
use reqwest::Client;
use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// 缓存的Robots.txt内容
#[derive(Clone)]
struct CachedRobots {
    /// 内容
    content: String,

    /// 过期时间
    expires_at: Instant,
}

/// Robots.txt检查器
///
/// 按主机缓存 robots.txt 内容。获取失败按允许处理：
/// 礼貌策略是尽力而为，不应因 robots 不可达而阻塞抓取。
#[derive(Clone)]
pub struct RobotsChecker {
    /// HTTP客户端
    client: Client,

    /// 内存缓存
    memory_cache: Arc<Mutex<HashMap<String, CachedRobots>>>,

    /// 缓存有效期
    cache_ttl: Duration,
}

impl Default for RobotsChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl RobotsChecker {
    /// 创建新的Robots检查器实例
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            memory_cache: Arc::new(Mutex::new(HashMap::new())),
            cache_ttl: Duration::from_secs(3600),
        }
    }

    /// 检查URL是否被允许访问
    pub async fn is_allowed(&self, url_str: &str, user_agent: &str) -> bool {
        let url = match Url::parse(url_str) {
            Ok(u) => u,
            Err(_) => return true,
        };

        let content = match self.get_robots_content(&url).await {
            Some(c) => c,
            None => return true,
        };

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&content, user_agent, url.path())
    }

    /// 获取Robots.txt内容（带缓存）
    async fn get_robots_content(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        let scheme = url.scheme();
        let port = url.port_or_known_default().unwrap_or(80);

        let robots_url = format!("{}://{}:{}/robots.txt", scheme, host, port);

        {
            let mut cache = self.memory_cache.lock();
            if let Some(cached) = cache.get(&robots_url) {
                if cached.expires_at > Instant::now() {
                    return Some(cached.content.clone());
                } else {
                    cache.remove(&robots_url);
                }
            }
        }

        let content = match self.client.get(&robots_url).send().await {
            Ok(resp) if resp.status().is_success() => resp.text().await.unwrap_or_default(),
            // 404 or fetch error: treat as empty rules (everything allowed)
            _ => String::new(),
        };

        self.memory_cache.lock().insert(
            robots_url,
            CachedRobots {
                content: content.clone(),
                expires_at: Instant::now() + self.cache_ttl,
            },
        );

        Some(content)
    }
}
