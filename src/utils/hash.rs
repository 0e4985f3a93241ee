// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};

/// 计算文章 URL 的内容哈希
///
/// 哈希在抓取前即可得出，因此订阅源层可以在不发起 HTTP 请求的
/// 情况下跳过已处理过的文章，使重复运行具有幂等性。
pub fn content_hash(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().as_bytes());
    hex::encode(hasher.finalize())
}
