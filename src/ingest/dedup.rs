// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashSet;
use std::collections::HashSet;

/// 作业内共享的去重索引
///
/// 以内容哈希为键，供同一作业的所有工作协程并发读写。
/// 作业启动时从存储预载已有哈希，使重复运行不产生新条目。
#[derive(Debug, Default)]
pub struct DedupIndex {
    hashes: DashSet<String>,
}

impl DedupIndex {
    /// 创建空索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 预载存储中已有的内容哈希
    pub fn preload(&self, known: HashSet<String>) {
        for hash in known {
            self.hashes.insert(hash);
        }
    }

    /// 尝试占据一个哈希
    ///
    /// 返回 true 表示该哈希此前未出现，调用方获得处理权；
    /// 返回 false 表示重复，应跳过。
    pub fn claim(&self, hash: &str) -> bool {
        self.hashes.insert(hash.to_string())
    }

    /// 当前索引大小
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// 索引是否为空
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
