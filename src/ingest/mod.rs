// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 订阅源摄取模块
//!
//! 负责拉取并解析 RSS/Atom 订阅源，产出去重后的候选文章列表。

pub mod dedup;
pub mod feed;

pub use dedup::DedupIndex;
pub use feed::{CandidateArticle, FeedIngestor};
