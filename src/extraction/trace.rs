// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::rules::ArticleField;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 提取策略层
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// 结构化数据层（JSON-LD）
    StructuredData,
    /// 选择器级联层
    Selector,
    /// 段落密度兜底层
    Fallback,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtractionStrategy::StructuredData => write!(f, "structured_data"),
            ExtractionStrategy::Selector => write!(f, "selector"),
            ExtractionStrategy::Fallback => write!(f, "fallback"),
        }
    }
}

/// 提取轨迹
///
/// 记录哪条规则产出了哪个字段以及匹配值前缀，仅用于诊断。
/// 轨迹随作业日志流持久化，绝不会被静默丢弃。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionTrace {
    /// 命中的策略层
    pub strategy: ExtractionStrategy,
    /// 命中的具体规则（选择器或结构化字段名）
    pub rule: String,
    /// 产出的字段
    pub field: ArticleField,
    /// 匹配值前缀
    pub matched_prefix: String,
}

impl ExtractionTrace {
    /// 创建一条轨迹，匹配值截断到指定前缀长度
    pub fn new(
        strategy: ExtractionStrategy,
        rule: impl Into<String>,
        field: ArticleField,
        matched: &str,
        prefix_len: usize,
    ) -> Self {
        Self {
            strategy,
            rule: rule.into(),
            field,
            matched_prefix: matched.chars().take(prefix_len).collect(),
        }
    }
}
