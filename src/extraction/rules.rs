// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 文章字段枚举
///
/// 各字段独立提取，互不影响：一个字段走结构化数据层，
/// 另一个字段可以走选择器层或兜底层。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleField {
    /// 标题
    Title,
    /// 作者
    Author,
    /// 发布时间
    PublishedAt,
    /// 正文
    Body,
}

impl fmt::Display for ArticleField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArticleField::Title => write!(f, "title"),
            ArticleField::Author => write!(f, "author"),
            ArticleField::PublishedAt => write!(f, "published_at"),
            ArticleField::Body => write!(f, "body"),
        }
    }
}

/// 提取规则
///
/// 显式有序的规则表取代隐式的"先试这个再试那个"分支：
/// 同一字段的规则按声明顺序求值，第一条产出非空内容的规则胜出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// 目标字段
    pub field: ArticleField,
    /// CSS选择器
    pub selector: String,
    /// 取该属性的值；为 None 时取元素文本
    pub attr: Option<String>,
}

impl ExtractionRule {
    fn text(field: ArticleField, selector: &str) -> Self {
        Self {
            field,
            selector: selector.to_string(),
            attr: None,
        }
    }

    fn attr(field: ArticleField, selector: &str, attr: &str) -> Self {
        Self {
            field,
            selector: selector.to_string(),
            attr: Some(attr.to_string()),
        }
    }
}

/// 默认选择器级联规则表
///
/// 顺序即优先级。正文规则匹配到的容器不会被当作整块文本，
/// 而是按段落粒度继续处理。
pub fn default_rules() -> Vec<ExtractionRule> {
    use ArticleField::*;

    vec![
        // Title cascade
        ExtractionRule::text(Title, "h1"),
        ExtractionRule::attr(Title, r#"meta[property="og:title"]"#, "content"),
        ExtractionRule::text(Title, ".headline"),
        ExtractionRule::text(Title, ".article-title"),
        ExtractionRule::text(Title, "title"),
        // Author cascade
        ExtractionRule::attr(Author, r#"meta[name="author"]"#, "content"),
        ExtractionRule::text(Author, r#"[rel="author"]"#),
        ExtractionRule::text(Author, ".byline"),
        ExtractionRule::text(Author, ".author-name"),
        ExtractionRule::text(Author, r#"[itemprop="author"] [itemprop="name"]"#),
        // Published-at cascade
        ExtractionRule::attr(
            PublishedAt,
            r#"meta[property="article:published_time"]"#,
            "content",
        ),
        ExtractionRule::attr(PublishedAt, "time[datetime]", "datetime"),
        ExtractionRule::text(PublishedAt, "time"),
        ExtractionRule::text(PublishedAt, ".published-date"),
        // Body container cascade
        ExtractionRule::text(Body, r#"[itemprop="articleBody"]"#),
        ExtractionRule::text(Body, ".article-body"),
        ExtractionRule::text(Body, ".story-body"),
        ExtractionRule::text(Body, ".entry-content"),
        ExtractionRule::text(Body, ".post-content"),
        ExtractionRule::text(Body, "article"),
    ]
}
