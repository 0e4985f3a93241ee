// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::paragraphs;
use super::rules::{default_rules, ArticleField, ExtractionRule};
use super::structured::extract_structured;
use super::trace::{ExtractionStrategy, ExtractionTrace};
use super::ExtractionConfig;

static HTML_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("html").unwrap());
static FALLBACK_CANDIDATES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article, main, body > div, body > div > div").unwrap());
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());

/// 提取结果
///
/// 对任意 HTML 输入都会返回：字段尽力而为，可能为空；
/// 轨迹列表永不为 nil。
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// 标题
    pub title: Option<String>,
    /// 作者
    pub author: Option<String>,
    /// 发布时间原始字符串
    pub published_at_raw: Option<String>,
    /// 解析后的发布时间
    pub published_at: Option<DateTime<Utc>>,
    /// 重建后的正文（三重换行分隔段落）
    pub body: String,
    /// 保留的段落数
    pub paragraph_count: usize,
    /// 语言代码
    pub language: String,
    /// 提取轨迹
    pub traces: Vec<ExtractionTrace>,
    /// 质量评分（0-100）
    pub quality_score: u8,
}

impl ExtractionResult {
    /// 正文是否为空
    pub fn body_is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }
}

/// 提取引擎
///
/// 三级策略级联：结构化数据 → 选择器级联 → 段落密度兜底。
/// 严格按层序求值，各字段独立，每字段第一个命中者胜出。
pub struct ExtractionEngine {
    config: ExtractionConfig,
    rules: Vec<ExtractionRule>,
}

impl ExtractionEngine {
    /// 使用默认规则表创建提取引擎
    pub fn new(config: ExtractionConfig) -> Self {
        Self::with_rules(config, default_rules())
    }

    /// 使用自定义规则表创建提取引擎
    pub fn with_rules(config: ExtractionConfig, rules: Vec<ExtractionRule>) -> Self {
        Self { config, rules }
    }

    /// 提取配置
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// 从文章 HTML 提取结构化字段
    ///
    /// 对畸形 HTML 绝不报错，始终返回尽力而为的结果。
    ///
    /// # 参数
    ///
    /// * `html` - 文章页面原始 HTML
    /// * `url` - 文章 URL，仅用于日志
    /// * `language_hint` - 订阅源提供的语言提示
    pub fn extract(&self, html: &str, url: &str, language_hint: Option<&str>) -> ExtractionResult {
        let doc = Html::parse_document(html);
        let mut traces = Vec::new();

        // Tier 1: structured data
        let structured = extract_structured(&doc);

        let mut title = structured.headline;
        if let Some(value) = &title {
            traces.push(self.trace(
                ExtractionStrategy::StructuredData,
                "headline",
                ArticleField::Title,
                value,
            ));
        }

        let mut author = structured.author;
        if let Some(value) = &author {
            traces.push(self.trace(
                ExtractionStrategy::StructuredData,
                "author",
                ArticleField::Author,
                value,
            ));
        }

        let mut published_raw = structured.date_published;
        if let Some(value) = &published_raw {
            traces.push(self.trace(
                ExtractionStrategy::StructuredData,
                "datePublished",
                ArticleField::PublishedAt,
                value,
            ));
        }

        let mut body_paragraphs = Vec::new();
        if let Some(raw_body) = structured.article_body {
            let paragraphs = paragraphs::from_text_block(&raw_body, &self.config);
            if !paragraphs.is_empty() {
                traces.push(self.trace(
                    ExtractionStrategy::StructuredData,
                    "articleBody",
                    ArticleField::Body,
                    &paragraphs[0],
                ));
                body_paragraphs = paragraphs;
            }
        }

        // Tier 2: selector cascade, per unfilled field
        if title.is_none() {
            title = self.cascade_scalar(&doc, ArticleField::Title, &mut traces);
        }
        if author.is_none() {
            author = self.cascade_scalar(&doc, ArticleField::Author, &mut traces);
        }
        if published_raw.is_none() {
            published_raw = self.cascade_scalar(&doc, ArticleField::PublishedAt, &mut traces);
        }
        if body_paragraphs.is_empty() {
            body_paragraphs = self.cascade_body(&doc, &mut traces);
        }

        // Tier 3: paragraph-density fallback for the body
        if body_paragraphs.is_empty() {
            body_paragraphs = self.fallback_body(&doc, &mut traces);
        }

        let body = paragraphs::reconstruct(&body_paragraphs);
        let published_at = published_raw.as_deref().and_then(parse_published_date);
        let language = document_language(&doc)
            .or_else(|| language_hint.map(normalize_language))
            .unwrap_or_else(|| "en".to_string());

        let quality_score = quality_score(
            &body_paragraphs,
            title.is_some(),
            author.is_some(),
            published_raw.is_some(),
        );

        debug!(
            url,
            quality_score,
            paragraphs = body_paragraphs.len(),
            traces = traces.len(),
            "extraction finished"
        );

        ExtractionResult {
            title,
            author,
            published_at_raw: published_raw,
            published_at,
            paragraph_count: body_paragraphs.len(),
            body,
            language,
            traces,
            quality_score,
        }
    }

    /// 对单个标量字段执行选择器级联
    fn cascade_scalar(
        &self,
        doc: &Html,
        field: ArticleField,
        traces: &mut Vec<ExtractionTrace>,
    ) -> Option<String> {
        for rule in self.rules.iter().filter(|r| r.field == field) {
            let selector = match Selector::parse(&rule.selector) {
                Ok(s) => s,
                Err(_) => continue,
            };

            for element in doc.select(&selector) {
                let value = match &rule.attr {
                    Some(attr) => element.value().attr(attr).map(str::to_string),
                    None => Some(element.text().collect::<String>()),
                };
                let value = value
                    .map(|v| v.split_whitespace().collect::<Vec<_>>().join(" "))
                    .filter(|v| !v.is_empty());

                if let Some(value) = value {
                    traces.push(self.trace(
                        ExtractionStrategy::Selector,
                        &rule.selector,
                        field,
                        &value,
                    ));
                    return Some(value);
                }
            }
        }
        None
    }

    /// 对正文字段执行选择器级联（段落粒度）
    fn cascade_body(&self, doc: &Html, traces: &mut Vec<ExtractionTrace>) -> Vec<String> {
        for rule in self.rules.iter().filter(|r| r.field == ArticleField::Body) {
            let selector = match Selector::parse(&rule.selector) {
                Ok(s) => s,
                Err(_) => continue,
            };

            // An empty first match must not shadow a populated sibling
            for container in doc.select(&selector) {
                let paragraphs = paragraphs::harvest(container, &self.config);
                if !paragraphs.is_empty() {
                    traces.push(self.trace(
                        ExtractionStrategy::Selector,
                        &rule.selector,
                        ArticleField::Body,
                        &paragraphs[0],
                    ));
                    return paragraphs;
                }
            }
        }
        Vec::new()
    }

    /// 兜底层：挑选 `<p>` 子元素密度最高的块级候选容器
    fn fallback_body(&self, doc: &Html, traces: &mut Vec<ExtractionTrace>) -> Vec<String> {
        let mut best: Option<(usize, ElementRef)> = None;

        for candidate in doc.select(&FALLBACK_CANDIDATES) {
            let density = candidate
                .children()
                .filter_map(ElementRef::wrap)
                .filter(|child| child.value().name() == "p")
                .count();

            if density > best.map(|(d, _)| d).unwrap_or(0) {
                best = Some((density, candidate));
            }
        }

        if let Some((density, container)) = best {
            let paragraphs = paragraphs::harvest(container, &self.config);
            if !paragraphs.is_empty() {
                traces.push(self.trace(
                    ExtractionStrategy::Fallback,
                    format!("p-density:{}", density),
                    ArticleField::Body,
                    &paragraphs[0],
                ));
                return paragraphs;
            }
        }
        Vec::new()
    }

    fn trace(
        &self,
        strategy: ExtractionStrategy,
        rule: impl Into<String>,
        field: ArticleField,
        value: &str,
    ) -> ExtractionTrace {
        ExtractionTrace::new(strategy, rule, field, value, self.config.trace_prefix_len)
    }
}

/// 质量评分：正文长度、段落数与标题/日期/作者的存在性的启发式组合
fn quality_score(paragraphs: &[String], has_title: bool, has_author: bool, has_date: bool) -> u8 {
    let body_len: usize = paragraphs.iter().map(|p| p.chars().count()).sum();
    if body_len == 0 {
        return 0;
    }

    let length_points = (body_len / 40).min(40) as u8;
    let paragraph_points = (paragraphs.len() * 6).min(30) as u8;
    let mut score = length_points + paragraph_points;
    if has_title {
        score += 10;
    }
    if has_author {
        score += 10;
    }
    if has_date {
        score += 10;
    }
    score.min(100)
}

/// 读取文档语言（<html lang> 的主子标签）
fn document_language(doc: &Html) -> Option<String> {
    doc.select(&HTML_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(normalize_language)
        .filter(|l| !l.is_empty())
}

fn normalize_language(tag: &str) -> String {
    tag.split(['-', '_']).next().unwrap_or("").to_lowercase()
}

/// 尽力解析发布时间；解析失败时调用方保留原始字符串
fn parse_published_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(caps) = DATE_PATTERN.captures(raw) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        return Some(DateTime::from_naive_utc_and_offset(
            date.and_hms_opt(0, 0, 0)?,
            Utc,
        ));
    }
    None
}
